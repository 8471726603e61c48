/// The tutorial scenes and the per-frame state that drives them
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::angle::{deg_to_rad, wrap_degrees};
use crate::error::{TransformError, TransformResult};
use crate::geometry::Mesh;
use crate::projection::{look_at, perspective};
use crate::transform::{
    identity, inverse, multiply, translate, translation_of, x_rotate, y_rotate, y_rotation,
    z_rotate,
};

pub const NEAR: f32 = 1.0;
pub const FAR: f32 = 2000.0;

/// Distance of the orbiting camera from its pivot
pub const ORBIT_RADIUS: f32 = 7.5;

/// Point the orbiting camera keeps in view
pub const ORBIT_TARGET: [f32; 3] = [5.0, 0.0, 0.0];

/// Everything a tutorial needs to build one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneState {
    /// Milliseconds since the animation started
    pub elapsed_ms: f64,
    /// Horizontal orbit angle in degrees
    pub camera_h_deg: f32,
    /// Vertical orbit angle in degrees
    pub camera_v_deg: f32,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same camera, different clock
    pub fn at(self, elapsed_ms: f64) -> Self {
        Self { elapsed_ms, ..self }
    }

    /// Spin angle of the animated cubes.
    ///
    /// The clock is read as `elapsed / 100 * 2pi` degrees, about one turn
    /// every 5.7 seconds.
    pub fn rotation_rad(&self) -> f32 {
        let degrees = (self.elapsed_ms / 100.0 * 2.0 * std::f64::consts::PI) % 360.0;
        deg_to_rad(degrees as f32)
    }

    /// Move the orbit camera by the given degrees, wrapping into `[-180, 180)`
    pub fn orbit(self, dh_deg: f32, dv_deg: f32) -> Self {
        Self {
            camera_h_deg: wrap_degrees(self.camera_h_deg + dh_deg),
            camera_v_deg: wrap_degrees(self.camera_v_deg + dv_deg),
            ..self
        }
    }

    /// Set the orbit camera angles directly, as the sliders do
    pub fn with_camera(self, h_deg: f32, v_deg: f32) -> Self {
        Self {
            camera_h_deg: wrap_degrees(h_deg),
            camera_v_deg: wrap_degrees(v_deg),
            ..self
        }
    }
}

/// One draw call: the matrix uploaded as the `modelView` uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub model_view: Matrix4<f32>,
}

/// The tutorial steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tutorial {
    Triangle,
    Rectangle,
    Cube,
    ManyCubes,
    Camera,
}

impl Tutorial {
    pub const ALL: [Tutorial; 5] = [
        Tutorial::Triangle,
        Tutorial::Rectangle,
        Tutorial::Cube,
        Tutorial::ManyCubes,
        Tutorial::Camera,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tutorial::Triangle => "triangle",
            Tutorial::Rectangle => "rectangle",
            Tutorial::Cube => "cube",
            Tutorial::ManyCubes => "many-cubes",
            Tutorial::Camera => "camera",
        }
    }

    pub fn mesh(&self) -> Mesh {
        match self {
            Tutorial::Triangle => Mesh::triangle(),
            Tutorial::Rectangle => Mesh::rectangle(),
            Tutorial::Cube | Tutorial::ManyCubes | Tutorial::Camera => Mesh::cube(1.0),
        }
    }

    /// Whether the scene needs depth testing and back-face culling
    pub fn is_3d(&self) -> bool {
        !matches!(self, Tutorial::Triangle | Tutorial::Rectangle)
    }

    /// Background colour as 0-255 RGB
    pub fn clear_color(&self) -> [u8; 3] {
        match self {
            Tutorial::Triangle | Tutorial::Rectangle | Tutorial::Cube => [130, 140, 250],
            Tutorial::ManyCubes | Tutorial::Camera => [200, 240, 250],
        }
    }

    /// Vertical field of view used by the scene's projection
    pub fn fov_deg(&self) -> f32 {
        match self {
            Tutorial::ManyCubes => 45.0,
            _ => 60.0,
        }
    }

    /// Matrices for every draw call of one frame.
    ///
    /// `aspect` is the viewport's width over height.
    pub fn draw_list(&self, state: &SceneState, aspect: f32) -> TransformResult<Vec<DrawItem>> {
        match self {
            Tutorial::Triangle | Tutorial::Rectangle => Ok(vec![DrawItem {
                model_view: identity(),
            }]),
            Tutorial::Cube => {
                let projection = self.projection(aspect)?;
                let m = translate(&projection, 0.0, 0.0, -5.0);
                let m = x_rotate(&m, deg_to_rad(20.0));
                let m = y_rotate(&m, deg_to_rad(45.0));
                let m = z_rotate(&m, deg_to_rad(0.0));
                Ok(vec![DrawItem { model_view: m }])
            }
            Tutorial::ManyCubes => {
                let projection = self.projection(aspect)?;
                let angle = state.rotation_rad();
                Ok((0..2)
                    .map(|i| {
                        let x = (PI * i as f32).cos() * 3.0;
                        let m = translate(&projection, x, 0.0, -10.0);
                        let m = x_rotate(&m, angle);
                        let m = y_rotate(&m, angle);
                        DrawItem {
                            model_view: z_rotate(&m, angle),
                        }
                    })
                    .collect())
            }
            Tutorial::Camera => {
                let projection = self.projection(aspect)?;
                let view = orbit_view(state)?;
                let view_projection = multiply(&projection, &view);
                Ok((0..2)
                    .map(|i| {
                        let angle = i as f32 * PI * 2.0 / 2.0;
                        let x = angle.cos() * 5.0;
                        let z = angle.sin() * 5.0;
                        DrawItem {
                            model_view: translate(&view_projection, x, 0.0, z),
                        }
                    })
                    .collect())
            }
        }
    }

    fn projection(&self, aspect: f32) -> TransformResult<Matrix4<f32>> {
        perspective(deg_to_rad(self.fov_deg()), aspect, NEAR, FAR)
    }
}

/// World-to-camera matrix of the orbiting camera.
///
/// The camera is swung around the origin by the state's angles, then aimed
/// at `ORBIT_TARGET`.
pub fn orbit_view(state: &SceneState) -> TransformResult<Matrix4<f32>> {
    let camera = y_rotation(deg_to_rad(state.camera_h_deg));
    let camera = x_rotate(&camera, deg_to_rad(state.camera_v_deg));
    let camera = translate(&camera, 0.0, 0.0, ORBIT_RADIUS);

    let eye = translation_of(&camera);
    let [tx, ty, tz] = ORBIT_TARGET;
    let camera = look_at(&eye, &Point3::new(tx, ty, tz), &Vector3::y())?;
    inverse(&camera)
}

impl fmt::Display for Tutorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tutorial {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tutorial::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransformError::invalid_argument(format!("unknown tutorial '{s}'")))
    }
}
