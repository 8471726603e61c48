/// glsteps Web - the transform library and tutorial scenes for JavaScript
///
/// Matrices cross the boundary as flat, column-major `Float32Array`s of 16
/// elements, ready for `uniformMatrix4fv`. Every library failure becomes a
/// thrown JS error carrying the message of the underlying `TransformError`.
use nalgebra::{Matrix4, Point3, Vector3};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlUniformLocation};

use glsteps_core::transform::{self, from_column_slice, to_uniform};
use glsteps_core::{angle, projection, SceneState, TransformError, TransformResult, Tutorial};

fn to_js(err: TransformError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn matrix(values: &[f32]) -> Result<Matrix4<f32>, JsValue> {
    from_column_slice(values).map_err(to_js)
}

fn flat(m: &Matrix4<f32>) -> Vec<f32> {
    to_uniform(m).to_vec()
}

fn vec3(values: &[f32], what: &str) -> TransformResult<Vector3<f32>> {
    match values {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(TransformError::invalid_argument(format!(
            "{what} must be 3 finite numbers, got {} values",
            values.len()
        ))),
    }
}

#[wasm_bindgen]
pub fn identity() -> Vec<f32> {
    flat(&transform::identity())
}

/// `a * b`; `b` is applied to vertices first
#[wasm_bindgen]
pub fn multiply(a: &[f32], b: &[f32]) -> Result<Vec<f32>, JsValue> {
    Ok(flat(&transform::multiply(&matrix(a)?, &matrix(b)?)))
}

#[wasm_bindgen]
pub fn translate(m: &[f32], x: f32, y: f32, z: f32) -> Result<Vec<f32>, JsValue> {
    Ok(flat(&transform::translate(&matrix(m)?, x, y, z)))
}

#[wasm_bindgen(js_name = xRotate)]
pub fn x_rotate(m: &[f32], angle_rad: f32) -> Result<Vec<f32>, JsValue> {
    Ok(flat(&transform::x_rotate(&matrix(m)?, angle_rad)))
}

#[wasm_bindgen(js_name = yRotate)]
pub fn y_rotate(m: &[f32], angle_rad: f32) -> Result<Vec<f32>, JsValue> {
    Ok(flat(&transform::y_rotate(&matrix(m)?, angle_rad)))
}

#[wasm_bindgen(js_name = zRotate)]
pub fn z_rotate(m: &[f32], angle_rad: f32) -> Result<Vec<f32>, JsValue> {
    Ok(flat(&transform::z_rotate(&matrix(m)?, angle_rad)))
}

#[wasm_bindgen]
pub fn perspective(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> Result<Vec<f32>, JsValue> {
    projection::perspective(fov_y_rad, aspect, near, far)
        .map(|m| flat(&m))
        .map_err(to_js)
}

/// Camera-to-world matrix; invert it for a view matrix
#[wasm_bindgen(js_name = lookAt)]
pub fn look_at(eye: &[f32], target: &[f32], up: &[f32]) -> Result<Vec<f32>, JsValue> {
    look_at_flat(eye, target, up).map_err(to_js)
}

fn look_at_flat(eye: &[f32], target: &[f32], up: &[f32]) -> TransformResult<Vec<f32>> {
    let eye = Point3::from(vec3(eye, "eye")?);
    let target = Point3::from(vec3(target, "target")?);
    let up = vec3(up, "up")?;
    projection::look_at(&eye, &target, &up).map(|m| flat(&m))
}

#[wasm_bindgen]
pub fn inverse(m: &[f32]) -> Result<Vec<f32>, JsValue> {
    transform::inverse(&matrix(m)?).map(|m| flat(&m)).map_err(to_js)
}

#[wasm_bindgen(js_name = degToRad)]
pub fn deg_to_rad(degrees: f32) -> f32 {
    angle::deg_to_rad(degrees)
}

#[wasm_bindgen(js_name = radToDeg)]
pub fn rad_to_deg(radians: f32) -> f32 {
    angle::rad_to_deg(radians)
}

/// Upload a 16-element matrix to a `mat4` uniform
#[wasm_bindgen(js_name = uploadModelView)]
pub fn upload_model_view(
    gl: &WebGl2RenderingContext,
    location: &WebGlUniformLocation,
    m: &[f32],
) -> Result<(), JsValue> {
    let m = matrix(m)?;
    gl.uniform_matrix4fv_with_f32_array(Some(location), false, m.as_slice());
    Ok(())
}

/// One tutorial plus its per-frame state, replacing the demos' globals
#[wasm_bindgen]
pub struct WebScene {
    tutorial: Tutorial,
    state: SceneState,
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> Result<WebScene, JsValue> {
        let tutorial = name.parse::<Tutorial>().map_err(to_js)?;
        Ok(Self::for_tutorial(tutorial))
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.tutorial.name().to_string()
    }

    /// Whether depth testing and back-face culling should be enabled
    #[wasm_bindgen(js_name = is3d)]
    pub fn is_3d(&self) -> bool {
        self.tutorial.is_3d()
    }

    /// Background colour as three 0-255 components
    #[wasm_bindgen(js_name = clearColor)]
    pub fn clear_color(&self) -> Vec<u8> {
        self.tutorial.clear_color().to_vec()
    }

    /// Orbit camera angles in degrees, as read from the sliders
    #[wasm_bindgen(js_name = setCamera)]
    pub fn set_camera(&mut self, h_deg: f32, v_deg: f32) {
        self.state = self.state.with_camera(h_deg, v_deg);
    }

    /// Matrices for every draw call of the frame, 16 floats each, back to back
    pub fn frame(&mut self, elapsed_ms: f64, aspect: f32) -> Result<Vec<f32>, JsValue> {
        self.frame_matrices(elapsed_ms, aspect).map_err(to_js)
    }
}

impl WebScene {
    pub fn for_tutorial(tutorial: Tutorial) -> Self {
        Self {
            tutorial,
            state: SceneState::new(),
        }
    }

    fn frame_matrices(&mut self, elapsed_ms: f64, aspect: f32) -> TransformResult<Vec<f32>> {
        self.state = self.state.at(elapsed_ms);
        let items = self.tutorial.draw_list(&self.state, aspect)?;
        Ok(items
            .iter()
            .flat_map(|item| to_uniform(&item.model_view))
            .collect())
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Route Rust panics to the browser console
    console_error_panic_hook::set_once();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_writes_column_major() {
        let m = translate(&identity(), 1.0, 2.0, 3.0).unwrap();
        assert_eq!(m.len(), 16);
        assert_eq!(&m[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rotate_and_inverse() {
        let m = x_rotate(&identity(), 0.7).unwrap();
        let m = y_rotate(&m, -0.2).unwrap();
        let m = z_rotate(&m, 1.9).unwrap();
        let inv = inverse(&m).unwrap();
        let product = multiply(&m, &inv).unwrap();
        for (got, want) in product.iter().zip(identity()) {
            assert!((got - want).abs() < 1e-5);
        }
    }

    #[test]
    fn test_look_at_flat() {
        let camera = look_at_flat(&[0.0, 0.0, 5.0], &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(&camera[12..15], &[0.0, 0.0, 5.0]);

        assert!(matches!(
            look_at_flat(&[0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]),
            Err(TransformError::InvalidArgument(_))
        ));
        assert!(matches!(
            look_at_flat(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]),
            Err(TransformError::DegenerateBasis(_))
        ));
    }

    #[test]
    fn test_scene_frame_layout() {
        let mut scene = WebScene::for_tutorial(Tutorial::ManyCubes);
        let matrices = scene.frame_matrices(250.0, 1.5).unwrap();
        assert_eq!(matrices.len(), 2 * 16);
        assert_eq!(scene.state.elapsed_ms, 250.0);

        scene.set_camera(370.0, -10.0);
        assert_eq!(scene.state.camera_h_deg, 10.0);
        assert!(scene.is_3d());
        assert_eq!(scene.name(), "many-cubes");
    }

    #[test]
    fn test_scene_frame_rejects_bad_aspect() {
        let mut scene = WebScene::for_tutorial(Tutorial::Cube);
        assert!(scene.frame_matrices(0.0, -1.0).is_err());
    }

    #[test]
    fn test_angles() {
        assert!((deg_to_rad(90.0) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((rad_to_deg(std::f32::consts::PI) - 180.0).abs() < 1e-4);
    }
}
