/// Projection matrices, look-at, and camera utilities
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::PI;

use crate::error::{TransformError, TransformResult};
use crate::transform;

/// Length below which a look-at direction or up vector counts as zero.
pub const BASIS_EPSILON: f32 = 1e-6;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Right-handed perspective projection mapping eye-space `z = -near` to NDC
/// -1 and `z = -far` to NDC +1. The last row is `(0, 0, -1, 0)`, so clip
/// `w` is the distance in front of the eye.
pub fn perspective(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> TransformResult<Matrix4<f32>> {
    if !(fov_y_rad.is_finite() && aspect.is_finite() && near.is_finite() && far.is_finite()) {
        return Err(TransformError::invalid_argument(
            "perspective parameters must be finite",
        ));
    }
    if fov_y_rad <= 0.0 || fov_y_rad >= PI {
        return Err(TransformError::invalid_argument(format!(
            "field of view {fov_y_rad} rad is outside (0, pi)"
        )));
    }
    if aspect <= 0.0 {
        return Err(TransformError::invalid_argument(format!(
            "aspect ratio {aspect} must be positive"
        )));
    }
    if near <= 0.0 {
        return Err(TransformError::invalid_argument(format!(
            "near plane {near} must be positive"
        )));
    }
    if far <= near {
        return Err(TransformError::invalid_argument(format!(
            "far plane {far} must lie beyond near plane {near}"
        )));
    }

    // nalgebra panics on a zero aspect or coincident planes, in the relative sense
    if nearly_equal(aspect, 0.0) || nearly_equal(near, far) {
        return Err(TransformError::invalid_argument(format!(
            "aspect {aspect} or depth range [{near}, {far}] is too small to project"
        )));
    }

    finite_or_invalid(Matrix4::new_perspective(aspect, fov_y_rad, near, far), "perspective")
}

/// Orthographic projection of the box `[left, right] x [bottom, top] x [-near, -far]`
/// onto the NDC cube.
pub fn orthographic(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> TransformResult<Matrix4<f32>> {
    if [left, right, bottom, top, near, far].iter().any(|v| !v.is_finite()) {
        return Err(TransformError::invalid_argument(
            "orthographic bounds must be finite",
        ));
    }
    if left == right || bottom == top || near == far {
        return Err(TransformError::invalid_argument(format!(
            "orthographic box is empty: x [{left}, {right}], y [{bottom}, {top}], z [{near}, {far}]"
        )));
    }

    finite_or_invalid(
        Matrix4::new_orthographic(left, right, bottom, top, near, far),
        "orthographic",
    )
}

/// Absolute-or-relative equality at `f32::EPSILON`, the test nalgebra asserts on
fn nearly_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= f32::EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Reject projections whose parameters overflowed or underflowed an entry
fn finite_or_invalid(m: Matrix4<f32>, what: &str) -> TransformResult<Matrix4<f32>> {
    if m.iter().all(|v| v.is_finite()) {
        Ok(m)
    } else {
        log::debug!("{what} parameters produced a non-finite matrix: {m:?}");
        Err(TransformError::invalid_argument(format!(
            "{what} parameters produce a non-finite matrix"
        )))
    }
}

/// Camera-to-world matrix for an eye at `eye` looking at `target`.
///
/// The columns are the camera's x, y and z axes followed by `eye`; the camera
/// looks down its own -z. Invert the result to get a view matrix.
pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> TransformResult<Matrix4<f32>> {
    if eye.iter().chain(target.iter()).chain(up.iter()).any(|v| !v.is_finite()) {
        return Err(TransformError::invalid_argument(format!(
            "look-at inputs must be finite: eye {eye}, target {target}, up {up}"
        )));
    }
    let forward = eye - target;
    if !(forward.norm().is_finite() && up.norm().is_finite()) {
        return Err(TransformError::invalid_argument(format!(
            "look-at inputs overflow: eye {eye}, target {target}, up {up}"
        )));
    }
    if !(forward.norm() >= BASIS_EPSILON) {
        return Err(TransformError::degenerate_basis(format!(
            "eye {eye} and target {target} coincide"
        )));
    }
    if !(up.norm() >= BASIS_EPSILON) {
        return Err(TransformError::degenerate_basis("up vector has zero length"));
    }

    let z_axis = forward.normalize();
    let side = up.cross(&z_axis);
    if !(side.norm() >= BASIS_EPSILON * up.norm()) {
        return Err(TransformError::degenerate_basis(
            "up vector is parallel to the viewing direction",
        ));
    }
    let x_axis = side.normalize();
    let y_axis = z_axis.cross(&x_axis);

    #[rustfmt::skip]
    let camera = Matrix4::new(
        x_axis.x, y_axis.x, z_axis.x, eye.x,
        x_axis.y, y_axis.y, z_axis.y, eye.y,
        x_axis.z, y_axis.z, z_axis.z, eye.z,
        0.0, 0.0, 0.0, 1.0,
    );
    Ok(camera)
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: PI / 3.0, // 60 degrees
            aspect,
            near: 1.0,
            far: 2000.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Camera-to-world transform
    pub fn camera_matrix(&self) -> TransformResult<Matrix4<f32>> {
        look_at(&self.position, &self.target, &self.up)
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> TransformResult<Matrix4<f32>> {
        transform::inverse(&self.camera_matrix()?)
    }

    pub fn projection_matrix(&self) -> TransformResult<Matrix4<f32>> {
        match self.mode {
            ProjectionMode::Perspective => perspective(self.fov, self.aspect, self.near, self.far),
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// `projection * view`
    pub fn view_projection(&self) -> TransformResult<Matrix4<f32>> {
        Ok(transform::multiply(&self.projection_matrix()?, &self.view_matrix()?))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::deg_to_rad;
    use crate::transform::{inverse, multiply, project_point, transform_point};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Vector4;

    #[test]
    fn test_perspective_depth_range() {
        let (near, far) = (1.0, 2000.0);
        let m = perspective(deg_to_rad(60.0), 1.5, near, far).unwrap();

        let n = project_point(&m, &Point3::new(0.0, 0.0, -near)).unwrap();
        assert_relative_eq!(n.z, -1.0, epsilon = 1e-5);

        let f = project_point(&m, &Point3::new(0.0, 0.0, -far)).unwrap();
        assert_relative_eq!(f.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_divide_row() {
        let m = perspective(1.0, 1.0, 0.5, 10.0).unwrap();
        assert_eq!(m.row(3).transpose(), Vector4::new(0.0, 0.0, -1.0, 0.0));
        assert_eq!(m[11], -1.0);

        let clip = transform_point(&m, &Point3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(clip.w, 3.0);
    }

    #[test]
    fn test_perspective_aspect_and_fov() {
        let m = perspective(deg_to_rad(90.0), 2.0, 1.0, 100.0).unwrap();
        assert_relative_eq!(m[(1, 1)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(m[(0, 0)], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_perspective_rejects_bad_parameters() {
        let bad = [
            (-1.0, 1.0, 1.0, 10.0),
            (0.0, 1.0, 1.0, 10.0),
            (PI, 1.0, 1.0, 10.0),
            (1.0, 0.0, 1.0, 10.0),
            (1.0, -2.0, 1.0, 10.0),
            (1.0, 1.0, 0.0, 10.0),
            (1.0, 1.0, -1.0, 10.0),
            (1.0, 1.0, 10.0, 10.0),
            (1.0, 1.0, 10.0, 5.0),
            (f32::NAN, 1.0, 1.0, 10.0),
            (1.0, 1.0, 1.0, f32::INFINITY),
        ];
        for (fov, aspect, near, far) in bad {
            assert!(
                matches!(
                    perspective(fov, aspect, near, far),
                    Err(TransformError::InvalidArgument(_))
                ),
                "expected rejection for fov={fov} aspect={aspect} near={near} far={far}"
            );
        }
    }

    #[test]
    fn test_perspective_rejects_non_finite_results() {
        // Tiny aspect blows up the x scale
        assert!(matches!(
            perspective(1.0, 1e-40, 1.0, 10.0),
            Err(TransformError::InvalidArgument(_))
        ));
        // 2 * near * far overflows
        assert!(matches!(
            perspective(1.0, 1.0, 1e20, 1e30),
            Err(TransformError::InvalidArgument(_))
        ));
        // Planes a rounding step apart
        assert!(matches!(
            perspective(1.0, 1.0, 1.0, 1.0 + f32::EPSILON),
            Err(TransformError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_matches_explicit_perspective_layout() {
        let (near, far) = (0.5, 40.0);
        let f = 1.0 / 0.5_f32.tan();
        let m = perspective(1.0, 2.0, near, far).unwrap();
        #[rustfmt::skip]
        let expected = Matrix4::new(
            f / 2.0, 0.0, 0.0,                          0.0,
            0.0,     f,   0.0,                          0.0,
            0.0,     0.0, (near + far) / (near - far),  2.0 * near * far / (near - far),
            0.0,     0.0, -1.0,                         0.0,
        );
        assert_relative_eq!(m, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_rejects_non_finite_results() {
        assert!(matches!(
            orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, 1e-45),
            Err(TransformError::InvalidArgument(_))
        ));
        assert!(matches!(
            orthographic(0.0, 1e-45, -1.0, 1.0, 1.0, 10.0),
            Err(TransformError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_orthographic_maps_box_to_ndc() {
        let m = orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, 11.0).unwrap();
        let corner = project_point(&m, &Point3::new(2.0, 1.0, -1.0)).unwrap();
        assert_relative_eq!(corner, Point3::new(1.0, 1.0, -1.0), epsilon = 1e-6);
        let far = project_point(&m, &Point3::new(-2.0, -1.0, -11.0)).unwrap();
        assert_relative_eq!(far, Point3::new(-1.0, -1.0, 1.0), epsilon = 1e-6);

        assert!(orthographic(1.0, 1.0, -1.0, 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_look_at_inverse_moves_target_to_origin() {
        let eye = Point3::new(0.0, 0.0, 5.0);
        let camera = look_at(&eye, &Point3::origin(), &Vector3::y()).unwrap();
        let view = inverse(&camera).unwrap();

        let moved = transform_point(&view, &eye);
        assert_abs_diff_eq!(moved, Vector4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-6);

        // The target sits straight ahead, down -z.
        let target = project_point(&view, &Point3::origin()).unwrap();
        assert_abs_diff_eq!(target, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let eye = Point3::new(3.0, 4.0, -2.0);
        let m = look_at(&eye, &Point3::new(-1.0, 0.5, 2.0), &Vector3::y()).unwrap();
        let basis = m.fixed_view::<3, 3>(0, 0).into_owned();
        assert_relative_eq!(
            basis.transpose() * basis,
            nalgebra::Matrix3::identity(),
            epsilon = 1e-5
        );
        assert_relative_eq!(basis.determinant(), 1.0, epsilon = 1e-5);
        assert_eq!(&m.as_slice()[12..15], &[3.0, 4.0, -2.0]);
    }

    #[test]
    fn test_look_at_degenerate_inputs() {
        let origin = Point3::origin();
        let up = Vector3::y();

        assert!(matches!(
            look_at(&origin, &origin, &up),
            Err(TransformError::DegenerateBasis(_))
        ));
        assert!(matches!(
            look_at(&Point3::new(0.0, 5.0, 0.0), &origin, &up),
            Err(TransformError::DegenerateBasis(_))
        ));
        assert!(matches!(
            look_at(&Point3::new(0.0, 0.0, 5.0), &origin, &Vector3::zeros()),
            Err(TransformError::DegenerateBasis(_))
        ));
    }

    #[test]
    fn test_look_at_rejects_non_finite_inputs() {
        let up = Vector3::y();
        assert!(matches!(
            look_at(&Point3::new(3e38, 0.0, 0.0), &Point3::new(-3e38, 0.0, 0.0), &up),
            Err(TransformError::InvalidArgument(_))
        ));
        assert!(matches!(
            look_at(&Point3::new(f32::NAN, 0.0, 5.0), &Point3::origin(), &up),
            Err(TransformError::InvalidArgument(_))
        ));
        assert!(matches!(
            look_at(&Point3::new(0.0, 0.0, 5.0), &Point3::origin(), &Vector3::new(0.0, 1e30, 1e30)),
            Err(TransformError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800.0 / 600.0);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_view_projection() {
        let camera = Camera::default();
        let vp = camera.view_projection().unwrap();
        let expected = multiply(
            &camera.projection_matrix().unwrap(),
            &camera.view_matrix().unwrap(),
        );
        assert_relative_eq!(vp, expected);

        // The target projects to the centre of the screen.
        let centre = project_point(&vp, &camera.target).unwrap();
        assert_abs_diff_eq!(centre.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(centre.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_camera() {
        let mut camera = Camera::new(2.0);
        camera.mode = ProjectionMode::Orthographic;
        let m = camera.projection_matrix().unwrap();
        assert_relative_eq!(m[(0, 0)], 2.0 / 10.0, epsilon = 1e-6);
        assert_relative_eq!(m[(1, 1)], 2.0 / 5.0, epsilon = 1e-6);
    }
}
