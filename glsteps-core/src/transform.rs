/// 4x4 transformation matrices and their composition
///
/// Conventions used by every function here:
///
/// * Column vectors. A matrix transforms a point as `M * p`.
/// * Column-major storage. `m.as_slice()` is the 16-element uniform layout and
///   the translation lives at flat indices 12, 13, 14.
/// * Post-multiplication. `multiply(a, b)` is `a * b`: `b` acts on the vertex
///   first, then `a`. The composing helpers (`translate`, `x_rotate`, ...)
///   return `m * T`, so the most recently appended transform is applied to
///   vertices first.
///
/// All functions take their inputs by value or reference and return a fresh
/// matrix. Nothing is mutated in place.
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::error::{TransformError, TransformResult};

/// Determinant magnitude below which `inverse` refuses to invert.
pub const SINGULAR_EPSILON: f32 = 1e-6;

/// |w| below which `project_point` treats a point as lying on the eye plane.
pub const W_EPSILON: f32 = 1e-6;

pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// `a * b`; `b` is applied first.
pub fn multiply(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
    a * b
}

pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Rotation about +X, counter-clockwise when looking from +X toward the origin
pub fn x_rotation(angle_rad: f32) -> Matrix4<f32> {
    Matrix4::from_axis_angle(&Vector3::x_axis(), angle_rad)
}

/// Rotation about +Y, counter-clockwise when looking from +Y toward the origin
pub fn y_rotation(angle_rad: f32) -> Matrix4<f32> {
    Matrix4::from_axis_angle(&Vector3::y_axis(), angle_rad)
}

/// Rotation about +Z, counter-clockwise when looking from +Z toward the origin
pub fn z_rotation(angle_rad: f32) -> Matrix4<f32> {
    Matrix4::from_axis_angle(&Vector3::z_axis(), angle_rad)
}

pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
}

/// `m * translation(x, y, z)`
pub fn translate(m: &Matrix4<f32>, x: f32, y: f32, z: f32) -> Matrix4<f32> {
    multiply(m, &translation(x, y, z))
}

/// `m * x_rotation(angle_rad)`
pub fn x_rotate(m: &Matrix4<f32>, angle_rad: f32) -> Matrix4<f32> {
    multiply(m, &x_rotation(angle_rad))
}

/// `m * y_rotation(angle_rad)`
pub fn y_rotate(m: &Matrix4<f32>, angle_rad: f32) -> Matrix4<f32> {
    multiply(m, &y_rotation(angle_rad))
}

/// `m * z_rotation(angle_rad)`
pub fn z_rotate(m: &Matrix4<f32>, angle_rad: f32) -> Matrix4<f32> {
    multiply(m, &z_rotation(angle_rad))
}

/// `m * scaling(sx, sy, sz)`
pub fn scale(m: &Matrix4<f32>, sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
    multiply(m, &scaling(sx, sy, sz))
}

/// General 4x4 inverse.
///
/// Fails with `SingularMatrix` when `|det(m)| < SINGULAR_EPSILON`, or when the
/// determinant is not finite.
pub fn inverse(m: &Matrix4<f32>) -> TransformResult<Matrix4<f32>> {
    let determinant = m.determinant();
    if !(determinant.abs() >= SINGULAR_EPSILON) || !determinant.is_finite() {
        log::debug!("refusing to invert matrix with determinant {determinant:e}");
        return Err(TransformError::SingularMatrix { determinant });
    }

    m.try_inverse()
        .ok_or(TransformError::SingularMatrix { determinant })
}

/// Apply `m` to the homogeneous point `(p, 1)` without dividing by w
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Vector4<f32> {
    m * p.to_homogeneous()
}

/// Apply `m` to `p` and perform the perspective divide.
///
/// Returns `None` when the resulting w is too close to zero to divide by.
pub fn project_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Option<Point3<f32>> {
    let clip = transform_point(m, p);
    if clip.w.abs() < W_EPSILON {
        return None;
    }
    Some(Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
}

/// The translation column (flat indices 12..=14)
pub fn translation_of(m: &Matrix4<f32>) -> Point3<f32> {
    Point3::new(m[12], m[13], m[14])
}

/// Column-major copy ready for `uniformMatrix4fv`
pub fn to_uniform(m: &Matrix4<f32>) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// Build a matrix from 16 column-major values
pub fn from_column_slice(values: &[f32]) -> TransformResult<Matrix4<f32>> {
    if values.len() != 16 {
        return Err(TransformError::invalid_argument(format!(
            "expected 16 matrix elements, got {}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(TransformError::invalid_argument(
            "matrix elements must be finite",
        ));
    }
    Ok(Matrix4::from_column_slice(values))
}
