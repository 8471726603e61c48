//! Degree/radian conversion

/// Convert degrees (user-facing) to radians (what every transform takes).
///
/// Scales by a single constant, so no intermediate product can overflow.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Convert radians back to degrees
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Wrap an angle in degrees into `[-180, 180)`
pub fn wrap_degrees(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_half_turn() {
        assert_relative_eq!(deg_to_rad(180.0), PI);
        assert_relative_eq!(rad_to_deg(PI), 180.0);
        assert_eq!(deg_to_rad(0.0), 0.0);
    }

    #[test]
    fn test_round_trip() {
        for x in [-720.0_f32, -45.5, 0.25, 1.0, 60.0, 359.9, 12345.0] {
            assert_relative_eq!(rad_to_deg(deg_to_rad(x)), x, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_round_trip_near_f32_limit() {
        for x in [2.0e38_f32, f32::MAX / 2.0, -3.0e38] {
            let rad = deg_to_rad(x);
            assert!(rad.is_finite(), "deg_to_rad({x}) overflowed");
            let back = rad_to_deg(rad);
            assert!(back.is_finite(), "round trip of {x} overflowed");
            assert_relative_eq!(back, x, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_wrap_degrees() {
        assert_relative_eq!(wrap_degrees(190.0), -170.0);
        assert_relative_eq!(wrap_degrees(-190.0), 170.0);
        assert_relative_eq!(wrap_degrees(180.0), -180.0);
        assert_relative_eq!(wrap_degrees(45.0), 45.0);
    }
}
