//! Joint angle calculation using dot product
//!
//! The angle at a joint is taken between the two segments meeting there,
//! e.g. shoulder→elbow and elbow→wrist for the elbow.

/// Interior angle in degrees at `b`, between rays `b→a` and `b→c`
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns a value in [0°, 180°]:
/// - 90° = segments perpendicular (elbow bent at a right angle)
/// - 180° = segments collinear (limb fully straight)
///
/// Coincident points give a zero-length ray and the result is NaN.
/// Callers gate on keypoint confidence first; a NaN that slips through
/// compares false against every threshold, so no phase changes.
pub fn angle_at(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    // 0/0 stays NaN through the clamp
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_straight_limb() {
        let angle = angle_at((0.0, 0.0), (50.0, 0.0), (100.0, 0.0));
        assert_abs_diff_eq!(angle, 180.0, epsilon = 0.01);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at((0.0, 0.0), (50.0, 0.0), (50.0, 50.0));
        assert_abs_diff_eq!(angle, 90.0, epsilon = 0.01);
    }

    #[test]
    fn test_folded_limb() {
        let angle = angle_at((100.0, 0.0), (0.0, 0.0), (100.0, 0.0));
        assert_abs_diff_eq!(angle, 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_symmetric_in_outer_points() {
        let a = (12.0, 40.0);
        let b = (30.0, 75.0);
        let c = (70.0, 90.0);
        assert_abs_diff_eq!(angle_at(a, b, c), angle_at(c, b, a), epsilon = 1e-4);
    }

    #[test]
    fn test_coincident_points_are_nan() {
        let angle = angle_at((10.0, 10.0), (10.0, 10.0), (40.0, 10.0));
        assert!(angle.is_nan());
        assert!(!(angle < 90.0) && !(angle > 160.0));
    }
}
