//! Positional measures between keypoints
//!
//! Image coordinates: y grows downward, so "above" means a smaller y.

/// `a.y - b.y`; positive when `a` is below `b`
pub fn vertical_displacement(a: (f32, f32), b: (f32, f32)) -> f32 {
    a.1 - b.1
}

/// How far `point` sits above `reference`, in pixels (negative = below)
pub fn height_above(point: (f32, f32), reference: (f32, f32)) -> f32 {
    vertical_displacement(reference, point)
}

/// Absolute horizontal distance
pub fn horizontal_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).abs()
}

/// Horizontal distance between two points in units of `reference_width`
///
/// A zero reference gives inf or NaN; detectors check `is_finite()`.
pub fn normalized_spread(left: (f32, f32), right: (f32, f32), reference_width: f32) -> f32 {
    horizontal_distance(left, right) / reference_width
}

pub fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5)
}
