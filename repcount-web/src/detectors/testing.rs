//! Synthetic keypoint helpers for detector unit tests

use crate::pose::{Keypoint, LANDMARK_COUNT};

/// 33 confident keypoints, all at the origin
pub(crate) fn body() -> Vec<Keypoint> {
    vec![Keypoint::new(0.0, 0.0, 0.9); LANDMARK_COUNT]
}

pub(crate) fn place(kps: &mut [Keypoint], index: usize, x: f32, y: f32) {
    kps[index].x = x;
    kps[index].y = y;
}

/// Put `joint` at (x, y) with `upper` 100px straight above it and `lower`
/// 100px away so the angle at `joint` is `degrees`
pub(crate) fn hinge(
    kps: &mut [Keypoint],
    (upper, joint, lower): (usize, usize, usize),
    (x, y): (f32, f32),
    degrees: f32,
) {
    let theta = degrees.to_radians();
    place(kps, upper, x, y - 100.0);
    place(kps, joint, x, y);
    place(kps, lower, x + 100.0 * theta.sin(), y - 100.0 * theta.cos());
}
