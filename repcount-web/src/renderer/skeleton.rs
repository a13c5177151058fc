//! Skeleton geometry - keypoint dots and the bones relevant to an exercise

use super::shapes::{push_circle, push_line, to_clip_space, Vertex};
use crate::config::OverlayConfig;
use crate::detectors::{DetectorState, ExerciseKind};
use crate::geometry::midpoint;
use crate::pose::{
    Keypoint, Pose, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

mod colors {
    /// Keypoints
    pub const RED: [f32; 4] = [1.0, 0.25, 0.25, 0.9];
    /// Bones while at rest
    pub const CYAN: [f32; 4] = [0.2, 0.9, 0.9, 0.8];
    /// Bones while at the peak of a rep
    pub const GREEN: [f32; 4] = [0.2, 1.0, 0.4, 0.9];
    /// Side-bend midline
    pub const YELLOW: [f32; 4] = [1.0, 0.9, 0.2, 0.9];
}

const DOT_RADIUS: f32 = 0.015;
const DOT_SEGMENTS: u32 = 12;
const BONE_WIDTH: f32 = 0.006;

type Bone = (usize, usize);

const ARMS: &[Bone] = &[
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
];

const GIRDLES: &[Bone] = &[(LEFT_SHOULDER, RIGHT_SHOULDER), (LEFT_HIP, RIGHT_HIP)];

const FLANKS: &[Bone] = &[(LEFT_SHOULDER, LEFT_HIP), (RIGHT_SHOULDER, RIGHT_HIP)];

const THIGHS: &[Bone] = &[(LEFT_HIP, LEFT_KNEE), (RIGHT_HIP, RIGHT_KNEE)];

const SHINS: &[Bone] = &[(LEFT_KNEE, LEFT_ANKLE), (RIGHT_KNEE, RIGHT_ANKLE)];

/// Bone groups drawn for each exercise
pub fn connections(kind: ExerciseKind) -> &'static [&'static [Bone]] {
    match kind {
        ExerciseKind::ArmRaise | ExerciseKind::ArmCircles => &[ARMS, GIRDLES],
        ExerciseKind::Pushup => &[ARMS, FLANKS, THIGHS],
        ExerciseKind::Squat | ExerciseKind::Lunge => &[THIGHS, SHINS, GIRDLES, FLANKS],
        ExerciseKind::HighKnees => &[THIGHS, SHINS, GIRDLES],
        ExerciseKind::Crunch => &[FLANKS, THIGHS, SHINS],
        ExerciseKind::SideBend => &[GIRDLES, FLANKS],
        ExerciseKind::JumpingJack | ExerciseKind::MountainClimber => {
            &[ARMS, GIRDLES, FLANKS, THIGHS, SHINS]
        }
    }
}

/// Everything the overlay draws for one pose
pub fn build_vertices(
    pose: &Pose,
    state: &DetectorState,
    frame_size: (f32, f32),
    overlay: &OverlayConfig,
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if frame_size.0 <= 0.0 || frame_size.1 <= 0.0 {
        return vertices;
    }
    let aspect = frame_size.0 / frame_size.1;
    let clip = |kp: &Keypoint| to_clip_space(kp.xy(), frame_size);
    let visible = |idx: usize| {
        pose.get(idx)
            .filter(|kp| kp.confidence() > overlay.line_min_score)
    };

    let (_, peak) = state.exercise.phases();
    let bone_color = if state.phase == peak { colors::GREEN } else { colors::CYAN };

    for &(a, b) in connections(state.exercise).iter().copied().flatten() {
        if let (Some(start), Some(end)) = (visible(a), visible(b)) {
            push_line(&mut vertices, clip(start), clip(end), BONE_WIDTH, bone_color);
        }
    }

    if state.exercise == ExerciseKind::SideBend {
        let shoulders = (visible(LEFT_SHOULDER), visible(RIGHT_SHOULDER));
        let hips = (visible(LEFT_HIP), visible(RIGHT_HIP));
        if let ((Some(ls), Some(rs)), (Some(lh), Some(rh))) = (shoulders, hips) {
            let top = midpoint(clip(ls), clip(rs));
            let bottom = midpoint(clip(lh), clip(rh));
            push_line(&mut vertices, top, bottom, BONE_WIDTH, colors::YELLOW);
        }
    }

    for kp in pose
        .keypoints
        .iter()
        .filter(|kp| kp.confidence() > overlay.keypoint_min_score)
    {
        push_circle(&mut vertices, clip(kp), DOT_RADIUS, aspect, colors::RED, DOT_SEGMENTS);
    }

    vertices
}
