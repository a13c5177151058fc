//! Whole-body exercises: jumping jack, mountain climber

use super::cycle::{advance, Posture};
use super::state::{DetectorState, Frame};
use crate::geometry::{horizontal_distance, normalized_spread, ConfidenceGate};
use crate::pose::{
    LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE, RIGHT_HIP,
    RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

// ============================================================================
// JUMPING JACK
// ============================================================================

const JACK_POINTS: [usize; 6] = [
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_ANKLE, RIGHT_ANKLE,
];

/// Spreads are in shoulder widths
pub struct JumpingJackTuning {
    pub gate: ConfidenceGate,
    pub arms_open_above: f32,
    pub legs_open_above: f32,
    pub arms_closed_below: f32,
    pub legs_closed_below: f32,
    pub min_rep_interval_ms: f64,
}

pub const JUMPING_JACK: JumpingJackTuning = JumpingJackTuning {
    gate: ConfidenceGate::new(0.2),
    arms_open_above: 1.5,
    legs_open_above: 1.2,
    arms_closed_below: 1.0,
    legs_closed_below: 0.8,
    min_rep_interval_ms: 800.0,
};

/// (wrist spread, ankle spread) relative to shoulder width
pub(crate) fn spreads(frame: &Frame<'_>) -> (f32, f32) {
    let shoulder_width = horizontal_distance(frame.xy(LEFT_SHOULDER), frame.xy(RIGHT_SHOULDER));
    (
        normalized_spread(frame.xy(LEFT_WRIST), frame.xy(RIGHT_WRIST), shoulder_width),
        normalized_spread(frame.xy(LEFT_ANKLE), frame.xy(RIGHT_ANKLE), shoulder_width),
    )
}

pub fn detect_jumping_jack(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    let tuning = &JUMPING_JACK;
    if !tuning.gate.admits(frame.keypoints, &JACK_POINTS) {
        return state;
    }

    let (arms, legs) = spreads(frame);
    // Shoulders stacked on one x (side-on to the camera)
    if !arms.is_finite() || !legs.is_finite() {
        return state;
    }

    let posture = if arms > tuning.arms_open_above && legs > tuning.legs_open_above {
        Posture::Peak
    } else if arms < tuning.arms_closed_below && legs < tuning.legs_closed_below {
        Posture::Rest
    } else {
        Posture::Between
    };

    advance(state, posture, frame.timestamp_ms, tuning.min_rep_interval_ms)
}

// ============================================================================
// MOUNTAIN CLIMBER
// ============================================================================

const CLIMBER_POINTS: [usize; 6] = [
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
];

pub struct MountainClimberTuning {
    pub gate: ConfidenceGate,
    /// Shoulder-hip-knee angle (degrees) that still counts as a plank
    pub plank_above: f32,
    /// Knee rise over the hip (px)
    pub knee_above: f32,
    pub min_rep_interval_ms: f64,
}

pub const MOUNTAIN_CLIMBER: MountainClimberTuning = MountainClimberTuning {
    gate: ConfidenceGate::new(0.3),
    plank_above: 160.0,
    knee_above: 15.0,
    min_rep_interval_ms: 400.0,
};

/// (plank angle, knee rise) on the side whose knee is higher
pub(crate) fn driving_leg(frame: &Frame<'_>) -> (f32, f32) {
    let left_rise = frame.height_above(LEFT_KNEE, LEFT_HIP);
    let right_rise = frame.height_above(RIGHT_KNEE, RIGHT_HIP);

    if left_rise >= right_rise {
        (frame.angle(LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE), left_rise)
    } else {
        (frame.angle(RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE), right_rise)
    }
}

pub fn detect_mountain_climber(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    let tuning = &MOUNTAIN_CLIMBER;
    if !tuning.gate.admits(frame.keypoints, &CLIMBER_POINTS) {
        return state;
    }

    let (plank, rise) = driving_leg(frame);
    let posture = if plank.is_nan() {
        Posture::Between
    } else if plank > tuning.plank_above && rise > tuning.knee_above {
        Posture::Peak
    } else {
        Posture::Rest
    };

    advance(state, posture, frame.timestamp_ms, tuning.min_rep_interval_ms)
}
