//! Arm-driven exercises: arm raise, push-up, arm circles

use super::cycle::{advance, Band, BandTuning, Posture};
use super::state::{DetectorState, Frame};
use crate::geometry::ConfidenceGate;
use crate::pose::{LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_WRIST};

const ARMS: [usize; 6] = [
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
];

const SHOULDERS_AND_WRISTS: [usize; 4] = [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_WRIST, RIGHT_WRIST];

// ============================================================================
// ARM RAISE
// ============================================================================

/// Wrist rise over the shoulder (px), higher arm wins
pub const ARM_RAISE: BandTuning = BandTuning {
    gate: ConfidenceGate::new(0.3),
    band: Band { rest_below: 50.0, peak_above: 50.0 },
    min_rep_interval_ms: 800.0,
};

/// (higher, lower) wrist rise over its shoulder
pub(crate) fn wrist_rise(frame: &Frame<'_>) -> (f32, f32) {
    let left = frame.height_above(LEFT_WRIST, LEFT_SHOULDER);
    let right = frame.height_above(RIGHT_WRIST, RIGHT_SHOULDER);
    (left.max(right), left.min(right))
}

pub fn detect_arm_raise(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    ARM_RAISE.run(frame, state, &SHOULDERS_AND_WRISTS, |f| wrist_rise(f).0)
}

// ============================================================================
// PUSH-UP
// ============================================================================

/// Elbow angle (degrees), more bent arm wins
pub const PUSHUP: BandTuning = BandTuning {
    gate: ConfidenceGate::new(0.2),
    band: Band { rest_below: 90.0, peak_above: 160.0 },
    min_rep_interval_ms: 1200.0,
};

pub(crate) fn min_elbow_angle(frame: &Frame<'_>) -> f32 {
    frame
        .angle(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST)
        .min(frame.angle(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST))
}

pub fn detect_pushup(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    PUSHUP.run(frame, state, &ARMS, min_elbow_angle)
}

// ============================================================================
// ARM CIRCLES
// ============================================================================

/// Both wrists must pass these marks (px above shoulder)
pub struct ArmCirclesTuning {
    pub gate: ConfidenceGate,
    /// Both wrists above the shoulder by more than this: peak
    pub raised_above: f32,
    /// Both wrists below this (negative = under the shoulder): rest
    pub lowered_below: f32,
    pub min_rep_interval_ms: f64,
}

pub const ARM_CIRCLES: ArmCirclesTuning = ArmCirclesTuning {
    gate: ConfidenceGate::new(0.2),
    raised_above: 50.0,
    lowered_below: -20.0,
    min_rep_interval_ms: 800.0,
};

pub fn detect_arm_circles(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    let tuning = &ARM_CIRCLES;
    if !tuning.gate.admits(frame.keypoints, &ARMS) {
        return state;
    }

    // Both arms must pass: test the lagging wrist
    let (higher, lower) = wrist_rise(frame);

    let posture = if lower > tuning.raised_above {
        Posture::Peak
    } else if higher < tuning.lowered_below {
        Posture::Rest
    } else {
        Posture::Between
    };

    advance(state, posture, frame.timestamp_ms, tuning.min_rep_interval_ms)
}
