//! Trunk-driven exercises: crunch, side bend

use super::cycle::{advance, Band, BandTuning, Posture};
use super::state::{DetectorState, Frame};
use crate::geometry::{horizontal_distance, midpoint, ConfidenceGate};
use crate::pose::{LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER};

const TRUNK: [usize; 6] = [
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
];

const SHOULDERS_AND_HIPS: [usize; 4] = [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP];

// ============================================================================
// CRUNCH
// ============================================================================

/// Trunk angle knee-hip-shoulder (degrees), more curled side wins
pub const CRUNCH: BandTuning = BandTuning {
    gate: ConfidenceGate::new(0.2),
    band: Band { rest_below: 60.0, peak_above: 80.0 },
    min_rep_interval_ms: 800.0,
};

pub(crate) fn trunk_angle(frame: &Frame<'_>) -> f32 {
    frame
        .angle(LEFT_KNEE, LEFT_HIP, LEFT_SHOULDER)
        .min(frame.angle(RIGHT_KNEE, RIGHT_HIP, RIGHT_SHOULDER))
}

pub fn detect_crunch(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    CRUNCH.run(frame, state, &TRUNK, trunk_angle)
}

// ============================================================================
// SIDE BEND
// ============================================================================

/// Either measure past its mark means the trunk is bent
pub struct SideBendTuning {
    pub gate: ConfidenceGate,
    /// Shoulder midpoint vs hip midpoint, horizontal (px)
    pub offset_above: f32,
    /// Height difference between the shoulders (px)
    pub tilt_above: f32,
    pub min_rep_interval_ms: f64,
}

pub const SIDE_BEND: SideBendTuning = SideBendTuning {
    gate: ConfidenceGate::new(0.2),
    offset_above: 50.0,
    tilt_above: 30.0,
    min_rep_interval_ms: 1000.0,
};

/// (lateral offset, shoulder tilt) in pixels
pub(crate) fn lean(frame: &Frame<'_>) -> (f32, f32) {
    let (left_shoulder, right_shoulder) = (frame.xy(LEFT_SHOULDER), frame.xy(RIGHT_SHOULDER));
    let hip_center = midpoint(frame.xy(LEFT_HIP), frame.xy(RIGHT_HIP));

    let offset = horizontal_distance(midpoint(left_shoulder, right_shoulder), hip_center);
    let tilt = (left_shoulder.1 - right_shoulder.1).abs();
    (offset, tilt)
}

pub fn detect_side_bend(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    let tuning = &SIDE_BEND;
    if !tuning.gate.admits(frame.keypoints, &SHOULDERS_AND_HIPS) {
        return state;
    }

    let (offset, tilt) = lean(frame);
    // No hysteresis band: anything not bent is centered
    let posture = if offset > tuning.offset_above || tilt > tuning.tilt_above {
        Posture::Peak
    } else {
        Posture::Rest
    };

    advance(state, posture, frame.timestamp_ms, tuning.min_rep_interval_ms)
}
