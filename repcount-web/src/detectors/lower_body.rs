//! Leg-driven exercises: squat, lunge, high knees

use super::cycle::{Band, BandTuning};
use super::state::{DetectorState, Frame};
use crate::geometry::ConfidenceGate;
use crate::pose::{LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE};

const LEGS: [usize; 6] = [
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
];

const HIPS_AND_KNEES: [usize; 4] = [LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE];

/// Knee angle of the more bent leg
pub(crate) fn min_knee_angle(frame: &Frame<'_>) -> f32 {
    frame
        .angle(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE)
        .min(frame.angle(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE))
}

/// Rise of the higher knee over its hip
pub(crate) fn knee_rise(frame: &Frame<'_>) -> f32 {
    frame
        .height_above(LEFT_KNEE, LEFT_HIP)
        .max(frame.height_above(RIGHT_KNEE, RIGHT_HIP))
}

/// Knee angle (degrees)
pub const SQUAT: BandTuning = BandTuning {
    gate: ConfidenceGate::new(0.2),
    band: Band { rest_below: 130.0, peak_above: 160.0 },
    min_rep_interval_ms: 1000.0,
};

/// Knee angle (degrees); front knee bends deeper than in a squat
pub const LUNGE: BandTuning = BandTuning {
    gate: ConfidenceGate::new(0.2),
    band: Band { rest_below: 110.0, peak_above: 150.0 },
    min_rep_interval_ms: 1200.0,
};

/// Knee rise over the hip (px), higher knee wins
pub const HIGH_KNEES: BandTuning = BandTuning {
    gate: ConfidenceGate::new(0.2),
    band: Band { rest_below: 10.0, peak_above: 30.0 },
    min_rep_interval_ms: 400.0,
};

pub fn detect_squat(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    SQUAT.run(frame, state, &LEGS, min_knee_angle)
}

pub fn detect_lunge(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    LUNGE.run(frame, state, &LEGS, min_knee_angle)
}

pub fn detect_high_knees(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    HIGH_KNEES.run(frame, state, &HIPS_AND_KNEES, knee_rise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::{body, hinge, place};
    use crate::detectors::{ExerciseKind, Phase};
    use crate::pose::Keypoint;

    fn legs(left_deg: f32, right_deg: f32) -> Vec<Keypoint> {
        let mut kps = body();
        hinge(&mut kps, (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE), (260.0, 400.0), left_deg);
        hinge(&mut kps, (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE), (140.0, 400.0), right_deg);
        kps
    }

    #[test]
    fn test_squat_uses_more_bent_knee() {
        let state = DetectorState::initial(ExerciseKind::Squat);
        let one_deep = legs(170.0, 100.0);
        let next = detect_squat(&Frame::new(&one_deep, 0.0), state);
        assert_eq!(next.phase, Phase::Down);
    }

    #[test]
    fn test_squat_standing_start_does_not_count() {
        let state = DetectorState::initial(ExerciseKind::Squat);
        let standing = legs(170.0, 170.0);
        assert_eq!(detect_squat(&Frame::new(&standing, 0.0), state), state);
    }

    #[test]
    fn test_squat_partial_depth_is_ignored() {
        let state = DetectorState::initial(ExerciseKind::Squat);
        let half = legs(145.0, 145.0);
        assert_eq!(detect_squat(&Frame::new(&half, 0.0), state), state);
    }

    #[test]
    fn test_lunge_cycle() {
        let mut state = DetectorState::initial(ExerciseKind::Lunge);
        state = detect_lunge(&Frame::new(&legs(95.0, 160.0), 0.0), state);
        assert_eq!((state.phase, state.rep_count), (Phase::Down, 0));
        // a squat-depth 120° is still inside the lunge band
        state = detect_lunge(&Frame::new(&legs(120.0, 160.0), 500.0), state);
        assert_eq!(state.phase, Phase::Down);
        state = detect_lunge(&Frame::new(&legs(165.0, 165.0), 1000.0), state);
        assert_eq!((state.phase, state.rep_count), (Phase::Up, 1));
    }

    #[test]
    fn test_high_knees() {
        let mut kps = body();
        place(&mut kps, LEFT_HIP, 250.0, 300.0);
        place(&mut kps, RIGHT_HIP, 150.0, 300.0);
        place(&mut kps, LEFT_KNEE, 250.0, 400.0);
        place(&mut kps, RIGHT_KNEE, 150.0, 260.0);

        let state = DetectorState::initial(ExerciseKind::HighKnees);
        let up = detect_high_knees(&Frame::new(&kps, 0.0), state);
        assert_eq!((up.phase, up.rep_count), (Phase::Up, 1));

        place(&mut kps, RIGHT_KNEE, 150.0, 400.0);
        let down = detect_high_knees(&Frame::new(&kps, 200.0), up);
        assert_eq!((down.phase, down.rep_count), (Phase::Down, 1));
    }

    #[test]
    fn test_high_knees_ignores_missing_knee_score() {
        let mut kps = body();
        place(&mut kps, RIGHT_KNEE, 150.0, 0.0);
        kps[LEFT_KNEE].score = None;
        let state = DetectorState::initial(ExerciseKind::HighKnees);
        assert_eq!(detect_high_knees(&Frame::new(&kps, 0.0), state), state);
    }
}
