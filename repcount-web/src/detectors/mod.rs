//! Detectors module - one pure state machine per exercise
//!
//! Re-exports only, plus the dispatch table.

mod cycle;
mod full_body;
mod kind;
mod lower_body;
mod readout;
mod state;
mod torso;
mod upper_body;

#[cfg(test)]
pub(crate) mod testing;

pub use cycle::{Band, BandTuning};
pub use full_body::{
    detect_jumping_jack, detect_mountain_climber, JumpingJackTuning, MountainClimberTuning,
    JUMPING_JACK, MOUNTAIN_CLIMBER,
};
pub use kind::{ExerciseKind, Phase};
pub use lower_body::{detect_high_knees, detect_lunge, detect_squat, HIGH_KNEES, LUNGE, SQUAT};
pub use readout::{readout, Readout, Unit};
pub use state::{DetectorState, ExerciseEvent, Frame};
pub use torso::{detect_crunch, detect_side_bend, SideBendTuning, CRUNCH, SIDE_BEND};
pub use upper_body::{
    detect_arm_circles, detect_arm_raise, detect_pushup, ArmCirclesTuning, ARM_CIRCLES,
    ARM_RAISE, PUSHUP,
};

/// `(frame, previous) -> next`; must not look at anything else
pub type Detector = fn(&Frame<'_>, DetectorState) -> DetectorState;

pub fn detector_for(kind: ExerciseKind) -> Detector {
    match kind {
        ExerciseKind::ArmRaise => detect_arm_raise,
        ExerciseKind::Pushup => detect_pushup,
        ExerciseKind::Squat => detect_squat,
        ExerciseKind::JumpingJack => detect_jumping_jack,
        ExerciseKind::Crunch => detect_crunch,
        ExerciseKind::Lunge => detect_lunge,
        ExerciseKind::SideBend => detect_side_bend,
        ExerciseKind::HighKnees => detect_high_knees,
        ExerciseKind::ArmCircles => detect_arm_circles,
        ExerciseKind::MountainClimber => detect_mountain_climber,
    }
}

/// Run the detector for `state.exercise`
pub fn detect(frame: &Frame<'_>, state: DetectorState) -> DetectorState {
    detector_for(state.exercise)(frame, state)
}
