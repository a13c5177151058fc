//! Driving-metric readout for the overlay
//!
//! Recomputes the number each detector thresholds so the overlay can show
//! why a phase did or did not change. Not used for counting.

use std::fmt;

use super::kind::ExerciseKind;
use super::state::Frame;
use super::{full_body, lower_body, torso, upper_body};
use crate::pose::{Keypoint, LANDMARK_COUNT};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Unit {
    Degrees,
    Pixels,
    /// Multiples of shoulder width
    Ratio,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Readout {
    pub label: &'static str,
    pub value: f32,
    pub unit: Unit,
}

impl Readout {
    fn new(label: &'static str, value: f32, unit: Unit) -> Self {
        Self { label, value, unit }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.value.is_finite() {
            return write!(f, "{}: --", self.label);
        }
        match self.unit {
            Unit::Degrees => write!(f, "{}: {:.0}°", self.label, self.value),
            Unit::Pixels => write!(f, "{}: {:.0}px", self.label, self.value),
            Unit::Ratio => write!(f, "{}: {:.2}x", self.label, self.value),
        }
    }
}

/// Metrics for `kind` from a full 33-point pose; empty for anything shorter
pub fn readout(kind: ExerciseKind, keypoints: &[Keypoint]) -> Vec<Readout> {
    if keypoints.len() < LANDMARK_COUNT {
        return Vec::new();
    }
    let frame = Frame::new(keypoints, 0.0);

    match kind {
        ExerciseKind::ArmRaise => {
            vec![Readout::new("wrist rise", upper_body::wrist_rise(&frame).0, Unit::Pixels)]
        }
        ExerciseKind::Pushup => {
            vec![Readout::new("elbow", upper_body::min_elbow_angle(&frame), Unit::Degrees)]
        }
        ExerciseKind::Squat | ExerciseKind::Lunge => {
            vec![Readout::new("knee", lower_body::min_knee_angle(&frame), Unit::Degrees)]
        }
        ExerciseKind::JumpingJack => {
            let (arms, legs) = full_body::spreads(&frame);
            vec![
                Readout::new("arms", arms, Unit::Ratio),
                Readout::new("legs", legs, Unit::Ratio),
            ]
        }
        ExerciseKind::Crunch => {
            vec![Readout::new("trunk", torso::trunk_angle(&frame), Unit::Degrees)]
        }
        ExerciseKind::SideBend => {
            let (offset, tilt) = torso::lean(&frame);
            vec![
                Readout::new("offset", offset, Unit::Pixels),
                Readout::new("tilt", tilt, Unit::Pixels),
            ]
        }
        ExerciseKind::HighKnees => {
            vec![Readout::new("knee rise", lower_body::knee_rise(&frame), Unit::Pixels)]
        }
        ExerciseKind::ArmCircles => {
            let (higher, lower) = upper_body::wrist_rise(&frame);
            vec![
                Readout::new("high wrist", higher, Unit::Pixels),
                Readout::new("low wrist", lower, Unit::Pixels),
            ]
        }
        ExerciseKind::MountainClimber => {
            let (plank, rise) = full_body::driving_leg(&frame);
            vec![
                Readout::new("plank", plank, Unit::Degrees),
                Readout::new("knee rise", rise, Unit::Pixels),
            ]
        }
    }
}
