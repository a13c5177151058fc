//! Exercise catalog and phase tags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The ten supported exercises
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseKind {
    ArmRaise,
    Pushup,
    Squat,
    JumpingJack,
    Crunch,
    Lunge,
    SideBend,
    HighKnees,
    ArmCircles,
    MountainClimber,
}

/// Where the detector currently is within one repetition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Up,
    Down,
    Open,
    Closed,
    Center,
    Bent,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Up => "up",
            Phase::Down => "down",
            Phase::Open => "open",
            Phase::Closed => "closed",
            Phase::Center => "center",
            Phase::Bent => "bent",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 10] = [
        ExerciseKind::ArmRaise,
        ExerciseKind::Pushup,
        ExerciseKind::Squat,
        ExerciseKind::JumpingJack,
        ExerciseKind::Crunch,
        ExerciseKind::Lunge,
        ExerciseKind::SideBend,
        ExerciseKind::HighKnees,
        ExerciseKind::ArmCircles,
        ExerciseKind::MountainClimber,
    ];

    /// Identifier used by the page and in progress records
    pub fn id(&self) -> &'static str {
        match self {
            ExerciseKind::ArmRaise => "armRaise",
            ExerciseKind::Pushup => "pushup",
            ExerciseKind::Squat => "squat",
            ExerciseKind::JumpingJack => "jumpingJack",
            ExerciseKind::Crunch => "crunch",
            ExerciseKind::Lunge => "lunge",
            ExerciseKind::SideBend => "sideBend",
            ExerciseKind::HighKnees => "highKnees",
            ExerciseKind::ArmCircles => "armCircles",
            ExerciseKind::MountainClimber => "mountainClimber",
        }
    }

    /// Catalog identifier (kebab-case) accepted as an alias
    fn catalog_id(&self) -> &'static str {
        match self {
            ExerciseKind::ArmRaise => "arm-raise",
            ExerciseKind::Pushup => "push-up",
            ExerciseKind::Squat => "squat",
            ExerciseKind::JumpingJack => "jumping-jacks",
            ExerciseKind::Crunch => "crunch",
            ExerciseKind::Lunge => "lunge",
            ExerciseKind::SideBend => "side-bend",
            ExerciseKind::HighKnees => "high-knees",
            ExerciseKind::ArmCircles => "arm-circles",
            ExerciseKind::MountainClimber => "mountain-climber",
        }
    }

    /// Plural name shown in the overlay readout
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseKind::ArmRaise => "Arm Raises",
            ExerciseKind::Pushup => "Pushups",
            ExerciseKind::Squat => "Squats",
            ExerciseKind::JumpingJack => "Jumping Jacks",
            ExerciseKind::Crunch => "Crunches",
            ExerciseKind::Lunge => "Lunges",
            ExerciseKind::SideBend => "Side Bends",
            ExerciseKind::HighKnees => "High Knees",
            ExerciseKind::ArmCircles => "Arm Circles",
            ExerciseKind::MountainClimber => "Mountain Climbers",
        }
    }

    /// (rest, peak) phases; a rep counts on the rest → peak edge
    pub fn phases(&self) -> (Phase, Phase) {
        match self {
            ExerciseKind::JumpingJack => (Phase::Closed, Phase::Open),
            ExerciseKind::SideBend => (Phase::Center, Phase::Bent),
            _ => (Phase::Down, Phase::Up),
        }
    }

    /// Phase a fresh session starts in
    ///
    /// Exercises whose rep ends by returning to the starting posture
    /// start at the peak so that standing (or holding a plank) before the
    /// first rep does not count.
    pub fn initial_phase(&self) -> Phase {
        let (rest, peak) = self.phases();
        match self {
            ExerciseKind::Pushup
            | ExerciseKind::Squat
            | ExerciseKind::Lunge
            | ExerciseKind::Crunch => peak,
            _ => rest,
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted || kind.catalog_id() == wanted)
            .ok_or_else(|| Error::UnknownExercise(s.to_string()))
    }
}
