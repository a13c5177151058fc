//! Detector state - the value each detector threads through frames

use super::kind::{ExerciseKind, Phase};
use crate::geometry::{angle_at, height_above};
use crate::pose::Keypoint;

/// Per-session repetition state for one exercise
///
/// `Copy` so a detector can hand back its input untouched when a frame
/// carries nothing usable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorState {
    pub exercise: ExerciseKind,
    pub phase: Phase,
    /// Never decreases within a session
    pub rep_count: u32,
    /// Frame timestamp of the last counted rep (cooldown reference)
    pub last_rep_ms: Option<f64>,
}

impl DetectorState {
    /// Fresh state: initial phase, zero reps
    pub fn initial(exercise: ExerciseKind) -> Self {
        Self {
            exercise,
            phase: exercise.initial_phase(),
            rep_count: 0,
            last_rep_ms: None,
        }
    }
}

/// Raised when a frame moved the count up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExerciseEvent {
    pub exercise: ExerciseKind,
    pub cumulative_reps: u32,
}

impl ExerciseEvent {
    /// Event for a `before → after` transition, if the count increased
    pub fn between(before: &DetectorState, after: &DetectorState) -> Option<Self> {
        (after.rep_count > before.rep_count).then_some(Self {
            exercise: after.exercise,
            cumulative_reps: after.rep_count,
        })
    }
}

/// One frame's keypoints with the time they were captured
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub keypoints: &'a [Keypoint],
    pub timestamp_ms: f64,
}

impl<'a> Frame<'a> {
    pub fn new(keypoints: &'a [Keypoint], timestamp_ms: f64) -> Self {
        Self {
            keypoints,
            timestamp_ms,
        }
    }

    // Accessors below index directly: only call them for keypoints the
    // confidence gate already admitted.

    pub(crate) fn xy(&self, index: usize) -> (f32, f32) {
        self.keypoints[index].xy()
    }

    /// Angle at joint `b` in degrees
    pub(crate) fn angle(&self, a: usize, b: usize, c: usize) -> f32 {
        angle_at(self.xy(a), self.xy(b), self.xy(c))
    }

    /// Pixels `point` sits above `reference`
    pub(crate) fn height_above(&self, point: usize, reference: usize) -> f32 {
        height_above(self.xy(point), self.xy(reference))
    }
}
