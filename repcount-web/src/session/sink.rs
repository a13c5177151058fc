//! Progress sink - where counted reps go
//!
//! The quest/XP side of the application consumes `ProgressRecord`s. The
//! session calls `submit` once per counted rep and only logs failures.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::detectors::ExerciseKind;
use crate::error::SinkError;

/// One counted rep as seen by the progress consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub exercise_type: ExerciseKind,
    /// Cumulative count after this rep
    pub reps: u32,
    /// Confidence of the pose that completed the rep
    pub confidence: f32,
    /// Milliseconds since the Unix epoch
    pub timestamp: f64,
}

impl ProgressRecord {
    pub fn to_json(&self) -> Result<String, SinkError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub trait ProgressSink {
    fn submit(&mut self, record: ProgressRecord) -> Result<(), SinkError>;
}

/// Lets the caller keep a handle on a sink it hands to the session
impl<S: ProgressSink> ProgressSink for Rc<RefCell<S>> {
    fn submit(&mut self, record: ProgressRecord) -> Result<(), SinkError> {
        self.borrow_mut().submit(record)
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn submit(&mut self, _record: ProgressRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY EXERCISE LOG
// ============================================================================

/// Append-only record of this session's reps
#[derive(Debug, Default, Clone)]
pub struct ProgressLog {
    records: Vec<ProgressRecord>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: ProgressRecord) {
        self.records.push(record);
    }

    pub fn entries(&self) -> &[ProgressRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_type(&self, kind: ExerciseKind) -> impl Iterator<Item = &ProgressRecord> + '_ {
        self.records.iter().filter(move |r| r.exercise_type == kind)
    }

    /// Reps of `kind` logged strictly after `since_ms` by a pose scoring
    /// at least `min_confidence` (quest progress query)
    pub fn reps_since(&self, kind: ExerciseKind, since_ms: f64, min_confidence: f32) -> usize {
        self.by_type(kind)
            .filter(|r| r.timestamp > since_ms && r.confidence >= min_confidence)
            .count()
    }

    /// Highest cumulative count logged for `kind`
    pub fn best(&self, kind: ExerciseKind) -> u32 {
        self.by_type(kind).map(|r| r.reps).max().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn to_json(&self) -> Result<String, SinkError> {
        Ok(serde_json::to_string(&self.records)?)
    }
}

impl ProgressSink for ProgressLog {
    fn submit(&mut self, record: ProgressRecord) -> Result<(), SinkError> {
        self.record(record);
        Ok(())
    }
}
