//! Session controller - the per-frame dispatcher
//!
//! Owns the active exercise, its detector state, the camera/model pipeline
//! and the recovery policy. Everything asynchronous (camera access, model
//! load, estimation) runs outside. The driver asks for a ticket, does the
//! work, and reports back with that ticket; a ticket from before a switch,
//! teardown or restart no longer matches and its result is discarded.

use log::{debug, error, info, warn};

use super::recovery::{RetryPolicy, TrackingMonitor, TrackingVerdict};
use super::resources::Pipeline;
use super::sink::{ProgressRecord, ProgressSink};
use super::throttle::FrameThrottle;
use crate::config::SessionConfig;
use crate::detectors::{detect, DetectorState, ExerciseEvent, ExerciseKind, Frame};
use crate::error::AcquisitionError;
use crate::pose::{select_pose, Pose};

// ============================================================================
// STATUS & TICKETS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Idle,
    /// Acquisition wanted, driver has not picked it up yet
    Pending { attempt: u32 },
    Acquiring { attempt: u32 },
    RetryScheduled { attempt: u32, retry_at_ms: f64 },
    Running,
    /// Retries used up; only `activate` leaves this state
    Failed(AcquisitionError),
}

impl SessionStatus {
    /// Between `activate` and `deactivate`, and not failed
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionStatus::Idle | SessionStatus::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Pending { .. } | SessionStatus::Acquiring { .. } => "starting",
            SessionStatus::RetryScheduled { .. } => "retrying",
            SessionStatus::Running => "running",
            SessionStatus::Failed(_) => "failed",
        }
    }
}

/// Handed out for one camera + model acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTicket {
    pub attempt: u32,
    epoch: u64,
}

/// Handed out for one pose estimation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTicket {
    /// Timestamp the detectors see for this frame
    pub captured_at_ms: f64,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Result belongs to a pipeline that no longer exists
    Stale,
    /// No usable pose; state kept
    TrackingLost { lost_for_ms: f64 },
    /// Lost for too long; pipeline released and reacquisition queued
    Reinitializing,
    Tracked {
        pose: Pose,
        state: DetectorState,
        event: Option<ExerciseEvent>,
    },
}

/// `(exercise id, cumulative reps)`, called synchronously on every rep
pub type RepCallback = Box<dyn FnMut(&str, u32)>;

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct SessionController {
    config: SessionConfig,
    state: DetectorState,
    status: SessionStatus,
    /// Bumped whenever the pipeline goes away; outstanding tickets die
    epoch: u64,
    pipeline: Option<Pipeline>,
    in_flight: bool,
    throttle: FrameThrottle,
    tracking: TrackingMonitor,
    retry: RetryPolicy,
    /// Estimation rejections since the last tracked frame
    estimation_failures: u32,
    sink: Box<dyn ProgressSink>,
    on_rep: Option<RepCallback>,
}

impl SessionController {
    pub fn new(config: SessionConfig, exercise: ExerciseKind, sink: Box<dyn ProgressSink>) -> Self {
        Self {
            state: DetectorState::initial(exercise),
            status: SessionStatus::Idle,
            epoch: 0,
            pipeline: None,
            in_flight: false,
            throttle: FrameThrottle::new(config.target_fps),
            tracking: TrackingMonitor::new(config.tracking_grace_ms),
            retry: RetryPolicy::new(config.max_retries, config.retry_base_delay_ms),
            estimation_failures: 0,
            sink,
            on_rep: None,
            config,
        }
    }

    pub fn set_rep_callback(&mut self, callback: RepCallback) {
        self.on_rep = Some(callback);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.state.exercise
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn is_estimating(&self) -> bool {
        self.in_flight
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start a session, or retry by hand after `Failed`
    ///
    /// A new session starts from zero reps. No-op while already active.
    pub fn activate(&mut self) {
        if self.status.is_active() {
            return;
        }
        self.state = DetectorState::initial(self.state.exercise);
        self.estimation_failures = 0;
        self.status = SessionStatus::Pending { attempt: 1 };
        info!("session activated for {}", self.state.exercise);
    }

    /// Release camera and model and go idle. Safe to call repeatedly.
    pub fn deactivate(&mut self) {
        if self.status != SessionStatus::Idle {
            info!("session deactivated");
        }
        self.drop_pipeline();
        self.status = SessionStatus::Idle;
    }

    /// Switch exercise; returns false when `kind` is already selected
    pub fn select_exercise(&mut self, kind: ExerciseKind) -> bool {
        if kind == self.state.exercise {
            return false;
        }
        info!("exercise {} -> {kind}", self.state.exercise);

        self.drop_pipeline();
        self.state = DetectorState::initial(kind);
        self.estimation_failures = 0;
        if self.status.is_active() {
            self.status = SessionStatus::Pending { attempt: 1 };
        }
        true
    }

    // ------------------------------------------------------------------
    // Acquisition
    // ------------------------------------------------------------------

    /// Ticket for the next acquisition attempt, once one is due
    pub fn poll_acquisition(&mut self, now_ms: f64) -> Option<AcquireTicket> {
        let attempt = match self.status {
            SessionStatus::Pending { attempt } => attempt,
            SessionStatus::RetryScheduled { attempt, retry_at_ms } if now_ms >= retry_at_ms => {
                attempt
            }
            _ => return None,
        };

        debug!("acquisition attempt {attempt}");
        self.status = SessionStatus::Acquiring { attempt };
        Some(AcquireTicket {
            attempt,
            epoch: self.epoch,
        })
    }

    /// Install a freshly acquired pipeline
    ///
    /// Returns false (and releases `pipeline`) when the ticket is stale.
    pub fn acquisition_succeeded(&mut self, ticket: AcquireTicket, pipeline: Pipeline) -> bool {
        if !self.accepts(ticket) {
            debug!("releasing late pipeline from attempt {}", ticket.attempt);
            pipeline.release();
            return false;
        }

        info!("pipeline ready after {} attempt(s)", ticket.attempt);
        self.pipeline = Some(pipeline);
        self.status = SessionStatus::Running;
        self.in_flight = false;
        self.throttle.reset();
        self.tracking.reset();
        true
    }

    pub fn acquisition_failed(&mut self, ticket: AcquireTicket, err: AcquisitionError, now_ms: f64) {
        if !self.accepts(ticket) {
            debug!("ignoring late failure: {err}");
            return;
        }

        match self.retry.delay_after(ticket.attempt) {
            Some(delay_ms) => {
                warn!("attempt {} failed ({err}), retrying in {delay_ms}ms", ticket.attempt);
                self.status = SessionStatus::RetryScheduled {
                    attempt: ticket.attempt + 1,
                    retry_at_ms: now_ms + delay_ms,
                };
            }
            None => {
                error!("giving up after {} attempt(s): {err}", ticket.attempt);
                self.status = SessionStatus::Failed(err);
            }
        }
    }

    fn accepts(&self, ticket: AcquireTicket) -> bool {
        ticket.epoch == self.epoch
            && self.status == SessionStatus::Acquiring { attempt: ticket.attempt }
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Ticket to estimate the current video frame, or `None` when the
    /// frame must be dropped (not running, estimation in flight, too soon)
    pub fn begin_frame(&mut self, now_ms: f64) -> Option<FrameTicket> {
        if self.status != SessionStatus::Running || self.pipeline.is_none() || self.in_flight {
            return None;
        }
        if !self.throttle.admit(now_ms) {
            return None;
        }
        self.in_flight = true;
        Some(FrameTicket {
            captured_at_ms: now_ms,
            epoch: self.epoch,
        })
    }

    /// Feed the estimator's poses for a frame through the active detector
    pub fn complete_frame(&mut self, ticket: FrameTicket, poses: Vec<Pose>) -> FrameOutcome {
        if ticket.epoch != self.epoch {
            return FrameOutcome::Stale;
        }
        self.in_flight = false;
        let now_ms = ticket.captured_at_ms;

        let Some(pose) = select_pose(poses, self.config.pose_confidence_floor) else {
            return match self.tracking.lost(now_ms) {
                TrackingVerdict::Tolerated { lost_for_ms } => {
                    FrameOutcome::TrackingLost { lost_for_ms }
                }
                TrackingVerdict::Expired => {
                    warn!(
                        "no pose for over {}ms, restarting camera and model",
                        self.config.tracking_grace_ms
                    );
                    self.restart();
                    FrameOutcome::Reinitializing
                }
            };
        };
        self.tracking.found();
        self.estimation_failures = 0;

        let before = self.state;
        let after = detect(&Frame::new(&pose.keypoints, now_ms), before);
        self.state = after;

        let event = ExerciseEvent::between(&before, &after);
        if let Some(event) = event {
            self.emit(event, pose.confidence(), now_ms);
        }

        FrameOutcome::Tracked {
            pose,
            state: after,
            event,
        }
    }

    /// Estimation rejected: tear down and retry with backoff
    ///
    /// Rejections only stop counting against the retry budget once a
    /// frame is tracked again.
    pub fn frame_failed(&mut self, ticket: FrameTicket, err: AcquisitionError, now_ms: f64) {
        if ticket.epoch != self.epoch {
            return;
        }
        self.drop_pipeline();
        self.estimation_failures += 1;

        match self.retry.delay_after(self.estimation_failures) {
            Some(delay_ms) => {
                warn!("{err}; restarting pipeline in {delay_ms}ms");
                self.status = SessionStatus::RetryScheduled {
                    attempt: 1,
                    retry_at_ms: now_ms + delay_ms,
                };
            }
            None => {
                error!(
                    "estimation failed {} times in a row, giving up: {err}",
                    self.estimation_failures
                );
                self.status = SessionStatus::Failed(err);
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit(&mut self, event: ExerciseEvent, confidence: f32, timestamp: f64) {
        let record = ProgressRecord {
            exercise_type: event.exercise,
            reps: event.cumulative_reps,
            confidence,
            timestamp,
        };
        if let Err(err) = self.sink.submit(record) {
            warn!("progress not recorded: {err}");
        }
        if let Some(callback) = self.on_rep.as_mut() {
            callback(event.exercise.id(), event.cumulative_reps);
        }
    }

    /// Reacquire after tracking loss, keeping the count
    fn restart(&mut self) {
        self.drop_pipeline();
        self.status = SessionStatus::Pending { attempt: 1 };
    }

    /// Release resources and invalidate every outstanding ticket
    fn drop_pipeline(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.release();
        }
        self.epoch += 1;
        self.in_flight = false;
        self.throttle.reset();
        self.tracking.reset();
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.release();
        }
    }
}
