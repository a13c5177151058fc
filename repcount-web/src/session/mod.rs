//! Session module - frame loop state, lifecycle, recovery, progress output
//!
//! Re-exports only. All logic in submodules.

mod controller;
mod recovery;
mod resources;
mod sink;
mod throttle;

pub use controller::{
    AcquireTicket, FrameOutcome, FrameTicket, RepCallback, SessionController, SessionStatus,
};
pub use recovery::{RetryPolicy, TrackingMonitor, TrackingVerdict};
pub use resources::{CameraStream, Pipeline, PoseModel};
pub use sink::{NullSink, ProgressLog, ProgressRecord, ProgressSink};
pub use throttle::FrameThrottle;
