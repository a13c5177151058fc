//! RepCount Web - exercise repetition counting from pose keypoints
//!
//! Entry point for the WASM module. Only contains:
//! - Module declarations
//! - The wasm start hook and re-exports
//!
//! Everything outside `bridge` (and the GPU half of `renderer`) is plain
//! Rust and runs on the host, which is where the tests run.

pub mod config;
pub mod detectors;
pub mod error;
pub mod geometry;
pub mod pose;
pub mod renderer;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod bridge;

pub use config::SessionConfig;
pub use detectors::{DetectorState, ExerciseEvent, ExerciseKind, Frame, Phase};
pub use error::{AcquisitionError, Error, Result};
pub use pose::{Keypoint, Pose};
pub use session::{ProgressLog, ProgressRecord, ProgressSink, SessionController, SessionStatus};

#[cfg(target_arch = "wasm32")]
pub use bridge::{exercise_catalog, WorkoutSession};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when the WASM module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    bridge::init_logging(level);
}
