//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod camera;
mod console;
mod estimator;
mod session;

pub use console::init_logging;
pub use session::{exercise_catalog, WorkoutSession};
