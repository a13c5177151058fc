//! Geometry module - joint angles, displacements, confidence gating
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod confidence_gate;
mod displacement;

pub use angles::angle_at;
pub use confidence_gate::ConfidenceGate;
pub use displacement::{
    height_above, horizontal_distance, midpoint, normalized_spread, vertical_displacement,
};
