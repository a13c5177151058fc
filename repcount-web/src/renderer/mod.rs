//! Renderer module - skeleton geometry, text readout, WebGPU drawing
//!
//! Re-exports only. All logic in submodules.

#[cfg(target_arch = "wasm32")]
mod gpu;
mod overlay;
mod shapes;
mod skeleton;

#[cfg(target_arch = "wasm32")]
pub use gpu::{GpuError, GpuOverlay};
pub use overlay::{overlay_text, rep_flash_active};
pub use shapes::{premultiply, push_circle, push_line, to_clip_space, Vertex};
pub use skeleton::{build_vertices, connections};
