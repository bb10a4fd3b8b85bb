//! Rendering module
//!
//! `ArcRenderer` produces backend-neutral arc and tick instructions; surfaces
//! turn them into pixels (canvas on wasm32) or keep them for inspection.

pub mod arcs;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod ticks;

pub use arcs::{ArcInstruction, ArcRenderer, DrawingSurface, RecordingSurface};
pub use ticks::TickInstruction;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
