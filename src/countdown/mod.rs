//! Countdown timer
//!
//! The engine is a plain state machine; nothing here reads a clock.

pub mod duration;
pub mod engine;

pub use duration::{CountdownUnit, DurationComponents, ResolvedDuration};
pub use engine::{CountdownEngine, CountdownEvent, CountdownState, CountdownStatus};
