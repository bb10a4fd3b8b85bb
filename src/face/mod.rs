//! Clock face model
//!
//! - `arc`: the fixed arc catalogue and per-arc visibility
//! - `sample`: per-frame readings for each ring
//! - `layout`: ring radii and stroke widths for a viewport
//! - `band`: polar geometry of one drawn arc

pub mod arc;
pub mod band;
pub mod layout;
pub mod sample;

pub use arc::{ArcDefinition, ArcDefinitionRegistry, ArcKey, CATALOGUE};
pub use band::ArcBand;
pub use layout::{RING_ORDER, RingLayout, RingSlot, Viewport};
pub use sample::{ClockMode, ClockSample, SampleContext, TimeSampler, UnitReading};
