//! Polar Clock - a radial clock face made of concentric time-unit arcs
//!
//! Core modules:
//! - `face`: Arc catalogue, time sampling and ring layout
//! - `countdown`: Countdown timer state machine
//! - `theme`: Color presets and palette resolution
//! - `renderer`: Arc draw instructions and drawing surfaces
//! - `render_loop`: Per-frame driver and UI event dispatch
//! - `platform`: Injectable clock sources

pub mod countdown;
pub mod error;
pub mod face;
pub mod platform;
pub mod render_loop;
pub mod renderer;
pub mod settings;
pub mod theme;

pub use error::{ClockError, Result};
pub use render_loop::{ClockMode, FrameReport, RenderLoop, UiEvent};
pub use settings::{HourFormat, LabelMode, SeparatorMode, Settings};

use glam::Vec2;

/// Clock face constants
pub mod consts {
    /// Default zero point of every arc (twelve o'clock), in degrees
    pub const ZERO_ANGLE_DEGREES: f32 = -90.0;
    /// Largest accepted zero angle magnitude
    pub const MAX_ZERO_ANGLE_DEGREES: f32 = 360.0;
    /// Frame cadence of the native loop
    pub const FRAME_INTERVAL_MS: u64 = 16;

    /// Ring radius as a share of the half-viewport
    pub const BASE_RADIUS_SCALE: f32 = 0.9;
    /// Stroke width of a regular ring, relative to the base radius
    pub const RING_WIDTH_RATIO: f32 = 6.0 / 57.0;
    /// Gap between rings, relative to the base radius
    pub const RING_GAP_RATIO: f32 = 1.875 / 57.0;
    /// Thin rings (day-of-week, week-of-year) use this share of the regular width
    pub const THIN_RING_SCALE: f32 = 0.5;

    /// Flow mode switches preset on every minute divisible by this
    pub const FLOW_MODE_MINUTES: u32 = 5;

    pub const SECOND_MS: u64 = 1_000;
    pub const MINUTE_MS: u64 = 60 * SECOND_MS;
    pub const HOUR_MS: u64 = 60 * MINUTE_MS;
    pub const DAY_MS: u64 = 24 * HOUR_MS;
}

/// Normalized angle to [-180, 180) degrees
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Convert polar (r, theta in radians) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
