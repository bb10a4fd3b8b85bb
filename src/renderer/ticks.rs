//! Ring separators
//!
//! Radial tick marks laid across a ring at its unit boundaries. Ticks are
//! backend-neutral like arc instructions; a surface strokes each one as a
//! short line in the background color.

use glam::Vec2;
use serde::Serialize;

use crate::face::ArcKey;
use crate::polar_to_cartesian;
use crate::settings::SeparatorMode;

/// Stroke width of a regular separator
pub const SEPARATOR_WIDTH: f32 = 2.0;
/// Ruler mode: full-width tick every fifth step
pub const RULER_MAJOR_WIDTH: f32 = 2.5;
/// Ruler mode: half-width tick on the other steps
pub const RULER_MINOR_WIDTH: f32 = 1.5;
/// Ruler mode: the middle subdivision of an hour
pub const RULER_HALF_HOUR_WIDTH: f32 = 2.0;
/// Ruler mode splits each hour/month division this many ways
pub const RULER_SUBDIVISIONS: u32 = 4;

/// One radial tick mark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickInstruction {
    pub key: ArcKey,
    pub angle_degrees: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub line_width: f32,
    /// Spans the whole ring width
    pub major: bool,
}

impl TickInstruction {
    /// Line endpoints relative to the face center, inner first
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        let theta = self.angle_degrees.to_radians();
        (
            polar_to_cartesian(self.inner_radius, theta),
            polar_to_cartesian(self.outer_radius, theta),
        )
    }
}

/// Ring a set of ticks is laid across
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRing {
    pub key: ArcKey,
    pub radius: f32,
    pub line_width: f32,
    /// Unit steps in one turn (60 for seconds, days in the month, ...)
    pub divisions: u32,
}

impl TickRing {
    fn tick(&self, zero: f32, turn: f32, full: bool, line_width: f32) -> TickInstruction {
        let half = self.line_width / 2.0;
        TickInstruction {
            key: self.key,
            angle_degrees: zero + turn * 360.0,
            inner_radius: if full { self.radius - half } else { self.radius },
            outer_radius: self.radius + half,
            line_width,
            major: full,
        }
    }
}

/// Separators for one ring
pub fn separator_ticks(mode: SeparatorMode, ring: TickRing, zero: f32) -> Vec<TickInstruction> {
    let count = ring.divisions;
    if count == 0 || ring.radius <= 0.0 {
        return Vec::new();
    }
    let at = |step: u32| step as f32 / count as f32;

    match mode {
        SeparatorMode::Ruler if count == 60 => (0..count)
            .map(|i| {
                let major = i % 5 == 0;
                let width = if major { RULER_MAJOR_WIDTH } else { RULER_MINOR_WIDTH };
                ring.tick(zero, at(i), major, width)
            })
            .collect(),
        // Sixty-step rings only mark every fifth step
        _ if count == 60 => (0..12)
            .map(|i| ring.tick(zero, at(i * 5), true, SEPARATOR_WIDTH))
            .collect(),
        _ => {
            let mut ticks: Vec<TickInstruction> = (0..count)
                .map(|i| ring.tick(zero, at(i), true, SEPARATOR_WIDTH))
                .collect();
            if mode == SeparatorMode::Ruler && matches!(ring.key, ArcKey::Hours | ArcKey::Month) {
                let sub = RULER_SUBDIVISIONS;
                for i in 0..count {
                    for j in 1..sub {
                        let turn = (i as f32 + j as f32 / sub as f32) / count as f32;
                        let width = if ring.key == ArcKey::Hours && j * 2 == sub {
                            RULER_HALF_HOUR_WIDTH
                        } else {
                            RULER_MINOR_WIDTH
                        };
                        ticks.push(ring.tick(zero, turn, false, width));
                    }
                }
            }
            ticks
        }
    }
}
