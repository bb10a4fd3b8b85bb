//! Ring layout
//!
//! Stacks the drawn arcs into concentric rings that fit the viewport.

use serde::{Deserialize, Serialize};

use super::arc::ArcKey;
use crate::consts::{BASE_RADIUS_SCALE, RING_GAP_RATIO, RING_WIDTH_RATIO, THIN_RING_SCALE};

/// Outermost-first stacking order of the rings
pub const RING_ORDER: [ArcKey; 7] = [
    ArcKey::WeekOfYear,
    ArcKey::Seconds,
    ArcKey::Minutes,
    ArcKey::Hours,
    ArcKey::Day,
    ArcKey::Month,
    ArcKey::DayOfWeek,
];

/// Drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Radius available to the outermost ring
    pub fn base_radius(&self) -> f32 {
        (self.width / 2.0).min(self.height / 2.0) * BASE_RADIUS_SCALE
    }
}

/// Position of one ring on the face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingSlot {
    pub key: ArcKey,
    /// 0 is the outermost drawn ring
    pub ring_index: usize,
    /// Centerline radius
    pub radius: f32,
    pub line_width: f32,
}

/// Computed ring positions for one set of drawn arcs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingLayout {
    slots: Vec<RingSlot>,
}

impl RingLayout {
    /// Lay out `keys` inside `viewport`; keys not listed get no ring
    pub fn compute(viewport: Viewport, keys: &[ArcKey]) -> Self {
        let base = viewport.base_radius();
        let regular = RING_WIDTH_RATIO * base;
        let gap = RING_GAP_RATIO * base;
        let width_of = |key: ArcKey| {
            if key.is_thin() {
                regular * THIN_RING_SCALE
            } else {
                regular
            }
        };

        let drawn: Vec<ArcKey> = RING_ORDER
            .into_iter()
            .filter(|key| keys.contains(key))
            .collect();
        let total_width: f32 = drawn.iter().map(|&k| width_of(k)).sum();
        let total_gap = drawn.len().saturating_sub(1) as f32 * gap;

        // Center the stack of rings around base / 2
        let mut current = (base + total_width + total_gap) / 2.0;
        let slots = drawn
            .into_iter()
            .enumerate()
            .map(|(ring_index, key)| {
                let line_width = width_of(key);
                let slot = RingSlot {
                    key,
                    ring_index,
                    radius: current - line_width / 2.0,
                    line_width,
                };
                current -= line_width + gap;
                slot
            })
            .collect();

        Self { slots }
    }

    pub fn slot(&self, key: ArcKey) -> Option<&RingSlot> {
        self.slots.iter().find(|s| s.key == key)
    }

    /// Slots, outermost first
    pub fn slots(&self) -> &[RingSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
