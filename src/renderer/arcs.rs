//! Arc draw instructions
//!
//! One instruction per visible, sampled arc. The renderer never draws by
//! itself; it hands instructions to a `DrawingSurface` in three passes:
//! arcs, separators, labels.

use serde::Serialize;

use super::ticks::{TickInstruction, TickRing, separator_ticks};
use crate::consts::ZERO_ANGLE_DEGREES;
use crate::face::{
    ArcBand, ArcDefinitionRegistry, ArcKey, ClockMode, ClockSample, RingLayout, Viewport,
};
use crate::settings::{SeparatorMode, Settings};
use crate::theme::{Palette, StrokeEffect, Swatch};

/// Everything needed to stroke one ring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcInstruction {
    pub key: ArcKey,
    /// 0 is the outermost drawn ring
    pub ring_index: usize,
    pub radius: f32,
    pub line_width: f32,
    pub start_degrees: f32,
    /// `fraction * 360`, or the rest of the turn when inverse
    pub sweep_degrees: f32,
    pub fraction: f64,
    pub swatch: Swatch,
    pub effect: StrokeEffect,
    pub label: Option<String>,
}

impl ArcInstruction {
    /// Polar band covered by the stroke
    pub fn band(&self) -> ArcBand {
        ArcBand::new(
            self.radius,
            self.line_width,
            self.start_degrees,
            self.sweep_degrees,
        )
    }
}

/// Target the renderer draws into
pub trait DrawingSurface {
    /// Clear the previous frame
    fn begin_frame(&mut self, viewport: Viewport);

    /// Stroke one ring
    fn draw_arc(&mut self, instruction: &ArcInstruction);

    fn draw_tick(&mut self, tick: &TickInstruction);

    /// Label badge, drawn after every arc and tick of the frame
    fn draw_label(&mut self, _instruction: &ArcInstruction, _text: &str) {}
}

/// Headless surface that keeps the last frame's instructions
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub frames: u64,
    pub viewport: Viewport,
    pub instructions: Vec<ArcInstruction>,
    pub ticks: Vec<TickInstruction>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ArcKey) -> Option<&ArcInstruction> {
        self.instructions.iter().find(|i| i.key == key)
    }

    pub fn keys(&self) -> Vec<ArcKey> {
        self.instructions.iter().map(|i| i.key).collect()
    }

    pub fn ticks_for(&self, key: ArcKey) -> Vec<&TickInstruction> {
        self.ticks.iter().filter(|t| t.key == key).collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_frame(&mut self, viewport: Viewport) {
        self.frames += 1;
        self.viewport = viewport;
        self.instructions.clear();
        self.ticks.clear();
    }

    fn draw_arc(&mut self, instruction: &ArcInstruction) {
        self.instructions.push(instruction.clone());
    }

    fn draw_tick(&mut self, tick: &TickInstruction) {
        self.ticks.push(tick.clone());
    }
}

/// Turns a sample and a palette into draw instructions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRenderer {
    /// Where every arc starts, in degrees
    pub zero_degrees: f32,
    pub show_labels: bool,
    pub viewport: Viewport,
    /// Clock mode fills from the current value to the end of the turn
    pub inverse: bool,
    pub show_separators: bool,
    pub separator_mode: SeparatorMode,
}

impl Default for ArcRenderer {
    fn default() -> Self {
        Self {
            zero_degrees: ZERO_ANGLE_DEGREES,
            show_labels: true,
            viewport: Viewport::default(),
            inverse: false,
            show_separators: true,
            separator_mode: SeparatorMode::Standard,
        }
    }
}

impl ArcRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            zero_degrees: settings.zero_angle,
            show_labels: settings.show_labels,
            viewport: settings.viewport,
            inverse: settings.inverse,
            show_separators: settings.show_separators,
            separator_mode: settings.separator_mode,
        }
    }

    /// Instructions for the visible arcs present in `sample`, catalogue order
    pub fn compose(
        &self,
        sample: &ClockSample,
        palette: &Palette,
        registry: &ArcDefinitionRegistry,
    ) -> Vec<ArcInstruction> {
        let keys: Vec<ArcKey> = registry
            .visible_keys()
            .into_iter()
            .filter(|&key| sample.get(key).is_some())
            .collect();
        let layout = RingLayout::compute(self.viewport, &keys);
        let inverse = self.inverse && sample.mode == ClockMode::Clock;

        let mut instructions = Vec::with_capacity(keys.len());
        for key in keys {
            let (Some(reading), Some(slot), Some(swatch)) =
                (sample.get(key), layout.slot(key), palette.color_for(key))
            else {
                log::debug!("No color or ring for {key}, skipped");
                continue;
            };
            let fraction = reading.fraction();
            let filled = fraction as f32 * 360.0;
            let (start_degrees, sweep_degrees) = if inverse {
                (self.zero_degrees + filled, 360.0 - filled)
            } else {
                (self.zero_degrees, filled)
            };
            instructions.push(ArcInstruction {
                key,
                ring_index: slot.ring_index,
                radius: slot.radius,
                line_width: slot.line_width,
                start_degrees,
                sweep_degrees,
                fraction,
                swatch,
                effect: palette.effect(),
                label: self.show_labels.then(|| reading.label.clone()),
            });
        }
        instructions
    }

    /// Separator ticks for the composed arcs (clock mode only)
    pub fn separators(
        &self,
        sample: &ClockSample,
        arcs: &[ArcInstruction],
        registry: &ArcDefinitionRegistry,
    ) -> Vec<TickInstruction> {
        if !self.show_separators || sample.mode != ClockMode::Clock {
            return Vec::new();
        }
        arcs.iter()
            .filter(|arc| registry.has_separators(arc.key))
            .filter_map(|arc| {
                let reading = sample.get(arc.key)?;
                let ring = TickRing {
                    key: arc.key,
                    radius: arc.radius,
                    line_width: arc.line_width,
                    divisions: reading.span.round() as u32,
                };
                Some(separator_ticks(self.separator_mode, ring, self.zero_degrees))
            })
            .flatten()
            .collect()
    }

    /// Clear `surface` and draw one frame; returns the number of arcs drawn
    pub fn render(
        &self,
        sample: &ClockSample,
        palette: &Palette,
        registry: &ArcDefinitionRegistry,
        surface: &mut dyn DrawingSurface,
    ) -> usize {
        let instructions = self.compose(sample, palette, registry);
        let ticks = self.separators(sample, &instructions, registry);

        surface.begin_frame(self.viewport);
        for instruction in &instructions {
            surface.draw_arc(instruction);
        }
        for tick in &ticks {
            surface.draw_tick(tick);
        }
        for instruction in &instructions {
            if let Some(text) = &instruction.label {
                surface.draw_label(instruction, text);
            }
        }
        instructions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{SampleContext, TimeSampler};
    use crate::theme::ThemeEngine;
    use chrono::NaiveDate;

    fn frame(registry: &ArcDefinitionRegistry, renderer: &ArcRenderer) -> RecordingSurface {
        frame_in(ClockMode::Clock, registry, renderer)
    }

    fn frame_in(
        mode: ClockMode,
        registry: &ArcDefinitionRegistry,
        renderer: &ArcRenderer,
    ) -> RecordingSurface {
        let now = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(6, 15, 30)
            .unwrap();
        let ctx = SampleContext {
            now,
            countdown: None,
            registry,
        };
        let sample = TimeSampler::default().sample(mode, &ctx);
        let palette = ThemeEngine::default().palette(registry);
        let mut surface = RecordingSurface::new();
        renderer.render(&sample, &palette, registry, &mut surface);
        surface
    }

    #[test]
    fn test_one_instruction_per_visible_arc() {
        let registry = ArcDefinitionRegistry::new();
        let surface = frame(&registry, &ArcRenderer::default());
        assert_eq!(surface.keys(), registry.visible_keys());
        assert_eq!(surface.frames, 1);
    }

    #[test]
    fn test_sweep_matches_fraction() {
        let registry = ArcDefinitionRegistry::new();
        let surface = frame(&registry, &ArcRenderer::default());
        for i in &surface.instructions {
            assert!((i.sweep_degrees - i.fraction as f32 * 360.0).abs() < 1e-3);
            assert_eq!(i.start_degrees, -90.0);
        }
        // 15.5 of 60 minutes
        let minutes = surface.get(ArcKey::Minutes).unwrap();
        assert!((minutes.sweep_degrees - 93.0).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_arc_has_no_instruction() {
        let mut registry = ArcDefinitionRegistry::new();
        registry.set_visible(ArcKey::Seconds, false);
        let surface = frame(&registry, &ArcRenderer::default());
        assert!(surface.get(ArcKey::Seconds).is_none());
        assert_eq!(surface.instructions.len(), 4);
    }

    #[test]
    fn test_labels_follow_setting() {
        let registry = ArcDefinitionRegistry::new();
        let renderer = ArcRenderer {
            show_labels: false,
            ..ArcRenderer::default()
        };
        let surface = frame(&registry, &renderer);
        assert!(surface.instructions.iter().all(|i| i.label.is_none()));

        let surface = frame(&registry, &ArcRenderer::default());
        assert_eq!(surface.get(ArcKey::Minutes).unwrap().label.as_deref(), Some("15"));
    }

    #[test]
    fn test_band_matches_ring() {
        let registry = ArcDefinitionRegistry::new();
        let surface = frame(&registry, &ArcRenderer::default());
        let outer = surface.instructions.iter().find(|i| i.ring_index == 0).unwrap();
        // Seconds is the outermost ring while week-of-year is hidden
        assert_eq!(outer.key, ArcKey::Seconds);
        let band = outer.band();
        assert!(band.outer_radius() <= Viewport::default().base_radius() * 1.01);
    }

    #[test]
    fn test_inverse_draws_the_rest_of_the_turn() {
        let registry = ArcDefinitionRegistry::new();
        let renderer = ArcRenderer {
            inverse: true,
            ..ArcRenderer::default()
        };
        let plain = frame(&registry, &ArcRenderer::default());
        let inverse = frame(&registry, &renderer);

        let minutes = inverse.get(ArcKey::Minutes).unwrap();
        // 15.5 minutes filled: the rest starts where the fill ends
        assert!((minutes.start_degrees - 3.0).abs() < 1e-3);
        assert!((minutes.sweep_degrees - 267.0).abs() < 1e-3);
        assert_eq!(minutes.fraction, plain.get(ArcKey::Minutes).unwrap().fraction);
        for (p, i) in plain.instructions.iter().zip(&inverse.instructions) {
            assert!((p.sweep_degrees + i.sweep_degrees - 360.0).abs() < 1e-3);
            assert!((p.start_degrees + p.sweep_degrees - i.start_degrees).abs() < 1e-3);
        }
    }

    #[test]
    fn test_inverse_ignored_in_countdown() {
        let registry = ArcDefinitionRegistry::new();
        let renderer = ArcRenderer {
            inverse: true,
            ..ArcRenderer::default()
        };
        let surface = frame_in(ClockMode::Countdown, &registry, &renderer);
        assert!(!surface.instructions.is_empty());
        assert!(surface.instructions.iter().all(|i| i.sweep_degrees == 0.0));
        assert!(surface.instructions.iter().all(|i| i.start_degrees == -90.0));
    }

    #[test]
    fn test_separators_per_ring() {
        let mut registry = ArcDefinitionRegistry::new();
        let surface = frame(&registry, &ArcRenderer::default());
        assert_eq!(surface.ticks_for(ArcKey::Seconds).len(), 12);
        assert_eq!(surface.ticks_for(ArcKey::Hours).len(), 12);
        // March has 31 days
        assert_eq!(surface.ticks_for(ArcKey::Day).len(), 31);
        assert_eq!(surface.ticks_for(ArcKey::Month).len(), 12);
        // Hidden arcs get no ticks either
        assert!(surface.ticks_for(ArcKey::WeekOfYear).is_empty());

        let seconds = surface.get(ArcKey::Seconds).unwrap();
        let tick = surface.ticks_for(ArcKey::Seconds)[0];
        assert_eq!(tick.outer_radius, seconds.radius + seconds.line_width / 2.0);

        registry.set_separators(ArcKey::Day, false);
        let surface = frame(&registry, &ArcRenderer::default());
        assert!(surface.ticks_for(ArcKey::Day).is_empty());
        assert_eq!(surface.ticks_for(ArcKey::Hours).len(), 12);
    }

    #[test]
    fn test_separator_switches() {
        let registry = ArcDefinitionRegistry::new();
        let hidden = ArcRenderer {
            show_separators: false,
            ..ArcRenderer::default()
        };
        assert!(frame(&registry, &hidden).ticks.is_empty());

        let ruler = ArcRenderer {
            separator_mode: SeparatorMode::Ruler,
            ..ArcRenderer::default()
        };
        let surface = frame(&registry, &ruler);
        assert_eq!(surface.ticks_for(ArcKey::Minutes).len(), 60);
        assert_eq!(surface.ticks_for(ArcKey::Hours).len(), 48);

        let countdown = frame_in(ClockMode::Countdown, &registry, &ArcRenderer::default());
        assert!(countdown.ticks.is_empty());
    }
}
