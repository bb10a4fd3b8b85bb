//! Per-frame driver and UI event dispatch
//!
//! The loop owns every piece of clock state. Hosts call `frame` once per
//! display refresh and `dispatch` for each user action; changes made by an
//! event show up on the next frame.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::consts::FLOW_MODE_MINUTES;
use crate::countdown::{
    CountdownEngine, CountdownEvent, CountdownStatus, CountdownUnit, DurationComponents,
};
use crate::error::{ClockError, Result};
use crate::face::{ArcDefinitionRegistry, ArcKey, ClockSample, SampleContext, TimeSampler, Viewport};
use crate::platform::ClockSource;
use crate::renderer::{ArcRenderer, DrawingSurface};
use crate::settings::{HourFormat, LabelMode, SeparatorMode, Settings};
use crate::theme::ThemeEngine;

pub use crate::face::ClockMode;

/// User actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    ToggleArcVisibility(ArcKey),
    SelectPreset(String),
    ToggleReverse,
    /// Edit one field of the countdown form
    SetCountdownComponent(CountdownUnit, i64),
    ToggleCountdown,
    ResetCountdown,
    SetMode(ClockMode),
    SetViewport(f32, f32),
    SetHourFormat(HourFormat),
    SetLabelMode(LabelMode),
    SetFlowMode(bool),
    SetCountdownRepeat(bool),
    SetInverse(bool),
    SetSeparatorsShown(bool),
    SetSeparatorMode(SeparatorMode),
    ToggleSeparatorVisibility(ArcKey),
}

/// What one frame did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub now_ms: i64,
    pub mode: ClockMode,
    pub preset: &'static str,
    pub reversed: bool,
    pub arcs_drawn: usize,
    pub countdown_status: Option<CountdownStatus>,
    pub remaining_ms: Option<u64>,
    pub countdown_event: Option<CountdownEvent>,
    pub sample: ClockSample,
}

/// Owns the clock's state and drives it frame by frame
pub struct RenderLoop<C: ClockSource> {
    clock: C,
    registry: ArcDefinitionRegistry,
    theme: ThemeEngine,
    sampler: TimeSampler,
    renderer: ArcRenderer,
    countdown: CountdownEngine,
    /// Countdown form contents
    draft: DurationComponents,
    mode: ClockMode,
    flow_mode: bool,
    last_flow_minute: Option<u32>,
    frames: u64,
}

impl<C: ClockSource> RenderLoop<C> {
    pub fn new(settings: &Settings, clock: C) -> Result<Self> {
        settings.validate()?;

        let mut registry = ArcDefinitionRegistry::new();
        for (&key, &visible) in &settings.arc_visibility {
            registry.set_visible(key, visible);
        }
        for (&key, &shown) in &settings.separator_visibility {
            registry.set_separators(key, shown);
        }

        log::info!(
            "Clock ready: preset '{}', {} arcs visible",
            settings.color_preset,
            registry.visible_keys().len()
        );

        Ok(Self {
            clock,
            registry,
            theme: ThemeEngine::new(&settings.color_preset, settings.reversed)?,
            sampler: TimeSampler::new(settings.hour_format, settings.label_mode),
            renderer: ArcRenderer::from_settings(settings),
            countdown: CountdownEngine::new(settings.countdown_repeat),
            draft: DurationComponents::default(),
            mode: ClockMode::Clock,
            flow_mode: settings.flow_mode,
            last_flow_minute: None,
            frames: 0,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn registry(&self) -> &ArcDefinitionRegistry {
        &self.registry
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.theme
    }

    pub fn countdown(&self) -> &CountdownEngine {
        &self.countdown
    }

    pub fn renderer(&self) -> &ArcRenderer {
        &self.renderer
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn draft(&self) -> &DurationComponents {
        &self.draft
    }

    /// Current preferences, for the host to store
    pub fn settings(&self) -> Settings {
        Settings {
            color_preset: self.theme.active().name.to_string(),
            reversed: self.theme.is_reversed(),
            flow_mode: self.flow_mode,
            hour_format: self.sampler.hour_format,
            label_mode: self.sampler.label_mode,
            show_labels: self.renderer.show_labels,
            zero_angle: self.renderer.zero_degrees,
            inverse: self.renderer.inverse,
            arc_visibility: self
                .registry
                .list_arcs()
                .iter()
                .map(|def| (def.key, def.visible))
                .collect(),
            viewport: self.renderer.viewport,
            show_separators: self.renderer.show_separators,
            separator_mode: self.renderer.separator_mode,
            separator_visibility: self
                .registry
                .list_arcs()
                .iter()
                .map(|def| (def.key, def.separators))
                .collect(),
            countdown_repeat: self.countdown.repeat(),
        }
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Apply one user action; a rejected action changes nothing
    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        let result = self.apply(&event);
        if let Err(e) = &result {
            log::warn!("Rejected {:?}: {}", event, e);
        }
        result
    }

    fn apply(&mut self, event: &UiEvent) -> Result<()> {
        match event {
            UiEvent::ToggleArcVisibility(key) => {
                self.registry.toggle_visible(*key);
            }
            UiEvent::SelectPreset(name) => self.theme.select_preset(name)?,
            UiEvent::ToggleReverse => {
                self.theme.toggle_reverse();
            }
            UiEvent::SetCountdownComponent(unit, value) => {
                self.set_countdown_component(*unit, *value)?
            }
            UiEvent::ToggleCountdown => {
                self.countdown.toggle(self.clock.now_ms())?;
            }
            UiEvent::ResetCountdown => self.countdown.reset(),
            UiEvent::SetMode(mode) => {
                if self.mode != *mode {
                    log::info!("Mode -> {}", mode.as_str());
                }
                self.mode = *mode;
            }
            UiEvent::SetViewport(width, height) => {
                if !(width.is_finite() && height.is_finite()) {
                    return Err(ClockError::Validation(format!(
                        "viewport must be finite, got {width}x{height}"
                    )));
                }
                self.renderer.viewport = Viewport::new(*width, *height);
            }
            UiEvent::SetHourFormat(format) => self.sampler.hour_format = *format,
            UiEvent::SetLabelMode(mode) => self.sampler.label_mode = *mode,
            UiEvent::SetFlowMode(on) => {
                self.flow_mode = *on;
                self.last_flow_minute = None;
            }
            UiEvent::SetCountdownRepeat(on) => self.countdown.set_repeat(*on),
            UiEvent::SetInverse(on) => self.renderer.inverse = *on,
            UiEvent::SetSeparatorsShown(on) => self.renderer.show_separators = *on,
            UiEvent::SetSeparatorMode(mode) => self.renderer.separator_mode = *mode,
            UiEvent::ToggleSeparatorVisibility(key) => {
                self.registry.toggle_separators(*key);
            }
        }
        Ok(())
    }

    fn set_countdown_component(&mut self, unit: CountdownUnit, value: i64) -> Result<()> {
        if value < 0 {
            return Err(ClockError::Validation(format!(
                "{unit} cannot be negative, got {value}"
            )));
        }
        let value = u32::try_from(value)
            .map_err(|_| ClockError::Validation(format!("{value} {unit} is out of range")))?;

        let candidate = self.draft.with(unit, value);
        self.countdown
            .set_duration(candidate, self.clock.local())?;
        self.draft = candidate;
        Ok(())
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Advance timers and draw one frame into `surface`
    pub fn frame(&mut self, surface: &mut dyn DrawingSurface) -> FrameReport {
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();
        let local = now.naive_local();
        self.frames += 1;

        let countdown_event = match self.mode {
            ClockMode::Countdown => self.countdown.tick(now_ms),
            ClockMode::Clock => None,
        };

        if self.flow_mode {
            let minute = local.minute();
            if minute % FLOW_MODE_MINUTES == 0 && self.last_flow_minute != Some(minute) {
                self.theme.cycle_preset();
                self.last_flow_minute = Some(minute);
            }
        }

        let ctx = SampleContext {
            now: local,
            countdown: self.countdown.state(),
            registry: &self.registry,
        };
        let sample = self.sampler.sample(self.mode, &ctx);
        let palette = self.theme.palette(&self.registry);
        let arcs_drawn = self
            .renderer
            .render(&sample, &palette, &self.registry, surface);

        log::debug!(
            "Frame {}: {} arcs in {} mode",
            self.frames,
            arcs_drawn,
            self.mode.as_str()
        );

        FrameReport {
            frame: self.frames,
            now_ms,
            mode: self.mode,
            preset: self.theme.active().name,
            reversed: self.theme.is_reversed(),
            arcs_drawn,
            countdown_status: self.countdown.status(),
            remaining_ms: self.countdown.remaining_ms(),
            countdown_event,
            sample,
        }
    }
}
