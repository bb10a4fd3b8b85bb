//! Clock settings and preferences
//!
//! Supplied by the host as JSON; this crate never stores them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZERO_ANGLE_DEGREES, ZERO_ANGLE_DEGREES};
use crate::error::{ClockError, Result};
use crate::face::{ArcKey, Viewport};
use crate::theme::ThemePreset;

/// Hour ring format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum HourFormat {
    #[default]
    TwelveHour,
    TwentyFourHour,
}

impl HourFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            HourFormat::TwelveHour => "12h",
            HourFormat::TwentyFourHour => "24h",
        }
    }

    /// Hours in one turn of the hour ring
    pub fn hours_per_turn(&self) -> u32 {
        match self {
            HourFormat::TwelveHour => 12,
            HourFormat::TwentyFourHour => 24,
        }
    }
}

/// What the ring labels show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LabelMode {
    /// Current value of the unit
    #[default]
    Standard,
    /// Filled share of the ring, as a whole percent
    Percentage,
    /// What is left of the enclosing unit
    Remainder,
}

impl LabelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelMode::Standard => "standard",
            LabelMode::Percentage => "percentage",
            LabelMode::Remainder => "remainder",
        }
    }
}

impl FromStr for LabelMode {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(LabelMode::Standard),
            "percentage" | "percent" => Ok(LabelMode::Percentage),
            "remainder" | "remaining" => Ok(LabelMode::Remainder),
            other => Err(ClockError::Configuration(format!(
                "unknown label mode '{other}'"
            ))),
        }
    }
}

/// Tick marks drawn across the rings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SeparatorMode {
    /// One full-width tick per division (every fifth on 60-step rings)
    #[default]
    Standard,
    /// Every step, with short minor ticks between the majors
    Ruler,
}

impl SeparatorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeparatorMode::Standard => "standard",
            SeparatorMode::Ruler => "ruler",
        }
    }
}

impl FromStr for SeparatorMode {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(SeparatorMode::Standard),
            "ruler" => Ok(SeparatorMode::Ruler),
            other => Err(ClockError::Configuration(format!(
                "unknown separator mode '{other}'"
            ))),
        }
    }
}

/// Clock settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Colors ===
    /// Color preset name (case-insensitive)
    pub color_preset: String,
    /// Read the preset's colors back-to-front
    pub reversed: bool,
    /// Switch to the next preset every five minutes
    pub flow_mode: bool,

    // === Face ===
    pub hour_format: HourFormat,
    pub label_mode: LabelMode,
    /// Draw the value badge on each ring
    pub show_labels: bool,
    /// Where every arc starts, in degrees (-90 = twelve o'clock)
    pub zero_angle: f32,
    /// Clock mode draws what is left of each unit instead of what has passed
    pub inverse: bool,
    /// Per-arc visibility; missing keys keep their catalogue default
    pub arc_visibility: BTreeMap<ArcKey, bool>,
    pub viewport: Viewport,

    // === Separators ===
    pub show_separators: bool,
    pub separator_mode: SeparatorMode,
    /// Per-arc tick marks; missing keys are shown
    pub separator_visibility: BTreeMap<ArcKey, bool>,

    // === Countdown ===
    /// Restart the countdown when it runs out instead of finishing
    pub countdown_repeat: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_preset: "default".to_string(),
            reversed: false,
            flow_mode: false,

            hour_format: HourFormat::TwelveHour,
            label_mode: LabelMode::Standard,
            show_labels: true,
            zero_angle: ZERO_ANGLE_DEGREES,
            inverse: false,
            arc_visibility: BTreeMap::new(),
            viewport: Viewport::default(),

            show_separators: true,
            separator_mode: SeparatorMode::Standard,
            separator_visibility: BTreeMap::new(),

            countdown_repeat: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings (preset '{}')", settings.color_preset);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject unknown presets and zero angles outside one turn either way
    pub fn validate(&self) -> Result<()> {
        ThemePreset::find(&self.color_preset)?;
        if !self.zero_angle.is_finite() || self.zero_angle.abs() > MAX_ZERO_ANGLE_DEGREES {
            return Err(ClockError::Configuration(format!(
                "zero angle must be within ±{MAX_ZERO_ANGLE_DEGREES} degrees, got {}",
                self.zero_angle
            )));
        }
        Ok(())
    }

    /// Enable every arc (the start-up look)
    pub fn with_all_arcs(mut self) -> Self {
        for key in ArcKey::ALL {
            self.arc_visibility.insert(key, true);
        }
        self
    }
}
