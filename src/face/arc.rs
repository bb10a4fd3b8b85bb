//! Arc catalogue
//!
//! Every ring on the clock face is one `ArcKey`. The catalogue order below is
//! the order colors are assigned in and the order arcs are drawn in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// Time unit represented by one ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArcKey {
    DayOfWeek,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    WeekOfYear,
}

impl ArcKey {
    /// All keys in catalogue order
    pub const ALL: [ArcKey; 7] = [
        ArcKey::DayOfWeek,
        ArcKey::Month,
        ArcKey::Day,
        ArcKey::Hours,
        ArcKey::Minutes,
        ArcKey::Seconds,
        ArcKey::WeekOfYear,
    ];

    /// Position in the catalogue
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArcKey::DayOfWeek => "dayOfWeek",
            ArcKey::Month => "month",
            ArcKey::Day => "day",
            ArcKey::Hours => "hours",
            ArcKey::Minutes => "minutes",
            ArcKey::Seconds => "seconds",
            ArcKey::WeekOfYear => "weekOfYear",
        }
    }

    /// Thin rings are drawn at half the regular stroke width
    pub fn is_thin(&self) -> bool {
        matches!(self, ArcKey::DayOfWeek | ArcKey::WeekOfYear)
    }
}

impl fmt::Display for ArcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArcKey {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', '-', ' '], "");
        ArcKey::ALL
            .into_iter()
            .find(|key| key.as_str().to_lowercase() == wanted)
            .ok_or_else(|| ClockError::Configuration(format!("unknown arc key '{s}'")))
    }
}

/// Unit range and visibility of one arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDefinition {
    pub key: ArcKey,
    /// Lower bound of the unit
    pub min_value: f64,
    /// Upper bound of the unit (nominal; months and years vary)
    pub max_value: f64,
    pub visible: bool,
    /// Tick marks drawn across the ring
    pub separators: bool,
}

impl ArcDefinition {
    const fn new(key: ArcKey, min_value: f64, max_value: f64, visible: bool) -> Self {
        Self {
            key,
            min_value,
            max_value,
            visible,
            separators: true,
        }
    }

    /// Nominal span of the unit (`max_value - min_value`)
    #[inline]
    pub fn span(&self) -> f64 {
        self.max_value - self.min_value
    }
}

/// The fixed catalogue of arcs with their startup visibility
pub const CATALOGUE: [ArcDefinition; 7] = [
    ArcDefinition::new(ArcKey::DayOfWeek, 0.0, 7.0, false),
    ArcDefinition::new(ArcKey::Month, 0.0, 12.0, true),
    ArcDefinition::new(ArcKey::Day, 0.0, 31.0, true),
    ArcDefinition::new(ArcKey::Hours, 0.0, 24.0, true),
    ArcDefinition::new(ArcKey::Minutes, 0.0, 60.0, true),
    ArcDefinition::new(ArcKey::Seconds, 0.0, 60.0, true),
    ArcDefinition::new(ArcKey::WeekOfYear, 0.0, 53.0, false),
];

/// Catalogue of arc kinds, owned by one clock instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcDefinitionRegistry {
    arcs: Vec<ArcDefinition>,
}

impl Default for ArcDefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcDefinitionRegistry {
    /// Build the registry from the fixed catalogue
    pub fn new() -> Self {
        Self {
            arcs: CATALOGUE.to_vec(),
        }
    }

    /// All arcs in catalogue order
    pub fn list_arcs(&self) -> &[ArcDefinition] {
        &self.arcs
    }

    pub fn definition(&self, key: ArcKey) -> &ArcDefinition {
        // The registry always holds the full catalogue, indexed by key
        &self.arcs[key.index()]
    }

    /// Show or hide an arc; takes effect on the next frame
    pub fn set_visible(&mut self, key: ArcKey, visible: bool) {
        let arc = &mut self.arcs[key.index()];
        if arc.visible != visible {
            log::debug!("Arc {} visibility -> {}", key, visible);
        }
        arc.visible = visible;
    }

    /// Flip an arc's visibility, returning the new value
    pub fn toggle_visible(&mut self, key: ArcKey) -> bool {
        let visible = !self.is_visible(key);
        self.set_visible(key, visible);
        visible
    }

    pub fn is_visible(&self, key: ArcKey) -> bool {
        self.definition(key).visible
    }

    pub fn set_separators(&mut self, key: ArcKey, shown: bool) {
        let arc = &mut self.arcs[key.index()];
        if arc.separators != shown {
            log::debug!("Arc {} separators -> {}", key, shown);
        }
        arc.separators = shown;
    }

    /// Flip an arc's tick marks, returning the new value
    pub fn toggle_separators(&mut self, key: ArcKey) -> bool {
        let shown = !self.has_separators(key);
        self.set_separators(key, shown);
        shown
    }

    pub fn has_separators(&self, key: ArcKey) -> bool {
        self.definition(key).separators
    }

    /// Visible keys in catalogue order
    pub fn visible_keys(&self) -> Vec<ArcKey> {
        self.arcs
            .iter()
            .filter(|arc| arc.visible)
            .map(|arc| arc.key)
            .collect()
    }
}
