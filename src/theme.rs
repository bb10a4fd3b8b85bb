//! Color presets and palette resolution
//!
//! A preset is an ordered list of swatches, one per arc in catalogue order.
//! Reversal reorders which arc gets which swatch; it never changes a color.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClockError, Result};
use crate::face::{ArcDefinitionRegistry, ArcKey};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build from a 0xRRGGBB literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// CSS hex notation (`#rrggbb`)
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Color pair used for one arc: the stroke and its shade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swatch {
    pub light: Color,
    pub dark: Color,
}

const fn swatch(light: u32, dark: u32) -> Swatch {
    Swatch {
        light: Color::hex(light),
        dark: Color::hex(dark),
    }
}

/// How strokes of a preset are decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeEffect {
    #[default]
    Flat,
    /// Soft shadow in the stroke color
    Glow,
    /// Light highlight over the stroke
    Gloss,
}

/// A named palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemePreset {
    pub name: &'static str,
    /// Swatches in arc catalogue order
    pub colors: &'static [Swatch],
    pub effect: StrokeEffect,
}

/// Preset catalogue; each row follows `ArcKey::ALL`
pub static PRESETS: [ThemePreset; 5] = [
    ThemePreset {
        name: "default",
        colors: &[
            swatch(0xc792ea, 0x8f6aaf),
            swatch(0xd05ce3, 0x4a0055),
            swatch(0x81c784, 0x003d00),
            swatch(0xff9e80, 0x8c1c00),
            swatch(0xfff176, 0xb45f06),
            swatch(0x81d4fa, 0x002e5c),
            swatch(0xf78c6c, 0xb56a52),
        ],
        effect: StrokeEffect::Flat,
    },
    ThemePreset {
        name: "neon",
        colors: &[
            swatch(0xda70d6, 0x8a2be2),
            swatch(0xff00ff, 0x800080),
            swatch(0x00ff00, 0x008000),
            swatch(0xff0000, 0x800000),
            swatch(0xffff00, 0x808000),
            swatch(0x00ffff, 0x008080),
            swatch(0xff7f50, 0xff4500),
        ],
        effect: StrokeEffect::Glow,
    },
    ThemePreset {
        name: "pastel",
        colors: &[
            swatch(0xdda0dd, 0x9370db),
            swatch(0xf4a8e1, 0xa1428a),
            swatch(0xa8f4b6, 0x42a155),
            swatch(0xf4a8a8, 0xa14242),
            swatch(0xf4f4a8, 0xa1a142),
            swatch(0xa8e1f4, 0x428aa1),
            swatch(0xffdab9, 0xffa07a),
        ],
        effect: StrokeEffect::Flat,
    },
    ThemePreset {
        name: "colorblind",
        colors: &[
            swatch(0xd55e00, 0xa14242),
            swatch(0xf7931a, 0xa45c05),
            swatch(0x0072b2, 0x003c5c),
            swatch(0xd55e00, 0x7a3600),
            swatch(0xf0e442, 0x8a8326),
            swatch(0xcccccc, 0x666666),
            swatch(0xff7f50, 0xff4500),
        ],
        effect: StrokeEffect::Flat,
    },
    ThemePreset {
        name: "candy",
        colors: &[
            swatch(0xe040fb, 0xaa00ff),
            swatch(0xd500f9, 0xa000d0),
            swatch(0x76ff03, 0x50d000),
            swatch(0xff3d00, 0xd50000),
            swatch(0xffea00, 0xffc400),
            swatch(0x00e5ff, 0x00b8d4),
            swatch(0xff9100, 0xff6d00),
        ],
        effect: StrokeEffect::Gloss,
    },
];

impl ThemePreset {
    /// Look up a preset by name (case-insensitive)
    pub fn find(name: &str) -> Result<&'static ThemePreset> {
        let wanted = name.trim().to_lowercase();
        PRESETS
            .iter()
            .find(|p| p.name == wanted)
            .ok_or_else(|| ClockError::Configuration(format!("unknown color preset '{name}'")))
    }

    /// Swatch for the arc at catalogue `index`, reusing colors cyclically
    pub fn swatch_at(&self, index: usize) -> Swatch {
        self.colors[index % self.colors.len()]
    }

    /// Preset following this one in the catalogue (wraps around)
    pub fn next(&self) -> &'static ThemePreset {
        let index = PRESETS.iter().position(|p| p.name == self.name).unwrap_or(0);
        &PRESETS[(index + 1) % PRESETS.len()]
    }
}

/// Resolved colors for the visible arcs, in catalogue order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    entries: Vec<(ArcKey, Swatch)>,
    effect: StrokeEffect,
}

impl Palette {
    /// Swatches by visible position
    pub fn colors(&self) -> Vec<Swatch> {
        self.entries.iter().map(|(_, s)| *s).collect()
    }

    pub fn entries(&self) -> &[(ArcKey, Swatch)] {
        &self.entries
    }

    /// Swatch assigned to `key`, `None` when the arc is hidden
    pub fn color_for(&self, key: ArcKey) -> Option<Swatch> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, s)| *s)
    }

    pub fn effect(&self) -> StrokeEffect {
        self.effect
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assign `preset`'s swatches to the visible arcs of `registry`
fn assign(preset: &ThemePreset, reversed: bool, registry: &ArcDefinitionRegistry) -> Palette {
    let visible = registry.visible_keys();
    let mut swatches: Vec<Swatch> = visible
        .iter()
        .map(|key| preset.swatch_at(key.index()))
        .collect();
    if reversed {
        swatches.reverse();
    }
    Palette {
        entries: visible.into_iter().zip(swatches).collect(),
        effect: preset.effect,
    }
}

/// Resolve a preset by name into the palette for the visible arcs
///
/// With `reversed`, the color at visible position `i` moves to `N-1-i`.
pub fn resolve_palette(
    preset_name: &str,
    reversed: bool,
    registry: &ArcDefinitionRegistry,
) -> Result<Palette> {
    let preset = ThemePreset::find(preset_name)?;
    Ok(assign(preset, reversed, registry))
}

/// Active theme selection of one clock instance
#[derive(Debug, Clone)]
pub struct ThemeEngine {
    active: &'static ThemePreset,
    reversed: bool,
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self {
            active: &PRESETS[0],
            reversed: false,
        }
    }
}

impl ThemeEngine {
    pub fn new(preset_name: &str, reversed: bool) -> Result<Self> {
        Ok(Self {
            active: ThemePreset::find(preset_name)?,
            reversed,
        })
    }

    pub fn active(&self) -> &'static ThemePreset {
        self.active
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Switch preset; an unknown name keeps the current one
    pub fn select_preset(&mut self, name: &str) -> Result<()> {
        self.active = ThemePreset::find(name)?;
        log::info!("Color preset -> {}", self.active.name);
        Ok(())
    }

    pub fn toggle_reverse(&mut self) -> bool {
        self.set_reversed(!self.reversed);
        self.reversed
    }

    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
        log::info!("Color order reversed: {}", reversed);
    }

    /// Advance to the next preset in the catalogue
    pub fn cycle_preset(&mut self) -> &'static ThemePreset {
        self.active = self.active.next();
        log::info!("Flow mode: color preset -> {}", self.active.name);
        self.active
    }

    /// Palette of the active selection
    pub fn palette(&self, registry: &ArcDefinitionRegistry) -> Palette {
        assign(self.active, self.reversed, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_visible() -> ArcDefinitionRegistry {
        let mut registry = ArcDefinitionRegistry::new();
        for key in ArcKey::ALL {
            registry.set_visible(key, true);
        }
        registry
    }

    #[test]
    fn test_presets_cover_catalogue() {
        for preset in &PRESETS {
            assert!(preset.colors.len() >= ArcKey::ALL.len(), "{}", preset.name);
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(ThemePreset::find("Neon").unwrap().name, "neon");
        assert_eq!(ThemePreset::find("  CANDY ").unwrap().effect, StrokeEffect::Gloss);
        assert!(matches!(
            ThemePreset::find("sepia"),
            Err(ClockError::Configuration(_))
        ));
    }

    #[test]
    fn test_palette_length_matches_visible_arcs() {
        let registry = ArcDefinitionRegistry::new();
        let palette = resolve_palette("default", false, &registry).unwrap();
        assert_eq!(palette.len(), registry.visible_keys().len());
        assert_eq!(palette.color_for(ArcKey::DayOfWeek), None);
        // Colors follow the arc's catalogue slot, not its visible position
        assert_eq!(
            palette.color_for(ArcKey::Month),
            Some(PRESETS[0].colors[ArcKey::Month.index()])
        );
    }

    #[test]
    fn test_reverse_is_order_not_value() {
        let registry = all_visible();
        let normal = resolve_palette("neon", false, &registry).unwrap().colors();
        let reversed = resolve_palette("neon", true, &registry).unwrap().colors();
        let n = normal.len();
        for i in 0..n {
            assert_eq!(normal[i], reversed[n - 1 - i]);
        }
        // Same multiset of colors, just reordered
        let mut a: Vec<_> = normal.iter().map(|s| s.light.to_css()).collect();
        let mut b: Vec<_> = reversed.iter().map(|s| s.light.to_css()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_ne!(normal, reversed);
    }

    #[test]
    fn test_reverse_with_hidden_arcs() {
        let registry = ArcDefinitionRegistry::new();
        let normal = resolve_palette("pastel", false, &registry).unwrap().colors();
        let mut reversed = resolve_palette("pastel", true, &registry).unwrap().colors();
        reversed.reverse();
        assert_eq!(normal, reversed);
    }

    #[test]
    fn test_engine_select_and_cycle() {
        let mut engine = ThemeEngine::default();
        assert_eq!(engine.active().name, "default");
        engine.select_preset("Neon").unwrap();
        assert_eq!(engine.active().name, "neon");
        assert!(engine.select_preset("nope").is_err());
        assert_eq!(engine.active().name, "neon");
        assert_eq!(engine.cycle_preset().name, "pastel");
        engine.select_preset("candy").unwrap();
        assert_eq!(engine.cycle_preset().name, "default");
    }

    #[test]
    fn test_engine_palette_follows_reverse_flag() {
        let registry = all_visible();
        let mut engine = ThemeEngine::new("neon", false).unwrap();
        let before = engine.palette(&registry);
        assert!(engine.toggle_reverse());
        let after = engine.palette(&registry);
        assert_eq!(before.effect(), StrokeEffect::Glow);
        assert_ne!(before, after);
        assert_eq!(after, resolve_palette("neon", true, &registry).unwrap());
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::hex(0x81d4fa).to_css(), "#81d4fa");
        assert_eq!(Color::hex(0xff0000).to_string(), "#ff0000");
    }
}
