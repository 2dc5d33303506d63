use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::config::bands::{BAND_DEFAULTS, CURRENT_SCHEMA_VERSION, LevelDefaults};

// ============================================================================
// Band names and line styles
// ============================================================================

/// The five canonical band levels. `Mean` is the centre line, the others are
/// symmetric sigma-scaled offsets around it.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BandName {
    Mean,
    Band1,
    Band2,
    Band3,
    Band4,
}

impl BandName {
    /// Position in the canonical ordering (mean = 0, band1 = 1, ...).
    pub fn index(self) -> usize {
        self as usize
    }

    /// band1..band4 in order.
    pub fn offsets() -> impl Iterator<Item = BandName> {
        Self::iter().filter(|name| *name != BandName::Mean)
    }

    /// Index into `BandPoint::offsets` (band1 = 0). None for the mean.
    pub fn offset_index(self) -> Option<usize> {
        self.index().checked_sub(1)
    }

    pub fn from_offset_index(index: usize) -> Option<BandName> {
        Self::offsets().nth(index)
    }

    fn defaults(self) -> &'static LevelDefaults {
        &BAND_DEFAULTS.levels[self.index()]
    }
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    LongDash,
    DashDot,
}

impl LineStyle {
    /// Parse the persisted spelling; unknown values fall back to solid.
    pub fn parse_or_default(text: &str) -> LineStyle {
        LineStyle::iter()
            .find(|style| style.to_string() == text)
            .unwrap_or_default()
    }
}

// ============================================================================
// BandLevelConfig / StatisticalBandConfig
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BandLevelConfig {
    pub enabled: bool,
    pub sigma_multiplier: f64,
    /// Hex color ("#rrggbb" or "#rrggbbaa")
    pub color: String,
    pub opacity: f64,
    pub line_weight: f64,
    pub line_style: LineStyle,
}

impl BandLevelConfig {
    pub fn default_for(name: BandName) -> Self {
        let d = name.defaults();
        Self {
            enabled: d.enabled,
            sigma_multiplier: d.sigma_multiplier,
            color: d.color.to_string(),
            opacity: d.opacity,
            line_weight: d.line_weight,
            line_style: LineStyle::parse_or_default(d.line_style),
        }
    }

    /// Clamp out-of-range numbers and replace an unparseable color with the default.
    pub fn sanitized(mut self, name: BandName) -> Self {
        let d = name.defaults();
        if !self.sigma_multiplier.is_finite() || self.sigma_multiplier < 0.0 {
            self.sigma_multiplier = d.sigma_multiplier;
        }
        self.opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            d.opacity
        };
        if !self.line_weight.is_finite() || self.line_weight < 0.0 {
            self.line_weight = d.line_weight;
        }
        if Color32::from_hex(&self.color).is_err() {
            self.color = d.color.to_string();
        }
        self
    }

    /// Opaque base color with the level's opacity applied.
    pub fn color32(&self) -> Color32 {
        let base = Color32::from_hex(&self.color)
            .or_else(|_| Color32::from_hex(BAND_DEFAULTS.levels[0].color))
            .unwrap_or(Color32::GRAY);
        base.gamma_multiply(self.opacity as f32)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalBandConfig {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    pub enabled: bool,
    pub use_cumulative_mode: bool,
    pub levels: BTreeMap<BandName, BandLevelConfig>,
    pub show_filled_areas: bool,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for StatisticalBandConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            enabled: BAND_DEFAULTS.enabled,
            use_cumulative_mode: BAND_DEFAULTS.use_cumulative_mode,
            levels: BandName::iter()
                .map(|name| (name, BandLevelConfig::default_for(name)))
                .collect(),
            show_filled_areas: BAND_DEFAULTS.show_filled_areas,
        }
    }
}

impl StatisticalBandConfig {
    /// The configured level, or its canonical default if the map lacks it.
    pub fn level(&self, name: BandName) -> BandLevelConfig {
        self.levels
            .get(&name)
            .cloned()
            .unwrap_or_else(|| BandLevelConfig::default_for(name))
    }

    pub fn sigma_for(&self, name: BandName) -> f64 {
        self.levels
            .get(&name)
            .map(|level| level.sigma_multiplier)
            .unwrap_or_else(|| name.defaults().sigma_multiplier)
    }

    /// Whether a band should be drawn. The calculator ignores this.
    pub fn is_level_rendered(&self, name: BandName) -> bool {
        self.enabled && self.level(name).enabled
    }

    /// Fill in every missing level and sanitize the present ones.
    pub fn normalized(mut self) -> Self {
        for name in BandName::iter() {
            let level = self
                .levels
                .remove(&name)
                .unwrap_or_else(|| BandLevelConfig::default_for(name));
            self.levels.insert(name, level.sanitized(name));
        }
        self.schema_version = CURRENT_SCHEMA_VERSION;
        self
    }
}

// ============================================================================
// BandPoint: calculator output
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BandOffset {
    pub upper: f64,
    pub lower: f64,
}

/// One timestamp of band output. Produced fresh on every recompute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BandPoint {
    pub timestamp_ms: i64,
    pub mean: f64,
    pub std_dev: f64,
    /// band1..band4
    pub offsets: [BandOffset; 4],
}

impl BandPoint {
    pub fn new(timestamp_ms: i64, mean: f64, std_dev: f64, config: &StatisticalBandConfig) -> Self {
        let offsets = std::array::from_fn(|i| {
            let name = BandName::from_offset_index(i).unwrap_or(BandName::Band1);
            let width = std_dev * config.sigma_for(name);
            BandOffset {
                upper: mean + width,
                lower: mean - width,
            }
        });
        Self {
            timestamp_ms,
            mean,
            std_dev,
            offsets,
        }
    }

    pub fn offset(&self, name: BandName) -> Option<BandOffset> {
        name.offset_index().map(|i| self.offsets[i])
    }
}
