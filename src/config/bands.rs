//! Canonical defaults for the statistical band configuration.
//!
//! These are the values a fresh install starts with and the values every
//! migration falls back to when a persisted field is absent.

/// Schema version written alongside every persisted band config.
/// 1 = legacy flat sigma keys, 2 = unversioned intermediate, 3 = current.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Default values for one band level
pub struct LevelDefaults {
    pub enabled: bool,
    pub sigma_multiplier: f64,
    pub color: &'static str,
    pub opacity: f64,
    pub line_weight: f64,
    /// One of "solid", "dotted", "dashed", "longdash", "dashdot"
    pub line_style: &'static str,
}

pub struct BandDefaults {
    pub enabled: bool,
    pub use_cumulative_mode: bool,
    pub show_filled_areas: bool,
    /// mean, band1, band2, band3, band4 (in that order)
    pub levels: [LevelDefaults; 5],
    /// Sigma values the legacy flat keys map onto (band1..band4)
    pub legacy_sigmas: [f64; 4],
}

pub static BAND_DEFAULTS: BandDefaults = BandDefaults {
    enabled: true,
    use_cumulative_mode: false,
    show_filled_areas: false,
    levels: [
        // mean
        LevelDefaults {
            enabled: true,
            sigma_multiplier: 0.0,
            color: "#ffd700",
            opacity: 1.0,
            line_weight: 2.0,
            line_style: "solid",
        },
        // band1
        LevelDefaults {
            enabled: true,
            sigma_multiplier: 1.0,
            color: "#2196f3",
            opacity: 0.8,
            line_weight: 1.5,
            line_style: "dashed",
        },
        // band2
        LevelDefaults {
            enabled: true,
            sigma_multiplier: 2.0,
            color: "#4caf50",
            opacity: 0.7,
            line_weight: 1.0,
            line_style: "dashed",
        },
        // band3
        LevelDefaults {
            enabled: false,
            sigma_multiplier: 2.5,
            color: "#ff9800",
            opacity: 0.6,
            line_weight: 1.0,
            line_style: "dotted",
        },
        // band4
        LevelDefaults {
            enabled: false,
            sigma_multiplier: 3.0,
            color: "#f44336",
            opacity: 0.6,
            line_weight: 1.0,
            line_style: "dotted",
        },
    ],
    legacy_sigmas: [1.0, 2.0, 2.5, 3.0],
};
