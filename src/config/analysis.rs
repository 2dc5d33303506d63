//! Band computation and proximity-marker knobs

/// Settings for the proximity conditions shown in the indicator pane
pub struct ProximitySettings {
    /// A close within this fraction of the basket mean fires a mean-proximity marker.
    /// 0.0025 corresponds to 0.25%.
    pub mean_threshold_pct: f64,
    /// Band whose upper/lower values define a band breach
    pub breach_band_index: usize,
}

/// Settings for cumulative (rebased) band computation
pub struct CumulativeSettings {
    /// Anchor fraction used when the caller has not chosen one yet
    pub default_anchor_fraction: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    /// Minimum number of timestamp groups before rayon is used for snapshot mode.
    /// Below this the thread hand-off costs more than it saves.
    pub parallel_snapshot_min_groups: usize,
    pub proximity: ProximitySettings,
    pub cumulative: CumulativeSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    parallel_snapshot_min_groups: 512,

    proximity: ProximitySettings {
        mean_threshold_pct: 0.0025,
        // Index into the non-mean bands: 0 = band1
        breach_band_index: 0,
    },

    cumulative: CumulativeSettings {
        default_anchor_fraction: 0.0,
    },
};
