//! Configuration module for sigma-bands.

pub mod analysis;
pub mod bands;

mod debug; // Private: callers go through crate::config::debug flags re-exported below
pub use debug::{
    PRINT_BAND_COMPUTE, PRINT_CONFIG_MIGRATION, PRINT_INDICATOR_PANE, PRINT_INPUT_QUEUE,
    PRINT_SERIES_LIFECYCLE, PRINT_UI_INTERACTIONS,
};

pub mod demo;
pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use bands::{BAND_DEFAULTS, BandDefaults, CURRENT_SCHEMA_VERSION};
pub use demo::DEMO;
pub use persistence::{PERSISTENCE, namespaced_key};
pub use plot::PLOT_CONFIG;
