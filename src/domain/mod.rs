// Domain types and value objects
pub mod bands;
pub mod chart;
pub mod instrument;
pub mod marker;
pub mod point;
pub mod series;

// Re-export commonly used types
pub use bands::{
    BandLevelConfig, BandName, BandOffset, BandPoint, LineStyle, StatisticalBandConfig,
};
pub use chart::{ChartType, IndicatorMode};
pub use instrument::{InstrumentId, VisibilitySet};
pub use marker::{Marker, MarkerShape};
pub use point::{OhlcvPoint, TimestampRange};
pub use series::{BandSign, SeriesIdentity, StyleState};
