pub mod band_layer;
pub mod core;
pub mod indicator_pane;
pub mod registry;
pub mod render;
pub mod series_kind;
pub mod visibility;

#[cfg(test)]
pub(crate) mod testing;

pub use self::core::{ChartCoordinator, ChartInput, ProcessSummary};
pub use indicator_pane::IndicatorPaneManager;
pub use registry::{SeriesRegistry, SeriesRegistryEntry};
pub use render::{ChartBackend, MarkerHandle, PaneIndex, RenderError, SeriesHandle};
pub use visibility::VisibilityController;
