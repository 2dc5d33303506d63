use eframe::{Frame, egui};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::domain::point::instrument_ids;
use crate::data::{ConfigStore, JsonFileStore};
use crate::domain::{
    ChartType, IndicatorMode, InstrumentId, OhlcvPoint, StatisticalBandConfig, VisibilitySet,
};
use crate::engine::{ChartCoordinator, ChartInput};
use crate::ui::plot_backend::RetainedPlot;
use crate::ui::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::PRINT_UI_INTERACTIONS;

/// Error types for application operations
#[derive(Debug, Clone)]
pub enum AppError {
    /// No data is available for the operation
    DataNotAvailable,
    /// The band configuration could not be written back
    ConfigNotSaved(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DataNotAvailable => write!(f, "No data available"),
            AppError::ConfigNotSaved(msg) => write!(f, "Band settings not saved: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Viewer preferences persisted through eframe storage. The band
/// configuration has its own store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerState {
    pub chart_type: ChartType,
    pub indicator_mode: IndicatorMode,
    /// None until the user first changes visibility: show everything
    pub visible: Option<VisibilitySet>,
    pub anchor_fraction: f64,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            indicator_mode: IndicatorMode::default(),
            visible: None,
            anchor_fraction: crate::config::ANALYSIS.cumulative.default_anchor_fraction,
        }
    }
}

impl ViewerState {
    /// Visible set restricted to instruments that exist in this data.
    pub fn visible_for(&self, instruments: &[InstrumentId]) -> VisibilitySet {
        match &self.visible {
            Some(saved) => instruments.iter().filter(|id| saved.contains(id)).cloned().collect(),
            None => instruments.iter().cloned().collect(),
        }
    }
}

pub struct SigmaBandsApp {
    pub(super) state: ViewerState,
    pub(super) coordinator: ChartCoordinator,
    pub(super) plot: RetainedPlot,
    pub(super) config_store: ConfigStore<JsonFileStore>,
    /// Working copy edited by the band panel
    pub(super) band_config: StatisticalBandConfig,
    pub(super) instruments: Vec<InstrumentId>,
    pub(super) visible: VisibilitySet,
    pub(super) data_signature: &'static str,
    pub(super) last_error: Option<AppError>,
}

impl SigmaBandsApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        points: Vec<OhlcvPoint>,
        data_signature: &'static str,
        state_directory: PathBuf,
    ) -> Self {
        // Attempt to load the persisted state
        let state: ViewerState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS {
            log::info!("Viewer state: {:?}", state);
        }

        let mut config_store = ConfigStore::new(JsonFileStore::new(state_directory));
        let band_config = config_store.load();

        Self::from_parts(state, config_store, band_config, points, data_signature)
    }

    pub(super) fn from_parts(
        state: ViewerState,
        config_store: ConfigStore<JsonFileStore>,
        band_config: StatisticalBandConfig,
        points: Vec<OhlcvPoint>,
        data_signature: &'static str,
    ) -> Self {
        let instruments = instrument_ids(&points);
        let visible = state.visible_for(&instruments);
        let last_error = instruments.is_empty().then_some(AppError::DataNotAvailable);

        let mut coordinator = ChartCoordinator::new(band_config.clone(), state.chart_type);
        coordinator.submit(ChartInput::DataBatch(points));
        coordinator.submit(ChartInput::VisibilityChanged(visible.clone()));
        coordinator.submit(ChartInput::AnchorChanged(state.anchor_fraction));
        coordinator.submit(ChartInput::IndicatorModeChanged(state.indicator_mode));

        Self {
            state,
            coordinator,
            plot: RetainedPlot::new(),
            config_store,
            band_config,
            instruments,
            visible,
            data_signature,
            last_error,
        }
    }

    pub(super) fn set_visible(&mut self, visible: VisibilitySet) {
        if visible == self.visible {
            return;
        }
        self.state.visible = Some(visible.clone());
        self.visible = visible.clone();
        self.coordinator.submit(ChartInput::VisibilityChanged(visible));
    }

    /// Persist the edited band config and hand it to the chart.
    pub(super) fn commit_band_config(&mut self) {
        self.band_config = std::mem::take(&mut self.band_config).normalized();
        match self.config_store.persist(&self.band_config) {
            Ok(()) => {
                if matches!(self.last_error, Some(AppError::ConfigNotSaved(_))) {
                    self.last_error = None;
                }
            }
            Err(e) => {
                log::error!("Failed to persist band config: {:#}", e);
                self.last_error = Some(AppError::ConfigNotSaved(e.to_string()));
            }
        }
        self.coordinator
            .submit(ChartInput::ConfigChanged(self.band_config.clone()));
    }
}

impl eframe::App for SigmaBandsApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.render_side_panel(ctx);

        // Apply everything the panels queued this frame before drawing
        self.coordinator.process(&mut self.plot);

        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
    }
}
