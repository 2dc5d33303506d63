use std::collections::{BTreeMap, VecDeque};

use crate::analysis::compute_bands;
use crate::config::ANALYSIS;
use crate::domain::point::group_by_instrument;
use crate::domain::{
    BandPoint, ChartType, IndicatorMode, InstrumentId, OhlcvPoint, StatisticalBandConfig,
    TimestampRange, VisibilitySet,
};

use super::band_layer;
use super::indicator_pane::IndicatorPaneManager;
use super::render::ChartBackend;
use super::visibility::VisibilityController;

#[cfg(debug_assertions)]
use crate::config::PRINT_INPUT_QUEUE;

/// Everything that can change what the chart shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartInput {
    DataBatch(Vec<OhlcvPoint>),
    ConfigChanged(StatisticalBandConfig),
    VisibilityChanged(VisibilitySet),
    ChartTypeChanged(ChartType),
    IndicatorModeChanged(IndicatorMode),
    /// Cumulative-mode rebase point as a fraction of the loaded time range
    AnchorChanged(f64),
}

/// The newest input of each kind. Older ones are superseded whole.
#[derive(Default)]
struct PendingInputs {
    data: Option<Vec<OhlcvPoint>>,
    config: Option<StatisticalBandConfig>,
    visibility: Option<VisibilitySet>,
    chart_type: Option<ChartType>,
    indicator_mode: Option<IndicatorMode>,
    anchor: Option<f64>,
}

impl PendingInputs {
    fn absorb(&mut self, input: ChartInput) {
        match input {
            ChartInput::DataBatch(points) => self.data = Some(points),
            ChartInput::ConfigChanged(config) => self.config = Some(config),
            ChartInput::VisibilityChanged(visible) => self.visibility = Some(visible),
            ChartInput::ChartTypeChanged(chart_type) => self.chart_type = Some(chart_type),
            ChartInput::IndicatorModeChanged(mode) => self.indicator_mode = Some(mode),
            ChartInput::AnchorChanged(fraction) => self.anchor = Some(fraction),
        }
    }
}

/// What a `process` call ended up doing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    pub inputs_received: usize,
    pub inputs_applied: usize,
    pub bands_recomputed: bool,
}

/// Sole owner of chart state. Inputs are queued with `submit` and applied in
/// causal order by `process`: chart type, data, config/anchor, visibility,
/// indicator mode.
pub struct ChartCoordinator {
    /// Current data snapshot
    points: Vec<OhlcvPoint>,
    series: BTreeMap<InstrumentId, Vec<OhlcvPoint>>,
    /// Range of the whole batch, independent of visibility and anchor
    stable_range: Option<TimestampRange>,

    visible: VisibilitySet,
    config: StatisticalBandConfig,
    anchor_fraction: f64,
    bands: Vec<BandPoint>,

    primary: VisibilityController,
    indicator: IndicatorPaneManager,

    queue: VecDeque<ChartInput>,
}

impl ChartCoordinator {
    pub fn new(config: StatisticalBandConfig, chart_type: ChartType) -> Self {
        Self {
            points: Vec::new(),
            series: BTreeMap::new(),
            stable_range: None,
            visible: VisibilitySet::new(),
            config: config.normalized(),
            anchor_fraction: ANALYSIS.cumulative.default_anchor_fraction,
            bands: Vec::new(),
            primary: VisibilityController::new(chart_type),
            indicator: IndicatorPaneManager::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn submit(&mut self, input: ChartInput) {
        self.queue.push_back(input);
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Drain the queue, keeping only the newest input of each kind, and apply it.
    pub fn process(&mut self, backend: &mut dyn ChartBackend) -> ProcessSummary {
        let mut summary = ProcessSummary {
            inputs_received: self.queue.len(),
            ..Default::default()
        };
        if self.queue.is_empty() {
            return summary;
        }

        let mut pending = PendingInputs::default();
        for input in self.queue.drain(..) {
            pending.absorb(input);
        }

        let mut bands_dirty = false;
        let mut restyle_bands = false;
        let mut indicator_dirty = false;
        let mut applied = 0;

        // 1. Chart type: the only full rebuild. Band series go with it.
        if let Some(chart_type) = pending.chart_type {
            applied += 1;
            if chart_type != self.primary.chart_type() {
                self.primary
                    .change_chart_type(backend, chart_type, &self.series, &self.visible);
                bands_dirty = true;
            }
        }

        // 2. Data
        if let Some(points) = pending.data {
            applied += 1;
            self.series = group_by_instrument(&points);
            self.stable_range = TimestampRange::of_points(&points);
            self.points = points;
            self.primary.apply_data(backend, &self.series, &self.visible);
            bands_dirty = true;
            indicator_dirty = true;
        }

        // 3. Config / anchor
        if let Some(config) = pending.config {
            applied += 1;
            let config = config.normalized();
            if config != self.config {
                self.config = config;
                bands_dirty = true;
                restyle_bands = true;
            }
        }
        if let Some(fraction) = pending.anchor {
            applied += 1;
            let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
            if fraction != self.anchor_fraction {
                self.anchor_fraction = fraction;
                // Only cumulative output depends on the anchor
                bands_dirty |= self.config.use_cumulative_mode;
            }
        }

        // 4. Visibility: restyle primaries, and the basket behind the bands changed
        if let Some(visible) = pending.visibility {
            applied += 1;
            if visible != self.visible {
                self.visible = visible;
                self.primary.apply_visibility(backend, &self.visible);
                bands_dirty = true;
                indicator_dirty = true;
            }
        }

        if restyle_bands {
            band_layer::apply_band_styles(self.primary.registry_mut(), backend, &self.config);
        }
        if bands_dirty {
            self.recompute_bands();
            band_layer::sync_band_data(self.primary.registry_mut(), backend, &self.bands, &self.config);
            summary.bands_recomputed = true;
            indicator_dirty = true;
        }

        // 5. Indicator mode
        if let Some(mode) = pending.indicator_mode {
            applied += 1;
            if mode != self.indicator.mode() {
                self.indicator.set_mode(backend, mode);
                indicator_dirty = true;
            }
        }
        if indicator_dirty {
            self.indicator
                .sync(backend, &self.series, &self.visible, &self.bands);
        }

        summary.inputs_applied = applied;

        #[cfg(debug_assertions)]
        if PRINT_INPUT_QUEUE {
            log::info!(
                "Input queue: {} received, {} applied after coalescing",
                summary.inputs_received,
                summary.inputs_applied
            );
        }

        summary
    }

    fn recompute_bands(&mut self) {
        self.bands = compute_bands(
            &self.points,
            &self.visible,
            &self.config,
            Some(self.anchor_fraction),
            self.stable_range,
        );
    }

    // --- Accessors for UI ---

    pub fn bands(&self) -> &[BandPoint] {
        &self.bands
    }

    pub fn config(&self) -> &StatisticalBandConfig {
        &self.config
    }

    pub fn visible(&self) -> &VisibilitySet {
        &self.visible
    }

    pub fn chart_type(&self) -> ChartType {
        self.primary.chart_type()
    }

    pub fn indicator_mode(&self) -> IndicatorMode {
        self.indicator.mode()
    }

    pub fn anchor_fraction(&self) -> f64 {
        self.anchor_fraction
    }

    pub fn stable_range(&self) -> Option<TimestampRange> {
        self.stable_range
    }

    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentId> {
        self.series.keys()
    }

    pub fn series_for(&self, id: &InstrumentId) -> Option<&[OhlcvPoint]> {
        self.series.get(id).map(Vec::as_slice)
    }

    pub fn primary(&self) -> &VisibilityController {
        &self.primary
    }

    pub fn indicator(&self) -> &IndicatorPaneManager {
        &self.indicator
    }
}
