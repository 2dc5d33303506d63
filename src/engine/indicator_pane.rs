//! Secondary pane: one flat, marker-carrying series per visible instrument.
//!
//! Driven by the indicator mode and the visibility set, never by chart type.
//! Unlike primary series, an instrument leaving the visibility set loses its
//! indicator series outright.

use std::collections::{BTreeMap, HashMap};

use crate::analysis::detect_markers;
use crate::config::plot::PLOT_CONFIG;
use crate::domain::{
    BandPoint, IndicatorMode, InstrumentId, LineStyle, OhlcvPoint, SeriesIdentity, StyleState,
    VisibilitySet,
};
use crate::engine::registry::{NewSeries, SeriesRegistry};
use crate::engine::render::{
    self, ChartBackend, MarkerHandle, PaneIndex, SeriesData, SeriesShape, StyleOptions,
};
use crate::engine::series_kind::instrument_color;

#[cfg(debug_assertions)]
use crate::config::PRINT_INDICATOR_PANE;

#[derive(Default)]
pub struct IndicatorPaneManager {
    mode: IndicatorMode,
    registry: SeriesRegistry,
    markers: HashMap<InstrumentId, MarkerHandle>,
}

impl IndicatorPaneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    pub fn registry(&self) -> &SeriesRegistry {
        &self.registry
    }

    /// Switch modes. Enabling opens the pane; disabling tears every series down
    /// and collapses the pane to zero height.
    pub fn set_mode(&mut self, backend: &mut dyn ChartBackend, mode: IndicatorMode) {
        if mode == self.mode {
            return;
        }
        let was_enabled = self.mode.is_enabled();
        self.mode = mode;

        if !mode.is_enabled() {
            self.teardown(backend);
            backend.set_pane_height(PaneIndex::INDICATOR, 0.0);
        } else if !was_enabled {
            backend.set_pane_height(PaneIndex::INDICATOR, PLOT_CONFIG.indicator_pane_height);
        }

        #[cfg(debug_assertions)]
        if PRINT_INDICATOR_PANE {
            log::info!("Indicator pane mode -> {}", mode);
        }
    }

    /// Bring the pane in line with the visible instruments and current bands.
    /// Markers are replaced wholesale.
    pub fn sync(
        &mut self,
        backend: &mut dyn ChartBackend,
        series: &BTreeMap<InstrumentId, Vec<OhlcvPoint>>,
        visible: &VisibilitySet,
        bands: &[BandPoint],
    ) {
        if !self.mode.is_enabled() {
            return;
        }

        let departed: Vec<SeriesIdentity> = self
            .registry
            .keys()
            .filter(|identity| {
                identity
                    .instrument()
                    .is_none_or(|id| !visible.contains(id) || !series.contains_key(id))
            })
            .cloned()
            .collect();
        for identity in &departed {
            if let Some(id) = identity.instrument() {
                self.markers.remove(id);
            }
            self.registry.remove(identity, backend);
        }

        for (id, points) in series.iter().filter(|(id, _)| visible.contains(id)) {
            let handle = self.registry.upsert(SeriesIdentity::indicator(id.clone()), |_| NewSeries {
                handle: backend.create_series(SeriesShape::Line, &flat_style(id), PaneIndex::INDICATOR),
                style_state: StyleState::Visible,
                pane: PaneIndex::INDICATOR,
            });
            render::replace_data(backend, handle, flat_data(points));

            let markers = detect_markers(self.mode, points, bands);

            #[cfg(debug_assertions)]
            if PRINT_INDICATOR_PANE {
                log::info!("{}: {} {} markers", id, markers.len(), self.mode);
            }

            match self.markers.get(id) {
                Some(marker_handle) => {
                    if let Err(e) = backend.set_markers(*marker_handle, markers) {
                        log::warn!("Markers for {} not updated: {}", id, e);
                    }
                }
                None => match backend.create_markers(handle, markers) {
                    Ok(marker_handle) => {
                        self.markers.insert(id.clone(), marker_handle);
                    }
                    Err(e) => log::warn!("Markers for {} not attached: {}", id, e),
                },
            }
        }
    }

    fn teardown(&mut self, backend: &mut dyn ChartBackend) {
        self.markers.clear();
        self.registry.clear(backend);
    }
}

fn flat_style(id: &InstrumentId) -> StyleOptions {
    StyleOptions {
        color: Some(instrument_color(id).gamma_multiply(0.4)),
        line_width: Some(1.0),
        line_style: Some(LineStyle::Dotted),
        title: Some(id.to_string()),
        ..Default::default()
    }
}

/// A zero baseline across the instrument's timestamps; markers ride on it.
fn flat_data(points: &[OhlcvPoint]) -> SeriesData {
    SeriesData::Line(points.iter().map(|p| [p.timestamp_ms as f64, 0.0]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::point::group_by_instrument;
    use crate::domain::{MarkerShape, StatisticalBandConfig};
    use crate::engine::testing::RecordingBackend;

    fn fixture() -> (BTreeMap<InstrumentId, Vec<OhlcvPoint>>, Vec<BandPoint>) {
        let config = StatisticalBandConfig::default();
        // t=1: mean 11, std 1; only C sits on the mean
        // t=2: mean 11, std 6
        let points = vec![
            OhlcvPoint::new("A", 1, 10.0, 10.0, 10.0, 10.0),
            OhlcvPoint::new("B", 1, 12.0, 12.0, 12.0, 12.0),
            OhlcvPoint::new("A", 2, 5.0, 5.0, 5.0, 5.0),
            OhlcvPoint::new("B", 2, 17.0, 17.0, 17.0, 17.0),
            OhlcvPoint::new("C", 1, 11.0, 11.0, 11.0, 11.0),
        ];
        let bands = vec![
            BandPoint::new(1, 11.0, 1.0, &config),
            BandPoint::new(2, 11.0, 6.0, &config),
        ];
        (group_by_instrument(&points), bands)
    }

    #[test]
    fn enable_sizes_pane_and_creates_one_series_per_visible_instrument() {
        let (series, bands) = fixture();
        let mut backend = RecordingBackend::new();
        let mut pane = IndicatorPaneManager::new();
        let visible: VisibilitySet = ["A", "C"].into_iter().collect();

        pane.set_mode(&mut backend, IndicatorMode::MeanProximity);
        pane.sync(&mut backend, &series, &visible, &bands);

        assert_eq!(
            backend.last_pane_height(PaneIndex::INDICATOR),
            Some(PLOT_CONFIG.indicator_pane_height)
        );
        assert_eq!(pane.registry().len(), 2);
        assert!(pane.registry().contains(&SeriesIdentity::indicator("C")));
        assert!(!pane.registry().contains(&SeriesIdentity::indicator("B")));

        // C sits on the mean at t=1
        let c = pane.registry().handle(&SeriesIdentity::indicator("C")).unwrap();
        let markers = backend.markers_for(c).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].shape, MarkerShape::Circle);
    }

    #[test]
    fn disabled_mode_does_nothing_on_sync() {
        let (series, bands) = fixture();
        let mut backend = RecordingBackend::new();
        let mut pane = IndicatorPaneManager::new();
        let visible: VisibilitySet = ["A"].into_iter().collect();

        pane.sync(&mut backend, &series, &visible, &bands);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn leaving_visibility_removes_the_indicator_series() {
        let (series, bands) = fixture();
        let mut backend = RecordingBackend::new();
        let mut pane = IndicatorPaneManager::new();
        let mut visible: VisibilitySet = ["A", "B"].into_iter().collect();
        pane.set_mode(&mut backend, IndicatorMode::BandBreach);
        pane.sync(&mut backend, &series, &visible, &bands);
        let b = pane.registry().handle(&SeriesIdentity::indicator("B")).unwrap();

        visible.remove(&InstrumentId::from("B"));
        pane.sync(&mut backend, &series, &visible, &bands);

        assert_eq!(backend.remove_count_for(b), 1);
        assert!(!pane.registry().contains(&SeriesIdentity::indicator("B")));
        assert!(pane.registry().contains(&SeriesIdentity::indicator("A")));
    }

    #[test]
    fn disabling_tears_everything_down() {
        let (series, bands) = fixture();
        let mut backend = RecordingBackend::new();
        let mut pane = IndicatorPaneManager::new();
        let visible: VisibilitySet = ["A", "B", "C"].into_iter().collect();
        pane.set_mode(&mut backend, IndicatorMode::MeanProximity);
        pane.sync(&mut backend, &series, &visible, &bands);
        assert_eq!(pane.registry().len(), 3);

        pane.set_mode(&mut backend, IndicatorMode::Disabled);

        assert!(pane.registry().is_empty());
        assert_eq!(backend.remove_count(), 3);
        assert_eq!(backend.last_pane_height(PaneIndex::INDICATOR), Some(0.0));
        assert!(backend.live_handles().is_empty());
    }

    #[test]
    fn second_sync_replaces_markers_instead_of_attaching_again() {
        let (series, bands) = fixture();
        let mut backend = RecordingBackend::new();
        let mut pane = IndicatorPaneManager::new();
        let visible: VisibilitySet = ["A"].into_iter().collect();
        pane.set_mode(&mut backend, IndicatorMode::MeanProximity);
        pane.sync(&mut backend, &series, &visible, &bands);
        pane.sync(&mut backend, &series, &visible, &bands);

        let creates = backend
            .calls
            .iter()
            .filter(|c| matches!(c, crate::engine::testing::Call::CreateMarkers { .. }))
            .count();
        let sets = backend
            .calls
            .iter()
            .filter(|c| matches!(c, crate::engine::testing::Call::SetMarkers { .. }))
            .count();
        assert_eq!((creates, sets), (1, 1));
        assert_eq!(backend.create_count(), 1);
    }

    #[test]
    fn switching_between_enabled_modes_keeps_series() {
        let (series, bands) = fixture();
        let mut backend = RecordingBackend::new();
        let mut pane = IndicatorPaneManager::new();
        let visible: VisibilitySet = ["A"].into_iter().collect();
        pane.set_mode(&mut backend, IndicatorMode::MeanProximity);
        pane.sync(&mut backend, &series, &visible, &bands);

        pane.set_mode(&mut backend, IndicatorMode::BandBreach);
        pane.sync(&mut backend, &series, &visible, &bands);

        assert_eq!(backend.remove_count(), 0);
        assert_eq!(backend.create_count(), 1);
    }
}
