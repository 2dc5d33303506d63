//! Primary series lifecycle: absent, visible-styled or transparent-styled.
//!
//! Toggling visibility is a pure style mutation on a series that stays
//! attached. Only two things remove a primary series: its instrument's data
//! disappearing, or a chart-type change (clear and rebuild).

use std::collections::BTreeMap;

use crate::domain::{ChartType, InstrumentId, OhlcvPoint, SeriesIdentity, StyleState, VisibilitySet};
use crate::engine::registry::{NewSeries, SeriesRegistry};
use crate::engine::render::{self, ChartBackend, PaneIndex};
use crate::engine::series_kind::{SeriesKind, series_kind};

#[cfg(debug_assertions)]
use crate::config::PRINT_SERIES_LIFECYCLE;

pub struct VisibilityController {
    registry: SeriesRegistry,
    kind: &'static dyn SeriesKind,
}

impl VisibilityController {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            registry: SeriesRegistry::new(),
            kind: series_kind(chart_type),
        }
    }

    pub fn chart_type(&self) -> ChartType {
        self.kind.chart_type()
    }

    pub fn registry(&self) -> &SeriesRegistry {
        &self.registry
    }

    /// Band series share the primary registry so a chart-type rebuild clears them too.
    pub fn registry_mut(&mut self) -> &mut SeriesRegistry {
        &mut self.registry
    }

    /// Data path. New instruments enter styled from their current membership;
    /// existing series only get their data replaced. Instruments whose data is
    /// gone are removed.
    pub fn apply_data(
        &mut self,
        backend: &mut dyn ChartBackend,
        series: &BTreeMap<InstrumentId, Vec<OhlcvPoint>>,
        visible: &VisibilitySet,
    ) {
        let kind = self.kind;

        let stale: Vec<SeriesIdentity> = self
            .registry
            .keys()
            .filter(|identity| {
                identity.is_primary()
                    && identity
                        .instrument()
                        .is_none_or(|id| series.get(id).is_none_or(|points| points.is_empty()))
            })
            .cloned()
            .collect();
        for identity in &stale {
            self.registry.remove(identity, backend);
        }

        for (id, points) in series.iter().filter(|(_, points)| !points.is_empty()) {
            let handle = self.registry.upsert(SeriesIdentity::primary(id.clone()), |_| {
                let style_state = StyleState::from_membership(visible.contains(id));
                NewSeries {
                    handle: kind.create(backend, id, style_state),
                    style_state,
                    pane: PaneIndex::MAIN,
                }
            });
            render::replace_data(backend, handle, kind.series_data(points));
        }
    }

    /// Style path. Restyles exactly the series whose membership changed and
    /// never touches data. Returns how many series were restyled.
    pub fn apply_visibility(&mut self, backend: &mut dyn ChartBackend, visible: &VisibilitySet) -> usize {
        let kind = self.kind;
        let changes: Vec<(SeriesIdentity, InstrumentId, StyleState)> = self
            .registry
            .entries()
            .filter_map(|entry| {
                let id = match &entry.identity {
                    SeriesIdentity::Primary(id) => id,
                    _ => return None,
                };
                let wanted = StyleState::from_membership(visible.contains(id));
                (wanted != entry.style_state).then(|| (entry.identity.clone(), id.clone(), wanted))
            })
            .collect();

        for (identity, id, state) in &changes {
            if let Some(handle) = self.registry.handle(identity) {
                kind.restyle(backend, handle, id, *state);
                self.registry.set_style_state(identity, *state);
            }

            #[cfg(debug_assertions)]
            if PRINT_SERIES_LIFECYCLE {
                log::info!("Restyled {} -> {:?}", identity, state);
            }
        }
        changes.len()
    }

    /// The one destructive transition: clear everything and rebuild with the
    /// new kind. Every instrument re-enters from absent.
    pub fn change_chart_type(
        &mut self,
        backend: &mut dyn ChartBackend,
        chart_type: ChartType,
        series: &BTreeMap<InstrumentId, Vec<OhlcvPoint>>,
        visible: &VisibilitySet,
    ) {
        if chart_type == self.chart_type() {
            return;
        }
        log::info!("Chart type {} -> {}: rebuilding series", self.chart_type(), chart_type);
        self.registry.clear(backend);
        self.kind = series_kind(chart_type);
        self.apply_data(backend, series, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::point::group_by_instrument;
    use crate::engine::render::SeriesShape;
    use crate::engine::testing::{Call, RecordingBackend};
    use eframe::egui::Color32;

    fn basket() -> BTreeMap<InstrumentId, Vec<OhlcvPoint>> {
        let points: Vec<OhlcvPoint> = (0..3)
            .flat_map(|t| {
                [
                    OhlcvPoint::new("A", t, 10.0, 11.0, 9.0, 10.0),
                    OhlcvPoint::new("B", t, 12.0, 13.0, 11.0, 12.0),
                ]
            })
            .collect();
        group_by_instrument(&points)
    }

    fn handle_of(controller: &VisibilityController, name: &str) -> crate::engine::render::SeriesHandle {
        controller
            .registry()
            .handle(&SeriesIdentity::primary(name))
            .expect("series registered")
    }

    #[test]
    fn first_appearance_takes_style_from_membership() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let visible: VisibilitySet = ["A"].into_iter().collect();

        controller.apply_data(&mut backend, &basket(), &visible);

        let a = controller.registry().get(&SeriesIdentity::primary("A")).cloned().unwrap();
        let b = controller.registry().get(&SeriesIdentity::primary("B")).cloned().unwrap();
        assert_eq!(a.style_state, StyleState::Visible);
        assert_eq!(b.style_state, StyleState::Transparent);
        assert_eq!(backend.created_style(b.handle).and_then(|s| s.color), Some(Color32::TRANSPARENT));
        assert_eq!(backend.created_style(b.handle).and_then(|s| s.line_width), Some(0.0));
    }

    #[test]
    fn toggle_off_and_on_reuses_handle_with_two_style_calls() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let mut visible: VisibilitySet = ["A", "B"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        let before = handle_of(&controller, "A");
        backend.reset_calls();

        visible.toggle(&InstrumentId::from("A"));
        assert_eq!(controller.apply_visibility(&mut backend, &visible), 1);
        visible.toggle(&InstrumentId::from("A"));
        assert_eq!(controller.apply_visibility(&mut backend, &visible), 1);

        assert_eq!(handle_of(&controller, "A"), before);
        assert_eq!(backend.apply_options_for(before).len(), 2);
        assert_eq!(backend.apply_options_count(), 2);
        assert_eq!(backend.create_count(), 0);
        assert_eq!(backend.remove_count(), 0);
        assert_eq!(backend.set_data_count(), 0);
        // Every style mutation is pinned
        assert_eq!(backend.disable_auto_scale_count(), 2);
    }

    #[test]
    fn unchanged_membership_is_a_no_op() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Area);
        let visible: VisibilitySet = ["A"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        backend.reset_calls();

        assert_eq!(controller.apply_visibility(&mut backend, &visible), 0);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn data_refresh_preserves_style() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let visible: VisibilitySet = ["B"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        backend.reset_calls();

        // A is transparent; even with a different visibility set the data path leaves it alone
        let everyone: VisibilitySet = ["A", "B"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &everyone);

        assert_eq!(backend.apply_options_count(), 0);
        assert_eq!(backend.create_count(), 0);
        assert_eq!(backend.set_data_count(), 2);
        let a = controller.registry().get(&SeriesIdentity::primary("A")).unwrap();
        assert_eq!(a.style_state, StyleState::Transparent);
    }

    #[test]
    fn vanished_data_removes_the_series() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let visible: VisibilitySet = ["A", "B"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        let b = handle_of(&controller, "B");

        let mut only_a = basket();
        only_a.remove(&InstrumentId::from("B"));
        controller.apply_data(&mut backend, &only_a, &visible);

        assert!(!controller.registry().contains(&SeriesIdentity::primary("B")));
        assert_eq!(backend.remove_count_for(b), 1);
    }

    #[test]
    fn chart_type_change_clears_each_entry_once_and_rebuilds() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let visible: VisibilitySet = ["A"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        let old: Vec<_> = controller.registry().entries().map(|e| e.handle).collect();
        backend.reset_calls();

        controller.change_chart_type(&mut backend, ChartType::Candlestick, &basket(), &visible);

        for handle in &old {
            assert_eq!(backend.remove_count_for(*handle), 1);
        }
        assert_eq!(backend.create_count(), 2);
        assert!(backend.calls.iter().all(|c| match c {
            Call::Create { shape, .. } => *shape == SeriesShape::Candlestick,
            _ => true,
        }));
        let a = controller.registry().get(&SeriesIdentity::primary("A")).unwrap();
        let b = controller.registry().get(&SeriesIdentity::primary("B")).unwrap();
        assert_eq!(a.style_state, StyleState::Visible);
        assert_eq!(b.style_state, StyleState::Transparent);
        assert!(!old.contains(&a.handle));
        assert_eq!(controller.chart_type(), ChartType::Candlestick);
    }

    #[test]
    fn same_chart_type_is_not_a_rebuild() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let visible: VisibilitySet = ["A"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        backend.reset_calls();

        controller.change_chart_type(&mut backend, ChartType::Line, &basket(), &visible);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn chart_type_change_after_toggle_keeps_hidden_series_transparent() {
        let mut backend = RecordingBackend::new();
        let mut controller = VisibilityController::new(ChartType::Line);
        let mut visible: VisibilitySet = ["A", "B"].into_iter().collect();
        controller.apply_data(&mut backend, &basket(), &visible);
        visible.toggle(&InstrumentId::from("A"));
        controller.apply_visibility(&mut backend, &visible);
        let old: Vec<_> = controller.registry().entries().map(|e| e.handle).collect();
        backend.reset_calls();

        controller.change_chart_type(&mut backend, ChartType::Candlestick, &basket(), &visible);

        for handle in &old {
            assert_eq!(backend.remove_count_for(*handle), 1);
        }
        let a = controller.registry().get(&SeriesIdentity::primary("A")).cloned().unwrap();
        let b = controller.registry().get(&SeriesIdentity::primary("B")).cloned().unwrap();
        assert!(!old.contains(&a.handle));
        assert_eq!(a.style_state, StyleState::Transparent);
        assert_eq!(backend.created_style(a.handle).and_then(|s| s.color), Some(Color32::TRANSPARENT));
        assert_eq!(b.style_state, StyleState::Visible);
        assert_ne!(backend.created_style(b.handle).and_then(|s| s.color), Some(Color32::TRANSPARENT));
    }
}
