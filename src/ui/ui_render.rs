use eframe::egui::{CentralPanel, Context, Frame, ScrollArea, SidePanel, TopBottomPanel};

use crate::domain::IndicatorMode;
use crate::engine::ChartInput;
use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{
    BandConfigPanel, ChartControlEvent, ChartControlsPanel, InstrumentPanel, Panel,
};
use crate::ui::ui_text::UI_TEXT;

use super::app::SigmaBandsApp;

impl SigmaBandsApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new().fill(UI_CONFIG.colors.side_panel);
        SidePanel::left("left_panel")
            .min_width(UI_CONFIG.side_panel_min_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("side_panel").show(ui, |ui| {
                    let chart_events = ChartControlsPanel::new(
                        self.state.chart_type,
                        self.state.indicator_mode,
                        self.state.anchor_fraction,
                        self.band_config.use_cumulative_mode,
                    )
                    .render(ui);
                    let instrument_events = InstrumentPanel::new(&self.instruments, &self.visible).render(ui);
                    let band_events = BandConfigPanel::new(&self.band_config).render(ui);

                    for event in chart_events {
                        self.handle_chart_event(event);
                    }

                    let mut next_visible = None;
                    for event in &instrument_events {
                        let current = next_visible.as_ref().unwrap_or(&self.visible);
                        next_visible = Some(event.apply(current, &self.instruments));
                    }
                    if let Some(visible) = next_visible {
                        self.set_visible(visible);
                    }

                    if !band_events.is_empty() {
                        for event in &band_events {
                            event.apply(&mut self.band_config);
                        }
                        self.commit_band_config();
                    }
                });
            });
    }

    fn handle_chart_event(&mut self, event: ChartControlEvent) {
        match event {
            ChartControlEvent::ChartType(chart_type) => {
                self.state.chart_type = chart_type;
                self.coordinator.submit(ChartInput::ChartTypeChanged(chart_type));
            }
            ChartControlEvent::IndicatorMode(mode) => {
                self.state.indicator_mode = mode;
                self.coordinator.submit(ChartInput::IndicatorModeChanged(mode));
            }
            ChartControlEvent::Anchor(fraction) => {
                self.state.anchor_fraction = fraction;
                self.coordinator.submit(ChartInput::AnchorChanged(fraction));
            }
            ChartControlEvent::ResetView => self.plot.reset_view(),
        }
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new().fill(UI_CONFIG.colors.central_panel);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                if let Some(error) = &self.last_error {
                    ui.label_error(error.to_string());
                }
                self.plot.show(ui);
            });
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.instruments.is_empty() {
                    ui.label_subdued(UI_TEXT.status_no_data);
                    return;
                }
                let value_color = UI_CONFIG.colors.metric_value;
                ui.metric("Source", self.data_signature, value_color);
                ui.separator();
                ui.metric(
                    "Visible",
                    format!("{}/{}", self.visible.len(), self.instruments.len()),
                    value_color,
                );
                ui.separator();
                ui.metric(UI_TEXT.status_bands, self.coordinator.bands().len(), value_color);
                ui.separator();
                let mode = if self.coordinator.config().use_cumulative_mode { "cumulative" } else { "snapshot" };
                ui.metric("Mode", mode, value_color);
                if self.coordinator.indicator_mode() != IndicatorMode::Disabled {
                    ui.separator();
                    ui.metric("Indicator", self.coordinator.indicator_mode(), value_color);
                }
            });
        });
    }
}
