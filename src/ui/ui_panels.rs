use eframe::egui::{Color32, ComboBox, DragValue, Grid, RichText, ScrollArea, Slider, Ui};
use strum::IntoEnumIterator;

use crate::domain::{
    BandLevelConfig, BandName, ChartType, IndicatorMode, InstrumentId, LineStyle, StatisticalBandConfig,
    VisibilitySet,
};
use crate::engine::series_kind::instrument_color;
use crate::ui::config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, section_separator, subsection_label};

#[cfg(debug_assertions)]
use crate::config::PRINT_UI_INTERACTIONS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

// ============================================================================
// Chart controls
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ChartControlEvent {
    ChartType(ChartType),
    IndicatorMode(IndicatorMode),
    Anchor(f64),
    ResetView,
}

pub struct ChartControlsPanel {
    chart_type: ChartType,
    indicator_mode: IndicatorMode,
    anchor_fraction: f64,
    cumulative: bool,
}

impl ChartControlsPanel {
    pub fn new(chart_type: ChartType, indicator_mode: IndicatorMode, anchor_fraction: f64, cumulative: bool) -> Self {
        Self {
            chart_type,
            indicator_mode,
            anchor_fraction,
            cumulative,
        }
    }
}

impl Panel for ChartControlsPanel {
    type Event = ChartControlEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.chart_heading);

        let mut chart_type = self.chart_type;
        ComboBox::from_label(UI_TEXT.chart_type_label)
            .selected_text(chart_type.to_string())
            .show_ui(ui, |ui| {
                for option in ChartType::iter() {
                    ui.selectable_value(&mut chart_type, option, option.to_string());
                }
            });
        if chart_type != self.chart_type {
            self.chart_type = chart_type;
            events.push(ChartControlEvent::ChartType(chart_type));
        }

        let mut mode = self.indicator_mode;
        ComboBox::from_label(UI_TEXT.indicator_label)
            .selected_text(mode.to_string())
            .show_ui(ui, |ui| {
                for option in IndicatorMode::iter() {
                    ui.selectable_value(&mut mode, option, option.to_string());
                }
            });
        if mode != self.indicator_mode {
            self.indicator_mode = mode;
            events.push(ChartControlEvent::IndicatorMode(mode));
        }

        // The anchor only means something for cumulative bands
        ui.add_enabled_ui(self.cumulative, |ui| {
            ui.label(subsection_label(UI_TEXT.anchor_label));
            let response = ui.add(Slider::new(&mut self.anchor_fraction, 0.0..=1.0).fixed_decimals(2));
            if response.changed() {
                events.push(ChartControlEvent::Anchor(self.anchor_fraction));
            }
            ui.label_subdued(UI_TEXT.anchor_helper);
        });

        if ui.button(UI_TEXT.reset_view).clicked() {
            events.push(ChartControlEvent::ResetView);
        }

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS && !events.is_empty() {
            log::info!("Chart controls: {:?}", events);
        }

        events
    }
}

// ============================================================================
// Instrument visibility
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentEvent {
    Toggle(InstrumentId),
    ShowAll,
    HideAll,
}

pub struct InstrumentPanel<'a> {
    instruments: &'a [InstrumentId],
    visible: &'a VisibilitySet,
}

impl<'a> InstrumentPanel<'a> {
    pub fn new(instruments: &'a [InstrumentId], visible: &'a VisibilitySet) -> Self {
        Self { instruments, visible }
    }
}

impl Panel for InstrumentPanel<'_> {
    type Event = InstrumentEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_separator(ui);
        section_heading(ui, UI_TEXT.instruments_heading);

        ui.horizontal(|ui| {
            if ui.button(UI_TEXT.show_all).clicked() {
                events.push(InstrumentEvent::ShowAll);
            }
            if ui.button(UI_TEXT.hide_all).clicked() {
                events.push(InstrumentEvent::HideAll);
            }
        });

        ScrollArea::vertical()
            .max_height(UI_CONFIG.instrument_list_max_height)
            .id_salt("instrument_selector")
            .show(ui, |ui| {
                for id in self.instruments {
                    let shown = self.visible.contains(id);
                    let color = if shown { instrument_color(id) } else { UI_CONFIG.colors.label };
                    ui.horizontal(|ui| {
                        ui.color_chip(color);
                        if ui
                            .selectable_label(shown, RichText::new(id.as_str()).color(color))
                            .clicked()
                        {
                            events.push(InstrumentEvent::Toggle(id.clone()));
                        }
                    });
                }
            });

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS && !events.is_empty() {
            log::info!("Instrument toggles: {:?}", events);
        }

        events
    }
}

impl InstrumentEvent {
    /// The visibility set after this event.
    pub fn apply(&self, visible: &VisibilitySet, instruments: &[InstrumentId]) -> VisibilitySet {
        match self {
            InstrumentEvent::Toggle(id) => {
                let mut next = visible.clone();
                next.toggle(id);
                next
            }
            InstrumentEvent::ShowAll => instruments.iter().cloned().collect(),
            InstrumentEvent::HideAll => VisibilitySet::new(),
        }
    }
}

// ============================================================================
// Band configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum BandConfigEvent {
    Enabled(bool),
    CumulativeMode(bool),
    FilledAreas(bool),
    LevelEnabled(BandName, bool),
    Sigma(BandName, f64),
    Opacity(BandName, f64),
    LineWeight(BandName, f64),
    LineStyle(BandName, LineStyle),
    Color(BandName, String),
    ResetDefaults,
}

impl BandConfigEvent {
    pub fn apply(&self, config: &mut StatisticalBandConfig) {
        match self {
            BandConfigEvent::Enabled(on) => config.enabled = *on,
            BandConfigEvent::CumulativeMode(on) => config.use_cumulative_mode = *on,
            BandConfigEvent::FilledAreas(on) => config.show_filled_areas = *on,
            BandConfigEvent::LevelEnabled(name, on) => level_mut(config, *name).enabled = *on,
            BandConfigEvent::Sigma(name, sigma) => level_mut(config, *name).sigma_multiplier = *sigma,
            BandConfigEvent::Opacity(name, opacity) => level_mut(config, *name).opacity = *opacity,
            BandConfigEvent::LineWeight(name, weight) => level_mut(config, *name).line_weight = *weight,
            BandConfigEvent::LineStyle(name, style) => level_mut(config, *name).line_style = *style,
            BandConfigEvent::Color(name, hex) => level_mut(config, *name).color.clone_from(hex),
            BandConfigEvent::ResetDefaults => *config = StatisticalBandConfig::default(),
        }
    }
}

fn level_mut(config: &mut StatisticalBandConfig, name: BandName) -> &mut BandLevelConfig {
    config
        .levels
        .entry(name)
        .or_insert_with(|| BandLevelConfig::default_for(name))
}

pub struct BandConfigPanel<'a> {
    config: &'a StatisticalBandConfig,
}

impl<'a> BandConfigPanel<'a> {
    pub fn new(config: &'a StatisticalBandConfig) -> Self {
        Self { config }
    }

    fn render_level(&self, ui: &mut Ui, name: BandName, events: &mut Vec<BandConfigEvent>) {
        let level = self.config.level(name);

        let mut enabled = level.enabled;
        if ui.checkbox(&mut enabled, name.to_string()).changed() {
            events.push(BandConfigEvent::LevelEnabled(name, enabled));
        }

        // The mean line has no width in sigma
        if name == BandName::Mean {
            ui.label("");
        } else {
            let mut sigma = level.sigma_multiplier;
            if ui
                .add(DragValue::new(&mut sigma).speed(0.05).range(0.0..=10.0).suffix(UI_TEXT.sigma_label))
                .changed()
            {
                events.push(BandConfigEvent::Sigma(name, sigma));
            }
        }

        let mut color = Color32::from_hex(&level.color).unwrap_or(Color32::GRAY);
        if ui.color_edit_button_srgba(&mut color).changed() {
            events.push(BandConfigEvent::Color(name, color.to_hex()));
        }

        let mut opacity = level.opacity;
        if ui
            .add(DragValue::new(&mut opacity).speed(0.01).range(0.0..=1.0).prefix("α "))
            .on_hover_text(UI_TEXT.opacity_label)
            .changed()
        {
            events.push(BandConfigEvent::Opacity(name, opacity));
        }

        let mut weight = level.line_weight;
        if ui
            .add(DragValue::new(&mut weight).speed(0.1).range(0.0..=8.0))
            .on_hover_text(UI_TEXT.weight_label)
            .changed()
        {
            events.push(BandConfigEvent::LineWeight(name, weight));
        }

        let mut style = level.line_style;
        ComboBox::from_id_salt(("line_style", name))
            .selected_text(style.to_string())
            .show_ui(ui, |ui| {
                for option in LineStyle::iter() {
                    ui.selectable_value(&mut style, option, option.to_string());
                }
            });
        if style != level.line_style {
            events.push(BandConfigEvent::LineStyle(name, style));
        }
    }
}

impl Panel for BandConfigPanel<'_> {
    type Event = BandConfigEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_separator(ui);
        section_heading(ui, UI_TEXT.bands_heading);

        let mut enabled = self.config.enabled;
        if ui.checkbox(&mut enabled, UI_TEXT.bands_enabled).changed() {
            events.push(BandConfigEvent::Enabled(enabled));
        }
        let mut cumulative = self.config.use_cumulative_mode;
        if ui.checkbox(&mut cumulative, UI_TEXT.cumulative_mode).changed() {
            events.push(BandConfigEvent::CumulativeMode(cumulative));
        }
        let mut filled = self.config.show_filled_areas;
        if ui.checkbox(&mut filled, UI_TEXT.filled_areas).changed() {
            events.push(BandConfigEvent::FilledAreas(filled));
        }

        ui.add_enabled_ui(self.config.enabled, |ui| {
            Grid::new("band_levels").num_columns(6).striped(true).show(ui, |ui| {
                for name in BandName::iter() {
                    self.render_level(ui, name, &mut events);
                    ui.end_row();
                }
            });
        });

        if ui.button(UI_TEXT.reset_defaults).clicked() {
            events.push(BandConfigEvent::ResetDefaults);
        }

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS && !events.is_empty() {
            log::info!("Band config edits: {:?}", events);
        }

        events
    }
}
