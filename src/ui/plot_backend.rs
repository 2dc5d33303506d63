//! Retained-mode chart over egui_plot.
//!
//! egui_plot is immediate mode: everything is redrawn every frame. This
//! backend keeps the series the engine created, with their style and data,
//! and replays them into one `Plot` per pane on each frame.

use std::collections::{BTreeMap, HashMap};

use eframe::egui::{Color32, Id, Stroke, Ui, Vec2b};
use egui_plot::{
    AxisHints, BoxElem, BoxPlot, BoxSpread, Corner, HPlacement, Legend, Line, LineStyle as PlotLineStyle,
    MarkerShape as PlotMarkerShape, Plot, PlotPoints, PlotUi, Points, Polygon,
};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{LineStyle, Marker, MarkerShape};
use crate::engine::render::{
    ChartBackend, MarkerHandle, OhlcBar, PaneIndex, RenderError, SeriesData, SeriesHandle, SeriesShape,
    StyleOptions,
};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;
use crate::utils::maths_utils;
use crate::utils::time_utils::epoch_ms_to_axis_label;

struct RetainedSeries {
    shape: SeriesShape,
    pane: PaneIndex,
    style: StyleOptions,
    data: SeriesData,
}

impl RetainedSeries {
    fn empty_data(shape: SeriesShape) -> SeriesData {
        match shape {
            SeriesShape::Line | SeriesShape::Area => SeriesData::Line(Vec::new()),
            SeriesShape::Candlestick => SeriesData::Ohlc(Vec::new()),
            SeriesShape::Range => SeriesData::Range(Vec::new()),
        }
    }

    /// y of the series at `x`, for anchoring markers
    fn y_at(&self, x: f64) -> f64 {
        match &self.data {
            SeriesData::Line(points) => points
                .iter()
                .find(|p| p[0] == x)
                .map(|p| p[1])
                .unwrap_or(0.0),
            SeriesData::Ohlc(bars) => bars.iter().find(|b| b.x == x).map(|b| b.high).unwrap_or(0.0),
            SeriesData::Range(rows) => rows.iter().find(|r| r[0] == x).map(|r| r[2]).unwrap_or(0.0),
        }
    }
}

pub struct RetainedPlot {
    next_id: u64,
    /// Keyed by handle, so drawing order is creation order
    series: BTreeMap<SeriesHandle, RetainedSeries>,
    marker_sets: HashMap<MarkerHandle, (SeriesHandle, Vec<Marker>)>,
    pane_heights: BTreeMap<PaneIndex, f32>,
    auto_scale_disabled: bool,
    /// Auto-bounds get one frame with data to find an initial view
    has_fitted: bool,
}

impl Default for RetainedPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl RetainedPlot {
    pub fn new() -> Self {
        let pane_heights = BTreeMap::from([
            (PaneIndex::MAIN, PLOT_CONFIG.main_pane_height),
            (PaneIndex::INDICATOR, 0.0),
        ]);
        Self {
            next_id: 0,
            series: BTreeMap::new(),
            marker_sets: HashMap::new(),
            pane_heights,
            auto_scale_disabled: false,
            has_fitted: false,
        }
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn pane_height(&self, pane: PaneIndex) -> f32 {
        self.pane_heights.get(&pane).copied().unwrap_or(0.0)
    }

    pub fn is_auto_scale_disabled(&self) -> bool {
        self.auto_scale_disabled
    }

    /// Forget the initial fit so the next frame frames the data again.
    pub fn reset_view(&mut self) {
        self.has_fitted = false;
    }

    fn has_data(&self, pane: PaneIndex) -> bool {
        self.series.values().any(|s| s.pane == pane && !s.data.is_empty())
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn show(&mut self, ui: &mut Ui) {
        let pin = self.auto_scale_disabled && self.has_fitted;
        let link_group = Id::new("sigma_bands_time_axis");

        Plot::new("sigma_bands_main")
            .height(self.pane_height(PaneIndex::MAIN))
            .legend(Legend::default().position(Corner::LeftTop))
            .custom_x_axes(vec![time_axis()])
            .custom_y_axes(vec![price_axis()])
            .link_axis(link_group, Vec2b::new(true, false))
            .label_formatter(|name, value| {
                format!(
                    "{}\n{}\n{}",
                    name,
                    epoch_ms_to_axis_label(value.x as i64),
                    format_price(value.y)
                )
            })
            .show(ui, |plot_ui| {
                if pin {
                    plot_ui.set_auto_bounds(Vec2b::FALSE);
                }
                self.draw_pane(plot_ui, PaneIndex::MAIN);
            });

        let indicator_height = self.pane_height(PaneIndex::INDICATOR);
        if indicator_height > 0.0 {
            Plot::new("sigma_bands_indicator")
                .height(indicator_height)
                .custom_x_axes(vec![time_axis()])
                .show_y(false)
                .include_y(-1.0)
                .include_y(1.0)
                .link_axis(link_group, Vec2b::new(true, false))
                .label_formatter(|name, _| name.to_string())
                .show(ui, |plot_ui| {
                    if pin {
                        plot_ui.set_auto_bounds(Vec2b::FALSE);
                    }
                    self.draw_pane(plot_ui, PaneIndex::INDICATOR);
                });
        }

        if self.has_data(PaneIndex::MAIN) {
            self.has_fitted = true;
        }
    }

    fn draw_pane(&self, plot_ui: &mut PlotUi, pane: PaneIndex) {
        for (handle, series) in self.series.iter().filter(|(_, s)| s.pane == pane) {
            if series.style.is_invisible() {
                continue;
            }
            let name = series
                .style
                .title
                .clone()
                .unwrap_or_else(|| format!("series {}", handle.0));

            match (&series.data, series.shape) {
                (SeriesData::Line(points), SeriesShape::Line) => {
                    draw_line(plot_ui, &name, points, &series.style, None);
                }
                (SeriesData::Line(points), SeriesShape::Area) => {
                    let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
                    let floor = maths_utils::get_min_max(&ys).map(|(min, _)| min as f32);
                    draw_line(plot_ui, &name, points, &series.style, floor);
                }
                (SeriesData::Ohlc(bars), SeriesShape::Candlestick) => {
                    draw_candles(plot_ui, &name, bars, &series.style);
                }
                (SeriesData::Range(rows), SeriesShape::Range) => {
                    draw_range(plot_ui, &name, rows, &series.style);
                }
                _ => {}
            }

            for (_, markers) in self.marker_sets.values().filter(|(s, _)| s == handle) {
                for marker in markers {
                    let x = marker.timestamp_ms as f64;
                    plot_ui.points(
                        Points::new(&marker.text, PlotPoints::new(vec![[x, series.y_at(x)]]))
                            .shape(plot_marker_shape(marker.shape))
                            .color(marker.color)
                            .radius(PLOT_CONFIG.marker_radius)
                            .filled(true),
                    );
                }
            }
        }
    }
}

impl ChartBackend for RetainedPlot {
    fn create_series(&mut self, shape: SeriesShape, style: &StyleOptions, pane: PaneIndex) -> SeriesHandle {
        let handle = SeriesHandle(self.next_id());
        self.series.insert(
            handle,
            RetainedSeries {
                shape,
                pane,
                style: style.clone(),
                data: RetainedSeries::empty_data(shape),
            },
        );
        handle
    }

    fn set_data(&mut self, handle: SeriesHandle, data: SeriesData) -> Result<(), RenderError> {
        let series = self.series.get_mut(&handle).ok_or(RenderError::UnknownSeries(handle))?;
        if !data.fits(series.shape) {
            return Err(RenderError::ShapeMismatch {
                handle,
                shape: series.shape,
            });
        }
        series.data = data;
        Ok(())
    }

    fn apply_options(&mut self, handle: SeriesHandle, style: &StyleOptions) -> Result<(), RenderError> {
        let series = self.series.get_mut(&handle).ok_or(RenderError::UnknownSeries(handle))?;
        series.style.merge(style);
        Ok(())
    }

    fn remove_series(&mut self, handle: SeriesHandle) -> Result<(), RenderError> {
        self.series.remove(&handle).ok_or(RenderError::UnknownSeries(handle))?;
        self.marker_sets.retain(|_, (series, _)| *series != handle);
        Ok(())
    }

    fn set_pane_height(&mut self, pane: PaneIndex, height_px: f32) {
        self.pane_heights.insert(pane, height_px.max(0.0));
    }

    fn create_markers(&mut self, series: SeriesHandle, markers: Vec<Marker>) -> Result<MarkerHandle, RenderError> {
        if !self.series.contains_key(&series) {
            return Err(RenderError::UnknownSeries(series));
        }
        let handle = MarkerHandle(self.next_id());
        self.marker_sets.insert(handle, (series, markers));
        Ok(handle)
    }

    fn set_markers(&mut self, handle: MarkerHandle, markers: Vec<Marker>) -> Result<(), RenderError> {
        let (_, current) = self
            .marker_sets
            .get_mut(&handle)
            .ok_or(RenderError::UnknownMarkers(handle))?;
        *current = markers;
        Ok(())
    }

    fn disable_auto_scale(&mut self) {
        self.auto_scale_disabled = true;
    }
}

// ============================================================================
// Drawing helpers
// ============================================================================

fn draw_line(plot_ui: &mut PlotUi, name: &str, points: &[[f64; 2]], style: &StyleOptions, fill_to: Option<f32>) {
    let mut line = Line::new(name, PlotPoints::new(points.to_vec()))
        .color(style.color.unwrap_or(Color32::GRAY))
        .width(style.line_width.unwrap_or(1.0))
        .style(plot_line_style(style.line_style.unwrap_or_default()));
    if let Some(y) = fill_to {
        line = line.fill(y);
    }
    plot_ui.line(line);
}

/// egui_plot only fills convex polygons, so one quad per step.
fn draw_range(plot_ui: &mut PlotUi, name: &str, rows: &[[f64; 3]], style: &StyleOptions) {
    let fill = style.fill_color.unwrap_or(Color32::TRANSPARENT);
    for pair in rows.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let quad = PlotPoints::new(vec![[a[0], a[1]], [b[0], b[1]], [b[0], b[2]], [a[0], a[2]]]);
        plot_ui.polygon(Polygon::new(name, quad).fill_color(fill).stroke(Stroke::NONE));
    }
}

fn plot_line_style(style: LineStyle) -> PlotLineStyle {
    match style {
        LineStyle::Solid => PlotLineStyle::Solid,
        LineStyle::Dotted => PlotLineStyle::dotted_dense(),
        LineStyle::Dashed => PlotLineStyle::dashed_dense(),
        LineStyle::LongDash => PlotLineStyle::dashed_loose(),
        LineStyle::DashDot => PlotLineStyle::dotted_loose(),
    }
}

fn plot_marker_shape(shape: MarkerShape) -> PlotMarkerShape {
    match shape {
        MarkerShape::Circle => PlotMarkerShape::Circle,
        MarkerShape::ArrowUp => PlotMarkerShape::Up,
        MarkerShape::ArrowDown => PlotMarkerShape::Down,
    }
}

fn draw_candles(plot_ui: &mut PlotUi, name: &str, bars: &[OhlcBar], style: &StyleOptions) {
    let spacing = bars
        .windows(2)
        .map(|pair| pair[1].x - pair[0].x)
        .filter(|dx| *dx > 0.0)
        .fold(f64::INFINITY, f64::min);
    let width = if spacing.is_finite() { spacing * PLOT_CONFIG.candle_body_fraction } else { 1.0 };
    let up = style.up_color.unwrap_or(PLOT_CONFIG.candle_up_color);
    let down = style.down_color.unwrap_or(PLOT_CONFIG.candle_down_color);

    let elems: Vec<BoxElem> = bars
        .iter()
        .map(|bar| {
            let color = if bar.close >= bar.open { up } else { down };
            let body_low = bar.open.min(bar.close);
            let body_high = bar.open.max(bar.close);
            BoxElem::new(
                bar.x,
                BoxSpread::new(bar.low, body_low, (body_low + body_high) / 2.0, body_high, bar.high),
            )
            .box_width(width)
            .whisker_width(0.0)
            .fill(color)
            .stroke(Stroke::new(1.0, color))
        })
        .collect();

    plot_ui.box_plot(BoxPlot::new(name, elems));
}

fn time_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis)
        .formatter(|grid_mark, _range| epoch_ms_to_axis_label(grid_mark.value as i64))
}

fn price_axis() -> AxisHints<'static> {
    AxisHints::new_y()
        .label(UI_TEXT.plot_y_axis)
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Left)
}
