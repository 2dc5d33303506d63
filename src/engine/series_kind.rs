//! Per-chart-type behaviour of primary instrument series.
//!
//! Everything that differs between line, area and candlestick lives behind
//! [`SeriesKind`]; the lifecycle code above it never matches on chart type.

use std::hash::{Hash, Hasher};

use colorgrad::Gradient;
use eframe::egui::Color32;

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{ChartType, InstrumentId, LineStyle, OhlcvPoint, StyleState};
use crate::engine::render::{
    self, ChartBackend, OhlcBar, PaneIndex, SeriesData, SeriesHandle, SeriesShape, StyleOptions,
};

pub trait SeriesKind {
    fn chart_type(&self) -> ChartType;

    fn shape(&self) -> SeriesShape;

    fn visible_style(&self, id: &InstrumentId) -> StyleOptions;

    /// Fully see-through; line-type widths forced to 0.
    fn transparent_style(&self) -> StyleOptions;

    fn series_data(&self, points: &[OhlcvPoint]) -> SeriesData;

    fn style_for(&self, id: &InstrumentId, state: StyleState) -> StyleOptions {
        match state {
            StyleState::Visible => self.visible_style(id),
            StyleState::Transparent => self.transparent_style(),
        }
    }

    fn create(&self, backend: &mut dyn ChartBackend, id: &InstrumentId, state: StyleState) -> SeriesHandle {
        backend.create_series(self.shape(), &self.style_for(id, state), PaneIndex::MAIN)
    }

    fn restyle(&self, backend: &mut dyn ChartBackend, handle: SeriesHandle, id: &InstrumentId, state: StyleState) {
        render::restyle(backend, handle, &self.style_for(id, state));
    }
}

/// The kind used for `chart_type`. Chosen once per chart type.
pub fn series_kind(chart_type: ChartType) -> &'static dyn SeriesKind {
    match chart_type {
        ChartType::Line => &LineKind,
        ChartType::Area => &AreaKind,
        ChartType::Candlestick => &CandlestickKind,
    }
}

fn close_line(points: &[OhlcvPoint]) -> SeriesData {
    SeriesData::Line(
        points
            .iter()
            .map(|p| [p.timestamp_ms as f64, p.close])
            .collect(),
    )
}

fn line_transparent() -> StyleOptions {
    StyleOptions {
        color: Some(Color32::TRANSPARENT),
        fill_color: Some(Color32::TRANSPARENT),
        line_width: Some(0.0),
        ..Default::default()
    }
}

// ============================================================================
// Line
// ============================================================================

pub struct LineKind;

impl SeriesKind for LineKind {
    fn chart_type(&self) -> ChartType {
        ChartType::Line
    }

    fn shape(&self) -> SeriesShape {
        SeriesShape::Line
    }

    fn visible_style(&self, id: &InstrumentId) -> StyleOptions {
        StyleOptions {
            color: Some(instrument_color(id)),
            line_width: Some(PLOT_CONFIG.primary_line_width),
            line_style: Some(LineStyle::Solid),
            title: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn transparent_style(&self) -> StyleOptions {
        line_transparent()
    }

    fn series_data(&self, points: &[OhlcvPoint]) -> SeriesData {
        close_line(points)
    }
}

// ============================================================================
// Area
// ============================================================================

pub struct AreaKind;

impl SeriesKind for AreaKind {
    fn chart_type(&self) -> ChartType {
        ChartType::Area
    }

    fn shape(&self) -> SeriesShape {
        SeriesShape::Area
    }

    fn visible_style(&self, id: &InstrumentId) -> StyleOptions {
        let color = instrument_color(id);
        StyleOptions {
            color: Some(color),
            fill_color: Some(color.gamma_multiply(PLOT_CONFIG.band_fill_opacity_pct)),
            line_width: Some(PLOT_CONFIG.primary_line_width),
            line_style: Some(LineStyle::Solid),
            title: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn transparent_style(&self) -> StyleOptions {
        line_transparent()
    }

    fn series_data(&self, points: &[OhlcvPoint]) -> SeriesData {
        close_line(points)
    }
}

// ============================================================================
// Candlestick
// ============================================================================

pub struct CandlestickKind;

impl SeriesKind for CandlestickKind {
    fn chart_type(&self) -> ChartType {
        ChartType::Candlestick
    }

    fn shape(&self) -> SeriesShape {
        SeriesShape::Candlestick
    }

    fn visible_style(&self, id: &InstrumentId) -> StyleOptions {
        StyleOptions {
            color: Some(instrument_color(id)),
            up_color: Some(PLOT_CONFIG.candle_up_color),
            down_color: Some(PLOT_CONFIG.candle_down_color),
            title: Some(id.to_string()),
            ..Default::default()
        }
    }

    // Candles have no line width to zero out
    fn transparent_style(&self) -> StyleOptions {
        StyleOptions {
            color: Some(Color32::TRANSPARENT),
            up_color: Some(Color32::TRANSPARENT),
            down_color: Some(Color32::TRANSPARENT),
            ..Default::default()
        }
    }

    fn series_data(&self, points: &[OhlcvPoint]) -> SeriesData {
        SeriesData::Ohlc(
            points
                .iter()
                .map(|p| OhlcBar {
                    x: p.timestamp_ms as f64,
                    open: p.open,
                    high: p.high,
                    low: p.low,
                    close: p.close,
                })
                .collect(),
        )
    }
}

// ============================================================================
// Instrument palette
// ============================================================================

/// Deterministic color for an instrument, stable across runs and rebuilds.
pub fn instrument_color(id: &InstrumentId) -> Color32 {
    let gradient = colorgrad::GradientBuilder::new()
        .html_colors(PLOT_CONFIG.instrument_gradient_colors)
        .build::<colorgrad::LinearGradient>();

    match gradient {
        Ok(gradient) => to_egui_color(gradient.at(palette_position(id))),
        Err(e) => {
            log::warn!("Instrument palette unavailable: {}", e);
            Color32::LIGHT_GRAY
        }
    }
}

/// Position in [0, 1] derived from the id. DefaultHasher::new() uses fixed keys,
/// so this does not change between runs.
fn palette_position(id: &InstrumentId) -> f32 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.as_str().hash(&mut hasher);
    (hasher.finish() % 1024) as f32 / 1023.0
}

fn to_egui_color(colorgrad_color: colorgrad::Color) -> Color32 {
    let rgba8 = colorgrad_color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_chart_type_maps_to_its_kind() {
        for chart_type in ChartType::iter() {
            assert_eq!(series_kind(chart_type).chart_type(), chart_type);
        }
    }

    #[test]
    fn transparent_styles_hide_everything() {
        for chart_type in ChartType::iter() {
            let style = series_kind(chart_type).transparent_style();
            assert!(style.is_invisible(), "{chart_type} transparent style still shows");
            if chart_type != ChartType::Candlestick {
                assert_eq!(style.line_width, Some(0.0));
            }
        }
    }

    #[test]
    fn palette_is_deterministic() {
        let a = InstrumentId::from("BTCUSDT");
        assert_eq!(instrument_color(&a), instrument_color(&a));
        assert_eq!(instrument_color(&a).a(), 255);
    }

    #[test]
    fn candle_data_carries_ohlc() {
        let points = vec![OhlcvPoint::new("A", 5, 1.0, 3.0, 0.5, 2.0)];
        match CandlestickKind.series_data(&points) {
            SeriesData::Ohlc(bars) => {
                assert_eq!(bars.len(), 1);
                assert_eq!(bars[0].x, 5.0);
                assert_eq!(bars[0].high, 3.0);
            }
            other => panic!("unexpected data {other:?}"),
        }
    }
}
