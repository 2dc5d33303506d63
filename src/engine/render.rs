//! The render collaborator: what the engine needs from a retained-mode chart.
//!
//! Series live in the backend and are addressed by opaque handles. The engine
//! never redraws anything itself; it creates, restyles, feeds and removes.

use std::fmt;

use eframe::egui::Color32;

use crate::domain::{LineStyle, Marker};

/// Opaque handle to a series owned by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesHandle(pub u64);

/// Opaque handle to a marker set attached to a series.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneIndex(pub usize);

impl PaneIndex {
    pub const MAIN: PaneIndex = PaneIndex(0);
    pub const INDICATOR: PaneIndex = PaneIndex(1);
}

/// Geometry a series is created with. Fixed for the life of the series.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SeriesShape {
    Line,
    /// Line with the area underneath filled
    Area,
    Candlestick,
    /// Filled region between a lower and an upper line
    Range,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OhlcBar {
    pub x: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Full replacement data for one series. x is epoch milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesData {
    /// [x, y]
    Line(Vec<[f64; 2]>),
    Ohlc(Vec<OhlcBar>),
    /// [x, lower, upper]
    Range(Vec<[f64; 3]>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Line(v) => v.len(),
            SeriesData::Ohlc(v) => v.len(),
            SeriesData::Range(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this data can be drawn by a series of `shape`.
    pub fn fits(&self, shape: SeriesShape) -> bool {
        matches!(
            (self, shape),
            (SeriesData::Line(_), SeriesShape::Line | SeriesShape::Area)
                | (SeriesData::Ohlc(_), SeriesShape::Candlestick)
                | (SeriesData::Range(_), SeriesShape::Range)
        )
    }
}

/// Partial style. `None` fields leave the current value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleOptions {
    pub color: Option<Color32>,
    pub fill_color: Option<Color32>,
    pub up_color: Option<Color32>,
    pub down_color: Option<Color32>,
    pub line_width: Option<f32>,
    pub line_style: Option<LineStyle>,
    pub title: Option<String>,
}

impl StyleOptions {
    /// Overlay the fields `patch` sets onto `self`.
    pub fn merge(&mut self, patch: &StyleOptions) {
        if patch.color.is_some() {
            self.color = patch.color;
        }
        if patch.fill_color.is_some() {
            self.fill_color = patch.fill_color;
        }
        if patch.up_color.is_some() {
            self.up_color = patch.up_color;
        }
        if patch.down_color.is_some() {
            self.down_color = patch.down_color;
        }
        if patch.line_width.is_some() {
            self.line_width = patch.line_width;
        }
        if patch.line_style.is_some() {
            self.line_style = patch.line_style;
        }
        if patch.title.is_some() {
            self.title.clone_from(&patch.title);
        }
    }

    /// Nothing of this series would show up on screen.
    pub fn is_invisible(&self) -> bool {
        let clear = |c: Option<Color32>| c.is_none_or(|c| c.a() == 0);
        clear(self.color) && clear(self.fill_color) && clear(self.up_color) && clear(self.down_color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    UnknownSeries(SeriesHandle),
    UnknownMarkers(MarkerHandle),
    ShapeMismatch {
        handle: SeriesHandle,
        shape: SeriesShape,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownSeries(h) => write!(f, "Series {:?} is not attached", h),
            RenderError::UnknownMarkers(h) => write!(f, "Marker set {:?} is not attached", h),
            RenderError::ShapeMismatch { handle, shape } => {
                write!(f, "Data does not fit series {:?} ({:?})", handle, shape)
            }
        }
    }
}

impl std::error::Error for RenderError {}

pub trait ChartBackend {
    fn create_series(&mut self, shape: SeriesShape, style: &StyleOptions, pane: PaneIndex) -> SeriesHandle;

    fn set_data(&mut self, handle: SeriesHandle, data: SeriesData) -> Result<(), RenderError>;

    fn apply_options(&mut self, handle: SeriesHandle, style: &StyleOptions) -> Result<(), RenderError>;

    fn remove_series(&mut self, handle: SeriesHandle) -> Result<(), RenderError>;

    /// Height 0 hides the pane.
    fn set_pane_height(&mut self, pane: PaneIndex, height_px: f32);

    fn create_markers(
        &mut self,
        series: SeriesHandle,
        markers: Vec<Marker>,
    ) -> Result<MarkerHandle, RenderError>;

    fn set_markers(&mut self, handle: MarkerHandle, markers: Vec<Marker>) -> Result<(), RenderError>;

    /// Stop the price axis from refitting itself to the next data/style change.
    fn disable_auto_scale(&mut self);
}

// ============================================================================
// Pinned mutations: every data/style change is followed by disable_auto_scale
// ============================================================================

pub fn replace_data(backend: &mut dyn ChartBackend, handle: SeriesHandle, data: SeriesData) {
    if let Err(e) = backend.set_data(handle, data) {
        log::warn!("set_data skipped: {}", e);
    }
    backend.disable_auto_scale();
}

pub fn restyle(backend: &mut dyn ChartBackend, handle: SeriesHandle, style: &StyleOptions) {
    if let Err(e) = backend.apply_options(handle, style) {
        log::warn!("apply_options skipped: {}", e);
    }
    backend.disable_auto_scale();
}
