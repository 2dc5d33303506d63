use eframe::egui::Color32;
use std::collections::HashSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    Circle,
    ArrowUp,
    ArrowDown,
}

/// A point annotation carried by an indicator-pane series.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub timestamp_ms: i64,
    pub shape: MarkerShape,
    pub color: Color32,
    pub text: String,
}

/// Collapse markers sharing a timestamp, keeping the first of each.
pub fn dedup_markers_keep_first(markers: Vec<Marker>) -> Vec<Marker> {
    let mut seen = HashSet::new();
    markers
        .into_iter()
        .filter(|marker| seen.insert(marker.timestamp_ms))
        .collect()
}
