//! Proximity conditions shown as markers in the indicator pane.

use std::collections::HashMap;

use crate::config::ANALYSIS;
use crate::config::plot::PLOT_CONFIG;
use crate::domain::marker::dedup_markers_keep_first;
use crate::domain::{BandName, BandPoint, IndicatorMode, Marker, MarkerShape, OhlcvPoint};
use crate::utils::time_utils::epoch_ms_to_axis_label;

/// Timestamps at which `points` (one instrument) meet the mode's condition
/// against the basket bands. Already collapsed to one marker per timestamp.
pub fn detect_markers(mode: IndicatorMode, points: &[OhlcvPoint], bands: &[BandPoint]) -> Vec<Marker> {
    if !mode.is_enabled() || points.is_empty() || bands.is_empty() {
        return Vec::new();
    }

    let bands_by_ts: HashMap<i64, &BandPoint> = bands.iter().map(|b| (b.timestamp_ms, b)).collect();

    let markers = points
        .iter()
        .filter_map(|point| {
            let band = bands_by_ts.get(&point.timestamp_ms)?;
            match mode {
                IndicatorMode::Disabled => None,
                IndicatorMode::MeanProximity => mean_proximity(point, band),
                IndicatorMode::BandBreach => band_breach(point, band),
            }
        })
        .collect();

    dedup_markers_keep_first(markers)
}

fn mean_proximity(point: &OhlcvPoint, band: &BandPoint) -> Option<Marker> {
    if band.mean == 0.0 {
        return None;
    }
    let distance_pct = (point.close - band.mean).abs() / band.mean.abs();
    (distance_pct <= ANALYSIS.proximity.mean_threshold_pct).then(|| Marker {
        timestamp_ms: point.timestamp_ms,
        shape: MarkerShape::Circle,
        color: PLOT_CONFIG.mean_proximity_marker_color,
        text: format!(
            "{} near mean ({:.3}%) @ {}",
            point.instrument_id,
            distance_pct * 100.0,
            epoch_ms_to_axis_label(point.timestamp_ms)
        ),
    })
}

fn band_breach(point: &OhlcvPoint, band: &BandPoint) -> Option<Marker> {
    let name = BandName::from_offset_index(ANALYSIS.proximity.breach_band_index)?;
    let envelope = band.offset(name)?;

    let (shape, color, side) = if point.close > envelope.upper {
        (MarkerShape::ArrowUp, PLOT_CONFIG.breach_up_marker_color, "above")
    } else if point.close < envelope.lower {
        (MarkerShape::ArrowDown, PLOT_CONFIG.breach_down_marker_color, "below")
    } else {
        return None;
    };

    Some(Marker {
        timestamp_ms: point.timestamp_ms,
        shape,
        color,
        text: format!("{} closed {} {}", point.instrument_id, side, name),
    })
}
