use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::instrument::InstrumentId;

// ============================================================================
// OhlcvPoint: one candle of one instrument
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvPoint {
    pub instrument_id: InstrumentId,
    pub timestamp_ms: i64,

    // Prices
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl OhlcvPoint {
    pub fn new(
        instrument_id: impl Into<InstrumentId>,
        timestamp_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

// ============================================================================
// Grouping helpers
// ============================================================================

/// Drop repeated (instrument, timestamp) pairs, keeping the first occurrence.
pub fn dedup_points<'a>(points: impl IntoIterator<Item = &'a OhlcvPoint>) -> Vec<&'a OhlcvPoint> {
    let mut seen: HashSet<(&InstrumentId, i64)> = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert((&p.instrument_id, p.timestamp_ms)))
        .collect()
}

/// Split a mixed basket into per-instrument series, deduplicated and sorted by time.
pub fn group_by_instrument(points: &[OhlcvPoint]) -> BTreeMap<InstrumentId, Vec<OhlcvPoint>> {
    let mut grouped: BTreeMap<InstrumentId, Vec<OhlcvPoint>> = BTreeMap::new();
    for point in dedup_points(points) {
        grouped
            .entry(point.instrument_id.clone())
            .or_default()
            .push(point.clone());
    }
    for series in grouped.values_mut() {
        // Stable: duplicates were already removed, ties cannot reorder anything meaningful
        series.sort_by_key(|p| p.timestamp_ms);
    }
    grouped
}

/// Distinct instruments in the basket, sorted.
pub fn instrument_ids(points: &[OhlcvPoint]) -> Vec<InstrumentId> {
    points
        .iter()
        .map(|p| &p.instrument_id)
        .unique()
        .sorted()
        .cloned()
        .collect()
}

// ============================================================================
// TimestampRange
// ============================================================================

/// Inclusive range of timestamps (ms).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRange {
    pub min_ms: i64,
    pub max_ms: i64,
}

impl TimestampRange {
    pub fn new(min_ms: i64, max_ms: i64) -> Self {
        if max_ms < min_ms {
            Self { min_ms: max_ms, max_ms: min_ms }
        } else {
            Self { min_ms, max_ms }
        }
    }

    /// Range spanned by `points`, or None when there are none.
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a OhlcvPoint>) -> Option<Self> {
        match points.into_iter().map(|p| p.timestamp_ms).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(ts) => Some(Self::new(ts, ts)),
            MinMaxResult::MinMax(min, max) => Some(Self::new(min, max)),
        }
    }

    /// Saturates instead of overflowing for ranges wider than i64 can hold.
    pub fn span_ms(&self) -> i64 {
        self.max_ms.saturating_sub(self.min_ms)
    }

    /// Timestamp at `fraction` of the way through the range (fraction clamped to [0, 1]).
    pub fn at_fraction(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        let (min, max) = (self.min_ms as f64, self.max_ms as f64);
        min + (max - min) * fraction
    }
}
