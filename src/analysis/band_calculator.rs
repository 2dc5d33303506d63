//! Statistical band computation across a basket of instruments.
//!
//! Two modes:
//! - **Snapshot**: every timestamp stands alone. Mean and population standard
//!   deviation of the closes present at that instant.
//! - **Cumulative**: an expanding window of per-timestamp typical prices starting
//!   at a rebase point, giving a VWAP-like running mean with running deviation.

use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use crate::config::ANALYSIS;
use crate::domain::point::dedup_points;
use crate::domain::{BandPoint, OhlcvPoint, StatisticalBandConfig, TimestampRange, VisibilitySet};
use crate::utils::maths_utils::RunningStats;

#[cfg(debug_assertions)]
use crate::config::PRINT_BAND_COMPUTE;

/// Visible points grouped by exact timestamp, ascending.
type TimestampGroups<'a> = BTreeMap<i64, Vec<&'a OhlcvPoint>>;

/// Compute band points for the visible part of the basket.
///
/// `anchor_fraction` and `stable_range` only matter in cumulative mode. The
/// range must be stable across anchor changes (e.g. the range of the whole
/// loaded basket), otherwise moving the anchor would also move the range it
/// is measured against.
pub fn compute_bands(
    points: &[OhlcvPoint],
    visible: &VisibilitySet,
    config: &StatisticalBandConfig,
    anchor_fraction: Option<f64>,
    stable_range: Option<TimestampRange>,
) -> Vec<BandPoint> {
    if points.is_empty() || visible.is_empty() {
        return Vec::new();
    }

    #[cfg(debug_assertions)]
    let start_time = PRINT_BAND_COMPUTE.then(crate::utils::app_time::now);

    let groups = group_visible_by_timestamp(points, visible);
    if groups.is_empty() {
        return Vec::new();
    }

    let bands = if config.use_cumulative_mode {
        let range = stable_range.or_else(|| {
            log::debug!("No stable range supplied; rebasing against the filtered range");
            TimestampRange::of_points(groups.values().flatten().copied())
        });
        let rebase_at = anchor_fraction.zip(range).map(|(f, r)| r.at_fraction(f));
        cumulative_bands(&groups, config, rebase_at)
    } else {
        snapshot_bands(&groups, config)
    };

    #[cfg(debug_assertions)]
    if let Some(start) = start_time {
        log::info!(
            "Bands computed: {} groups -> {} points ({} mode) in {:.2}ms",
            groups.len(),
            bands.len(),
            if config.use_cumulative_mode { "cumulative" } else { "snapshot" },
            crate::utils::app_time::elapsed_ms(start)
        );
    }

    bands
}

fn group_visible_by_timestamp<'a>(
    points: &'a [OhlcvPoint],
    visible: &VisibilitySet,
) -> TimestampGroups<'a> {
    let mut groups: TimestampGroups<'a> = BTreeMap::new();
    let visible_points = points.iter().filter(|p| visible.contains(&p.instrument_id));
    for point in dedup_points(visible_points) {
        groups.entry(point.timestamp_ms).or_default().push(point);
    }
    groups
}

// ============================================================================
// Snapshot mode
// ============================================================================

fn snapshot_point(timestamp_ms: i64, group: &[&OhlcvPoint], config: &StatisticalBandConfig) -> BandPoint {
    // Welford keeps identical closes at exactly zero deviation; a lone member yields 0 too
    let stats: RunningStats = group.iter().map(|p| p.close).collect();
    BandPoint::new(timestamp_ms, stats.mean(), stats.population_std_dev(), config)
}

fn snapshot_bands(groups: &TimestampGroups, config: &StatisticalBandConfig) -> Vec<BandPoint> {
    let entries: Vec<(&i64, &Vec<&OhlcvPoint>)> = groups.iter().collect();

    // Groups are independent of each other, so order is preserved by the collect
    if entries.len() >= ANALYSIS.parallel_snapshot_min_groups {
        entries
            .par_iter()
            .map(|(ts, group)| snapshot_point(**ts, group, config))
            .collect()
    } else {
        entries
            .iter()
            .map(|(ts, group)| snapshot_point(**ts, group, config))
            .collect()
    }
}

// ============================================================================
// Cumulative (rebased) mode
// ============================================================================

fn group_typical_price(group: &[&OhlcvPoint]) -> f64 {
    group.iter().map(|p| p.typical_price()).mean()
}

fn cumulative_bands(
    groups: &TimestampGroups,
    config: &StatisticalBandConfig,
    rebase_at: Option<f64>,
) -> Vec<BandPoint> {
    let mut accumulator = RunningStats::new();

    groups
        .iter()
        .filter(|(ts, _)| rebase_at.is_none_or(|rebase| **ts as f64 >= rebase))
        .map(|(ts, group)| {
            accumulator.push(group_typical_price(group));
            BandPoint::new(
                *ts,
                accumulator.mean(),
                accumulator.population_std_dev(),
                config,
            )
        })
        .collect()
}
