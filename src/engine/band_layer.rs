//! Band overlay on the main pane: mean line, upper/lower line per band and an
//! optional filled area per band.
//!
//! Band series share the primary registry. They are created lazily the first
//! time bands are enabled, get their data replaced wholesale on every recompute,
//! and are only ever restyled afterwards. A disabled band is transparent, not gone.

use eframe::egui::Color32;

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{BandName, BandPoint, BandSign, SeriesIdentity, StatisticalBandConfig, StyleState};
use crate::engine::registry::{NewSeries, SeriesRegistry};
use crate::engine::render::{self, ChartBackend, PaneIndex, SeriesData, SeriesShape, StyleOptions};

/// Every band series identity, in drawing order (fills first so lines sit on top).
pub fn band_identities() -> impl Iterator<Item = SeriesIdentity> {
    let fills = BandName::offsets().map(|name| SeriesIdentity::band(name, BandSign::Fill));
    let mean = std::iter::once(SeriesIdentity::band(BandName::Mean, BandSign::Center));
    let lines = BandName::offsets().flat_map(|name| {
        [
            SeriesIdentity::band(name, BandSign::Upper),
            SeriesIdentity::band(name, BandSign::Lower),
        ]
    });
    fills.chain(mean).chain(lines)
}

fn parts(identity: &SeriesIdentity) -> Option<(BandName, BandSign)> {
    match identity {
        SeriesIdentity::Band { name, sign } => Some((*name, *sign)),
        _ => None,
    }
}

fn shape_for(sign: BandSign) -> SeriesShape {
    match sign {
        BandSign::Fill => SeriesShape::Range,
        _ => SeriesShape::Line,
    }
}

fn is_rendered(config: &StatisticalBandConfig, name: BandName, sign: BandSign) -> bool {
    let level = config.is_level_rendered(name);
    match sign {
        BandSign::Fill => level && config.show_filled_areas,
        _ => level,
    }
}

fn style_for(config: &StatisticalBandConfig, name: BandName, sign: BandSign) -> (StyleState, StyleOptions) {
    if !is_rendered(config, name, sign) {
        let hidden = StyleOptions {
            color: Some(Color32::TRANSPARENT),
            fill_color: Some(Color32::TRANSPARENT),
            line_width: Some(0.0),
            ..Default::default()
        };
        return (StyleState::Transparent, hidden);
    }

    let level = config.level(name);
    let color = level.color32();
    let title = SeriesIdentity::band(name, sign).to_string();
    let style = match sign {
        BandSign::Fill => StyleOptions {
            color: Some(Color32::TRANSPARENT),
            fill_color: Some(color.gamma_multiply(PLOT_CONFIG.band_fill_opacity_pct)),
            line_width: Some(0.0),
            title: Some(title),
            ..Default::default()
        },
        _ => StyleOptions {
            color: Some(color),
            line_width: Some(level.line_weight as f32),
            line_style: Some(level.line_style),
            title: Some(title),
            ..Default::default()
        },
    };
    (StyleState::Visible, style)
}

fn data_for(bands: &[BandPoint], name: BandName, sign: BandSign) -> SeriesData {
    let x = |b: &BandPoint| b.timestamp_ms as f64;
    match sign {
        BandSign::Center => SeriesData::Line(bands.iter().map(|b| [x(b), b.mean]).collect()),
        BandSign::Upper | BandSign::Lower => SeriesData::Line(
            bands
                .iter()
                .filter_map(|b| {
                    let offset = b.offset(name)?;
                    let y = if sign == BandSign::Upper { offset.upper } else { offset.lower };
                    Some([x(b), y])
                })
                .collect(),
        ),
        BandSign::Fill => SeriesData::Range(
            bands
                .iter()
                .filter_map(|b| b.offset(name).map(|o| [x(b), o.lower, o.upper]))
                .collect(),
        ),
    }
}

/// Push fresh band values. Creates missing band series only while bands are
/// enabled; existing ones keep their style.
pub fn sync_band_data(
    registry: &mut SeriesRegistry,
    backend: &mut dyn ChartBackend,
    bands: &[BandPoint],
    config: &StatisticalBandConfig,
) {
    for identity in band_identities() {
        let Some((name, sign)) = parts(&identity) else {
            continue;
        };

        let handle = if registry.contains(&identity) {
            registry.handle(&identity)
        } else if config.enabled {
            Some(registry.upsert(identity, |_| {
                let (style_state, style) = style_for(config, name, sign);
                NewSeries {
                    handle: backend.create_series(shape_for(sign), &style, PaneIndex::MAIN),
                    style_state,
                    pane: PaneIndex::MAIN,
                }
            }))
        } else {
            None
        };

        if let Some(handle) = handle {
            render::replace_data(backend, handle, data_for(bands, name, sign));
        }
    }
}

/// Re-apply styling to every existing band series after a config change.
pub fn apply_band_styles(
    registry: &mut SeriesRegistry,
    backend: &mut dyn ChartBackend,
    config: &StatisticalBandConfig,
) {
    for identity in band_identities() {
        let (Some((name, sign)), Some(handle)) = (parts(&identity), registry.handle(&identity)) else {
            continue;
        };
        let (state, style) = style_for(config, name, sign);
        render::restyle(backend, handle, &style);
        registry.set_style_state(&identity, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::RecordingBackend;
    use strum::IntoEnumIterator;

    fn bands(config: &StatisticalBandConfig) -> Vec<BandPoint> {
        vec![
            BandPoint::new(1, 11.0, 1.0, config),
            BandPoint::new(2, 12.0, 2.0, config),
        ]
    }

    #[test]
    fn identities_cover_mean_lines_and_fills() {
        let all: Vec<SeriesIdentity> = band_identities().collect();
        // mean + 4 bands x (upper, lower, fill)
        assert_eq!(all.len(), 13);
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 13);
        assert!(BandName::iter().all(|name| all.iter().any(|id| parts(id).map(|p| p.0) == Some(name))));
    }

    #[test]
    fn nothing_is_created_while_bands_are_disabled() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let config = StatisticalBandConfig {
            enabled: false,
            ..Default::default()
        };

        sync_band_data(&mut registry, &mut backend, &bands(&config), &config);

        assert!(registry.is_empty());
        assert_eq!(backend.create_count(), 0);
    }

    #[test]
    fn recompute_replaces_data_without_recreating() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let config = StatisticalBandConfig::default();

        sync_band_data(&mut registry, &mut backend, &bands(&config), &config);
        let created = backend.create_count();
        assert_eq!(created, 13);

        sync_band_data(&mut registry, &mut backend, &bands(&config), &config);
        assert_eq!(backend.create_count(), created);
        assert_eq!(backend.set_data_count(), 26);
        assert_eq!(backend.apply_options_count(), 0);
    }

    #[test]
    fn disabling_a_level_restyles_instead_of_removing() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let mut config = StatisticalBandConfig::default();
        sync_band_data(&mut registry, &mut backend, &bands(&config), &config);

        if let Some(level) = config.levels.get_mut(&BandName::Band1) {
            level.enabled = false;
        }
        apply_band_styles(&mut registry, &mut backend, &config);

        let upper = SeriesIdentity::band(BandName::Band1, BandSign::Upper);
        assert_eq!(backend.remove_count(), 0);
        assert_eq!(registry.get(&upper).map(|e| e.style_state), Some(StyleState::Transparent));
        let mean = SeriesIdentity::band(BandName::Mean, BandSign::Center);
        assert_eq!(registry.get(&mean).map(|e| e.style_state), Some(StyleState::Visible));
    }

    #[test]
    fn fills_follow_show_filled_areas() {
        let mut config = StatisticalBandConfig::default();
        config.show_filled_areas = false;
        assert_eq!(style_for(&config, BandName::Band1, BandSign::Fill).0, StyleState::Transparent);
        config.show_filled_areas = true;
        assert_eq!(style_for(&config, BandName::Band1, BandSign::Fill).0, StyleState::Visible);
        // band3 is disabled by default, so its fill stays hidden
        assert_eq!(style_for(&config, BandName::Band3, BandSign::Fill).0, StyleState::Transparent);
    }

    #[test]
    fn fill_data_spans_lower_to_upper() {
        let config = StatisticalBandConfig::default();
        match data_for(&bands(&config), BandName::Band2, BandSign::Fill) {
            SeriesData::Range(rows) => assert_eq!(rows[0], [1.0, 9.0, 13.0]),
            other => panic!("unexpected data {other:?}"),
        }
    }
}
