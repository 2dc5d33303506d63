//! Schema migration for the persisted band configuration.
//!
//! Stored configs carry a `schemaVersion`. Configs written before the tag
//! existed are classified by their shape instead:
//!
//! | version | shape                                                    |
//! |---------|----------------------------------------------------------|
//! | 1       | flat `sigma1`/`sigma2`/`sigma2_5`/`sigma3` keys           |
//! | 2       | canonical band names, but `sigmaMultiplier` or           |
//! |         | `useCumulativeMode` missing                              |
//! | 3       | current                                                  |
//!
//! Every path ends in the same deep merge over the canonical defaults, so a
//! field that is absent is defaulted while a field that is present (even
//! `false` or `0`) is kept.

use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use crate::config::bands::{BAND_DEFAULTS, CURRENT_SCHEMA_VERSION};
use crate::domain::{BandName, LineStyle, StatisticalBandConfig};

#[cfg(debug_assertions)]
use crate::config::PRINT_CONFIG_MIGRATION;

/// Accepted spellings of the legacy flat keys, in band1..band4 order.
const LEGACY_KEYS: [&[&str]; 4] = [
    &["sigma1", "sigma_1", "1sigma"],
    &["sigma2", "sigma_2", "2sigma"],
    &["sigma2_5", "sigma25", "sigma2.5", "sigma_2_5", "2.5sigma"],
    &["sigma3", "sigma_3", "3sigma"],
];

/// Which route a persisted value took to become a resolved config.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MigrationPath {
    /// Nothing stored yet
    Missing,
    /// Stored value was not a JSON object (or not JSON at all)
    Malformed,
    LegacyFlat,
    Intermediate,
    Current,
}

impl MigrationPath {
    /// Whether the resolved config differs from what is stored and should be written back.
    pub fn needs_persist(self) -> bool {
        matches!(
            self,
            MigrationPath::Malformed | MigrationPath::LegacyFlat | MigrationPath::Intermediate
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub config: StatisticalBandConfig,
    pub path: MigrationPath,
}

/// Resolve raw persisted text. Never fails.
pub fn resolve_text(raw: Option<&str>) -> Resolution {
    let Some(raw) = raw else {
        return Resolution {
            config: StatisticalBandConfig::default(),
            path: MigrationPath::Missing,
        };
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => resolve(&value),
        Err(e) => {
            log::debug!("Stored band config is not valid JSON ({}); using defaults", e);
            Resolution {
                config: StatisticalBandConfig::default(),
                path: MigrationPath::Malformed,
            }
        }
    }
}

/// Resolve an already-parsed persisted value. Never fails.
pub fn resolve(persisted: &Value) -> Resolution {
    let Some(object) = persisted.as_object() else {
        log::debug!("Stored band config is not an object; using defaults");
        return Resolution {
            config: StatisticalBandConfig::default(),
            path: MigrationPath::Malformed,
        };
    };

    let path = classify(object);

    #[cfg(debug_assertions)]
    if PRINT_CONFIG_MIGRATION && path != MigrationPath::Current {
        log::info!("Band config migration path: {:?}", path);
    }

    let config = match path {
        MigrationPath::LegacyFlat => merge_over_defaults(&Value::Object(upgrade_legacy(object))),
        _ => merge_over_defaults(persisted),
    };

    Resolution { config, path }
}

fn classify(object: &Map<String, Value>) -> MigrationPath {
    match object.get("schemaVersion").and_then(Value::as_u64) {
        Some(1) => return MigrationPath::LegacyFlat,
        Some(2) => return MigrationPath::Intermediate,
        Some(v) if v >= CURRENT_SCHEMA_VERSION as u64 => return MigrationPath::Current,
        _ => {}
    }

    // Untagged: sniff the shape
    if has_legacy_keys(object) {
        return MigrationPath::LegacyFlat;
    }

    let levels = object.get("levels").and_then(Value::as_object);
    let band_missing_sigma = BandName::iter().any(|name| {
        levels
            .and_then(|levels| levels.get(&name.to_string()))
            .and_then(Value::as_object)
            .is_none_or(|level| !level.contains_key("sigmaMultiplier"))
    });

    if band_missing_sigma || !object.contains_key("useCumulativeMode") {
        MigrationPath::Intermediate
    } else {
        MigrationPath::Current
    }
}

fn find_legacy_level<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    let nested = object.get("levels").and_then(Value::as_object);
    aliases.iter().find_map(|alias| {
        object
            .get(*alias)
            .or_else(|| nested.and_then(|levels| levels.get(*alias)))
    })
}

fn has_legacy_keys(object: &Map<String, Value>) -> bool {
    LEGACY_KEYS
        .iter()
        .any(|aliases| find_legacy_level(object, aliases).is_some())
}

/// Rewrite a flat legacy object into the current shape (before default merging).
fn upgrade_legacy(object: &Map<String, Value>) -> Map<String, Value> {
    let mut upgraded = Map::new();

    // Carry over top-level flags only when they are actually present
    for key in ["enabled", "showFilledAreas"] {
        if let Some(value) = object.get(key) {
            upgraded.insert(key.to_string(), value.clone());
        }
    }
    upgraded.insert("useCumulativeMode".to_string(), Value::Bool(false));

    let mut levels = Map::new();

    // Legacy configs had no explicit mean level; keep one if somebody added it by hand
    let mean = object
        .get("levels")
        .and_then(|levels| levels.get(BandName::Mean.to_string()))
        .filter(|level| level.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    levels.insert(BandName::Mean.to_string(), mean);

    for (index, aliases) in LEGACY_KEYS.iter().enumerate() {
        let Some(legacy) = find_legacy_level(object, aliases) else {
            continue;
        };
        let Some(name) = BandName::from_offset_index(index) else {
            continue;
        };

        let mut level = match legacy {
            Value::Object(fields) => fields.clone(),
            // `"sigma2": false` style toggles
            Value::Bool(enabled) => {
                let mut fields = Map::new();
                fields.insert("enabled".to_string(), Value::Bool(*enabled));
                fields
            }
            _ => Map::new(),
        };
        // Positional correspondence decides the multiplier, not whatever the legacy value held
        level.insert(
            "sigmaMultiplier".to_string(),
            serde_json::json!(BAND_DEFAULTS.legacy_sigmas[index]),
        );
        levels.insert(name.to_string(), Value::Object(level));
    }

    // Canonical levels stored alongside the legacy keys win over the positional upgrade
    let canonical = object.get("levels").and_then(Value::as_object);
    for name in BandName::offsets() {
        let key = name.to_string();
        let Some(fields) = canonical.and_then(|c| c.get(&key)).and_then(Value::as_object) else {
            continue;
        };
        let slot = levels.entry(key).or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(level) = slot {
            for (field, value) in fields {
                level.insert(field.clone(), value.clone());
            }
        }
    }

    upgraded.insert("levels".to_string(), Value::Object(levels));
    upgraded
}

// ============================================================================
// Deep merge
// ============================================================================

/// Same JSON kind (numbers with numbers, strings with strings, ...).
fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}

/// Overlay `overlay` onto `base`. Keys unknown to `base` are ignored, and a leaf
/// whose kind does not match the default's is ignored too (the default stays).
fn merge_json(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                if let Some(slot) = base_map.get_mut(key) {
                    merge_json(slot, overlay_value);
                }
            }
        }
        (slot, value) if same_kind(slot, value) => *slot = value.clone(),
        _ => {}
    }
}

/// Replace unknown `lineStyle` spellings with the level's default style.
fn repair_line_styles(merged: &mut Value) {
    let Some(levels) = merged.get_mut("levels").and_then(Value::as_object_mut) else {
        return;
    };
    for name in BandName::iter() {
        let Some(style) = levels
            .get_mut(&name.to_string())
            .and_then(|level| level.get_mut("lineStyle"))
        else {
            continue;
        };
        let known = style
            .as_str()
            .is_some_and(|text| LineStyle::iter().any(|s| s.to_string() == text));
        if !known {
            *style = Value::String(BAND_DEFAULTS.levels[name.index()].line_style.to_string());
        }
    }
}

fn merge_over_defaults(overlay: &Value) -> StatisticalBandConfig {
    let defaults = StatisticalBandConfig::default();
    let mut merged = match serde_json::to_value(&defaults) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to serialize default band config: {}", e);
            return defaults;
        }
    };
    merge_json(&mut merged, overlay);
    repair_line_styles(&mut merged);
    if let Some(object) = merged.as_object_mut() {
        object.insert(
            "schemaVersion".to_string(),
            serde_json::json!(CURRENT_SCHEMA_VERSION),
        );
    }

    match serde_json::from_value::<StatisticalBandConfig>(merged) {
        Ok(config) => config.normalized(),
        Err(e) => {
            log::debug!("Merged band config did not deserialize ({}); using defaults", e);
            defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve_json(value: Value) -> Resolution {
        resolve(&value)
    }

    #[test]
    fn legacy_sigma_keys_map_positionally() {
        let resolution = resolve_json(json!({
            "enabled": true,
            "sigma1": { "enabled": true, "color": "#112233" },
            "sigma2": { "enabled": false }
        }));

        assert_eq!(resolution.path, MigrationPath::LegacyFlat);
        let config = resolution.config;
        let band1 = &config.levels[&BandName::Band1];
        assert_eq!(band1.sigma_multiplier, 1.0);
        assert_eq!(band1.color, "#112233");
        assert!(!config.levels[&BandName::Band2].enabled);
        assert_eq!(config.levels[&BandName::Band2].sigma_multiplier, 2.0);
        assert_eq!(config.levels[&BandName::Band4].color, BAND_DEFAULTS.levels[4].color);
        assert!(config.levels.contains_key(&BandName::Mean));
        assert!(!config.use_cumulative_mode);
        assert!(resolution.path.needs_persist());
    }

    #[test]
    fn legacy_keys_nested_under_levels_and_odd_spellings() {
        let config = resolve_json(json!({
            "levels": { "sigma2.5": true, "sigma3": { "lineWeight": 4.0 } }
        }))
        .config;
        assert_eq!(config.levels[&BandName::Band3].sigma_multiplier, 2.5);
        assert!(config.levels[&BandName::Band3].enabled);
        assert_eq!(config.levels[&BandName::Band4].line_weight, 4.0);
    }

    #[test]
    fn canonical_levels_next_to_legacy_keys_are_kept() {
        let resolution = resolve_json(json!({
            "sigma1": { "color": "#111111" },
            "levels": {
                "band1": { "opacity": 0.25 },
                "band2": { "color": "#222222", "sigmaMultiplier": 1.8 }
            }
        }));

        assert_eq!(resolution.path, MigrationPath::LegacyFlat);
        let config = resolution.config;
        let band1 = &config.levels[&BandName::Band1];
        assert_eq!(band1.color, "#111111");
        assert_eq!(band1.opacity, 0.25);
        assert_eq!(band1.sigma_multiplier, 1.0);
        let band2 = &config.levels[&BandName::Band2];
        assert_eq!(band2.color, "#222222");
        assert_eq!(band2.sigma_multiplier, 1.8);
    }

    #[test]
    fn intermediate_schema_keeps_present_fields() {
        let resolution = resolve_json(json!({
            "enabled": false,
            "showFilledAreas": true,
            "levels": {
                "mean": { "color": "#abcdef" },
                "band1": { "opacity": 0.0, "enabled": false }
            }
        }));

        assert_eq!(resolution.path, MigrationPath::Intermediate);
        let config = resolution.config;
        // Explicit false / 0 survive: presence, not truthiness, decides
        assert!(!config.enabled);
        assert!(config.show_filled_areas);
        assert_eq!(config.levels[&BandName::Band1].opacity, 0.0);
        assert!(!config.levels[&BandName::Band1].enabled);
        assert_eq!(config.levels[&BandName::Band1].sigma_multiplier, 1.0);
        assert_eq!(config.levels[&BandName::Mean].color, "#abcdef");
        assert_eq!(config.levels.len(), 5);
    }

    #[test]
    fn current_schema_needs_no_persist() {
        let stored = serde_json::to_value(StatisticalBandConfig::default()).unwrap();
        let resolution = resolve(&stored);
        assert_eq!(resolution.path, MigrationPath::Current);
        assert!(!resolution.path.needs_persist());
        assert_eq!(resolution.config, StatisticalBandConfig::default());
    }

    #[test]
    fn migration_is_idempotent() {
        let inputs = [
            json!({ "sigma1": {}, "sigma2": {} }),
            json!({ "levels": { "band2": { "color": "#010203", "lineStyle": "dashdot" } } }),
            json!({ "useCumulativeMode": true, "levels": {} }),
        ];
        for input in inputs {
            let once = resolve(&input).config;
            let stored = serde_json::to_value(&once).unwrap();
            let twice = resolve(&stored);
            assert_eq!(twice.config, once);
            assert_eq!(twice.path, MigrationPath::Current);
            assert_eq!(serde_json::to_value(&twice.config).unwrap(), stored);
        }
    }

    #[test]
    fn malformed_inputs_fall_back_to_defaults() {
        assert_eq!(resolve_text(Some("not json")).path, MigrationPath::Malformed);
        assert_eq!(resolve_text(Some("[1,2,3]")).path, MigrationPath::Malformed);
        assert_eq!(resolve_text(None).path, MigrationPath::Missing);
        assert!(!MigrationPath::Missing.needs_persist());

        let resolution = resolve_text(Some("42"));
        assert_eq!(resolution.config, StatisticalBandConfig::default());
    }

    #[test]
    fn wrong_types_and_unknown_keys_are_ignored() {
        let config = resolve_json(json!({
            "schemaVersion": 3,
            "enabled": "yes",
            "useCumulativeMode": true,
            "showFilledAreas": false,
            "bogus": 1,
            "levels": {
                "band9": { "enabled": true },
                "band1": { "sigmaMultiplier": "wide", "lineStyle": "zigzag", "opacity": 7 }
            }
        }))
        .config;

        assert!(config.enabled);
        assert!(config.use_cumulative_mode);
        assert_eq!(config.levels.len(), 5);
        let band1 = &config.levels[&BandName::Band1];
        assert_eq!(band1.sigma_multiplier, 1.0);
        assert_eq!(band1.line_style, LineStyle::Dashed);
        assert_eq!(band1.opacity, 1.0);
    }

    #[test]
    fn schema_version_tag_wins_over_sniffing() {
        // Tagged as current even though a legacy-looking key is present
        let resolution = resolve_json(json!({ "schemaVersion": 3, "sigma1": {} }));
        assert_eq!(resolution.path, MigrationPath::Current);

        let resolution = resolve_json(json!({ "schemaVersion": 1, "sigma3": { "color": "#000000" } }));
        assert_eq!(resolution.path, MigrationPath::LegacyFlat);
        assert_eq!(resolution.config.levels[&BandName::Band4].color, "#000000");
    }
}
