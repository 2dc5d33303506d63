//! Load / migrate / persist the statistical band configuration.

use anyhow::{Context, Result};

use crate::config::{PERSISTENCE, namespaced_key};
use crate::data::migration::{Resolution, resolve_text};
use crate::data::store::KeyValueStore;
use crate::domain::StatisticalBandConfig;

pub struct ConfigStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ConfigStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: namespaced_key(PERSISTENCE.band_config_key),
        }
    }

    /// Read, resolve and (when migration changed anything) write back.
    ///
    /// Never fails: an unreadable store or a malformed value degrades to defaults.
    pub fn load(&mut self) -> StatisticalBandConfig {
        let raw = match self.store.get_item(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not read band config ({:#}); using defaults", e);
                None
            }
        };

        let Resolution { config, path } = resolve_text(raw.as_deref());

        if path.needs_persist() {
            log::info!("Band config migrated ({:?}); writing back", path);
            if let Err(e) = self.persist(&config) {
                log::warn!("Could not persist migrated band config: {:#}", e);
            }
        }

        config
    }

    /// Overwrite the stored config with `config` (complete object, no merging here).
    pub fn persist(&mut self, config: &StatisticalBandConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config).context("Failed to serialize band config")?;
        self.store.set_item(&self.key, &json)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::MemoryStore;
    use crate::domain::BandName;

    fn key() -> String {
        namespaced_key(PERSISTENCE.band_config_key)
    }

    #[test]
    fn empty_store_yields_defaults_without_writing() {
        let mut store = ConfigStore::new(MemoryStore::new());
        assert_eq!(store.load(), StatisticalBandConfig::default());
        assert_eq!(store.store().writes(), 0);
    }

    #[test]
    fn legacy_config_is_migrated_and_written_back_once() {
        let legacy = r##"{ "enabled": true, "sigma1": { "color": "#102030" }, "sigma2": {} }"##;
        let mut store = ConfigStore::new(MemoryStore::new().with_item(&key(), legacy));

        let first = store.load();
        assert_eq!(first.levels[&BandName::Band1].sigma_multiplier, 1.0);
        assert_eq!(store.store().writes(), 1);

        // Second load reads the migrated copy and leaves it alone
        let second = store.load();
        assert_eq!(second, first);
        assert_eq!(store.store().writes(), 1);

        let stored = store.store().raw(&key()).unwrap();
        assert!(stored.contains("\"schemaVersion\": 3"));
        assert!(!stored.contains("sigma1"));
    }

    #[test]
    fn persist_overwrites_whole_object() {
        let mut store = ConfigStore::new(MemoryStore::new());
        let mut config = StatisticalBandConfig::default();
        config.use_cumulative_mode = true;
        store.persist(&config).unwrap();
        store.persist(&config).unwrap();

        assert_eq!(store.load(), config);
        assert_eq!(store.store().writes(), 2);
    }

    #[test]
    fn garbage_is_replaced_by_defaults() {
        let mut store = ConfigStore::new(MemoryStore::new().with_item(&key(), "{{{"));
        assert_eq!(store.load(), StatisticalBandConfig::default());
        assert_eq!(store.store().writes(), 1);
    }
}
