//! Ownership map from logical series identity to backend handle.
//!
//! The registry is the only record of what is currently plotted. Nothing else
//! holds handles, so nothing else can leak or double-remove a series.

use std::collections::BTreeMap;

use crate::domain::{SeriesIdentity, StyleState};
use crate::engine::render::{ChartBackend, PaneIndex, SeriesHandle};

#[cfg(debug_assertions)]
use crate::config::PRINT_SERIES_LIFECYCLE;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRegistryEntry {
    pub identity: SeriesIdentity,
    pub handle: SeriesHandle,
    pub style_state: StyleState,
    pub pane: PaneIndex,
}

/// What a factory hands back when the registry asks it for a new series.
pub struct NewSeries {
    pub handle: SeriesHandle,
    pub style_state: StyleState,
    pub pane: PaneIndex,
}

#[derive(Debug, Default)]
pub struct SeriesRegistry {
    entries: BTreeMap<SeriesIdentity, SeriesRegistryEntry>,
}

impl SeriesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `identity`, creating the series through `factory` only if
    /// it is not registered yet.
    pub fn upsert(
        &mut self,
        identity: SeriesIdentity,
        factory: impl FnOnce(&SeriesIdentity) -> NewSeries,
    ) -> SeriesHandle {
        if let Some(entry) = self.entries.get(&identity) {
            return entry.handle;
        }
        let created = factory(&identity);

        #[cfg(debug_assertions)]
        if PRINT_SERIES_LIFECYCLE {
            log::info!(
                "Series created: {} -> {:?} ({:?}, pane {})",
                identity,
                created.handle,
                created.style_state,
                created.pane.0
            );
        }

        self.entries.insert(
            identity.clone(),
            SeriesRegistryEntry {
                identity,
                handle: created.handle,
                style_state: created.style_state,
                pane: created.pane,
            },
        );
        created.handle
    }

    /// Detach the series from the backend and forget it. Backend failures are
    /// logged; the entry is forgotten either way.
    pub fn remove(&mut self, identity: &SeriesIdentity, backend: &mut dyn ChartBackend) -> bool {
        let Some(entry) = self.entries.remove(identity) else {
            return false;
        };
        detach(&entry, backend);
        true
    }

    /// Remove every entry. Only chart-type transitions and pane teardown need this.
    pub fn clear(&mut self, backend: &mut dyn ChartBackend) {
        for entry in std::mem::take(&mut self.entries).into_values() {
            detach(&entry, backend);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &SeriesIdentity> {
        self.entries.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SeriesRegistryEntry> {
        self.entries.values()
    }

    pub fn get(&self, identity: &SeriesIdentity) -> Option<&SeriesRegistryEntry> {
        self.entries.get(identity)
    }

    pub fn handle(&self, identity: &SeriesIdentity) -> Option<SeriesHandle> {
        self.entries.get(identity).map(|e| e.handle)
    }

    pub fn contains(&self, identity: &SeriesIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Record a new style state, returning the previous one.
    pub fn set_style_state(&mut self, identity: &SeriesIdentity, state: StyleState) -> Option<StyleState> {
        self.entries
            .get_mut(identity)
            .map(|entry| std::mem::replace(&mut entry.style_state, state))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn detach(entry: &SeriesRegistryEntry, backend: &mut dyn ChartBackend) {
    if let Err(e) = backend.remove_series(entry.handle) {
        log::warn!("Removing {} failed: {}", entry.identity, e);
    }

    #[cfg(debug_assertions)]
    if PRINT_SERIES_LIFECYCLE {
        log::info!("Series removed: {} ({:?})", entry.identity, entry.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::{SeriesShape, StyleOptions};
    use crate::engine::testing::RecordingBackend;

    fn factory(backend: &mut RecordingBackend) -> impl FnOnce(&SeriesIdentity) -> NewSeries + '_ {
        move |_| NewSeries {
            handle: backend.create_series(SeriesShape::Line, &StyleOptions::default(), PaneIndex::MAIN),
            style_state: StyleState::Visible,
            pane: PaneIndex::MAIN,
        }
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let id = SeriesIdentity::primary("A");

        let first = registry.upsert(id.clone(), factory(&mut backend));
        let second = registry.upsert(id.clone(), |_| panic!("factory must not run twice"));

        assert_eq!(first, second);
        assert_eq!(backend.create_count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_detaches_and_forgets() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let id = SeriesIdentity::primary("A");
        let handle = registry.upsert(id.clone(), factory(&mut backend));

        assert!(registry.remove(&id, &mut backend));
        assert!(!registry.contains(&id));
        assert_eq!(backend.remove_count_for(handle), 1);
        // Second remove is a no-op
        assert!(!registry.remove(&id, &mut backend));
        assert_eq!(backend.remove_count_for(handle), 1);
    }

    #[test]
    fn backend_failure_on_remove_is_swallowed() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let id = SeriesIdentity::primary("A");
        let handle = registry.upsert(id.clone(), factory(&mut backend));

        // Detach behind the registry's back so the backend reports an unknown handle
        backend.remove_series(handle).unwrap();
        assert!(registry.remove(&id, &mut backend));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_removes_every_entry_once() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let handles: Vec<SeriesHandle> = ["A", "B", "C"]
            .into_iter()
            .map(|name| registry.upsert(SeriesIdentity::primary(name), factory(&mut backend)))
            .collect();

        registry.clear(&mut backend);

        assert!(registry.is_empty());
        for handle in handles {
            assert_eq!(backend.remove_count_for(handle), 1);
        }
    }

    #[test]
    fn style_state_is_tracked() {
        let mut backend = RecordingBackend::new();
        let mut registry = SeriesRegistry::new();
        let id = SeriesIdentity::primary("A");
        registry.upsert(id.clone(), factory(&mut backend));

        let previous = registry.set_style_state(&id, StyleState::Transparent);
        assert_eq!(previous, Some(StyleState::Visible));
        assert_eq!(registry.get(&id).map(|e| e.style_state), Some(StyleState::Transparent));
        assert_eq!(registry.set_style_state(&SeriesIdentity::primary("Z"), StyleState::Visible), None);
    }
}
