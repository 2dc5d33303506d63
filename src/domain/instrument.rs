use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identity of one instrument in the basket (e.g. "BTCUSDT").
///
/// This is the only key used to filter and group points. Display labels are a
/// UI concern and never take part in matching.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InstrumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The instruments currently meant to be shown.
///
/// Owned by whoever handles user toggles; the engine only ever reads a snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct VisibilitySet(BTreeSet<InstrumentId>);

impl VisibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &InstrumentId) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: InstrumentId) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: &InstrumentId) -> bool {
        self.0.remove(id)
    }

    /// Flip membership. Returns the new membership.
    pub fn toggle(&mut self, id: &InstrumentId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstrumentId> {
        self.0.iter()
    }
}

impl<I: Into<InstrumentId>> FromIterator<I> for VisibilitySet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut set: VisibilitySet = ["A", "B"].into_iter().collect();
        let a = InstrumentId::from("A");

        assert!(!set.toggle(&a));
        assert!(!set.contains(&a));
        assert!(set.toggle(&a));
        assert!(set.contains(&a));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serializes_as_plain_array() {
        let set: VisibilitySet = ["ETHUSDT", "BTCUSDT"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["BTCUSDT","ETHUSDT"]"#);
    }
}
