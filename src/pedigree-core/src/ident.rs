use std::collections::BTreeMap;

use crate::individual::IndividualId;

/// Maps an individual's full identifier key (family-id prefix + raw id, trimmed) to its arena
/// index. Grows on demand as new individuals (including synthesised founders) are registered.
#[derive(Debug, Default)]
pub struct IdentTable {
    by_key: BTreeMap<String, IndividualId>,
}

impl IdentTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register a new key. Returns `false` (and does not overwrite) if the key already exists;
    /// the caller is expected to treat that as a duplicate-ID error.
    pub fn insert(&mut self, key: String, id: IndividualId) -> bool {
        if self.by_key.contains_key(&key) {
            return false
        }
        self.by_key.insert(key, id);
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<IndividualId> {
        self.by_key.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.by_key.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.by_key.is_empty() }
}

/// Build the full lookup key for an individual from its optional family-id prefix and raw id.
#[must_use]
pub fn make_key(famid: Option<&str>, id: &str) -> String {
    match famid {
        Some(famid) => format!("{famid}{id}"),
        None => id.to_string(),
    }
}
