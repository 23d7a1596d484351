use std::collections::HashSet;

use crate::names::to_canonical;

/// Countries confirmed by the crawl so far. Birth places are only
/// asserted when they resolve to a member.
#[derive(Debug, Default)]
pub struct CountryRegistry {
    ids: HashSet<String>,
}

impl CountryRegistry {
    /// Registers the canonical form of `name`; returns it unless blank.
    pub fn register(&mut self, name: &str) -> Option<String> {
        let id = to_canonical(name);
        if id.is_empty() {
            return None;
        }
        self.ids.insert(id.clone());
        Some(id)
    }

    /// Canonical id of `candidate` when it names a known country.
    pub fn resolve(&self, candidate: &str) -> Option<String> {
        let id = to_canonical(candidate);
        self.ids.contains(&id).then_some(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
