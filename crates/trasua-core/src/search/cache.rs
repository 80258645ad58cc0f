// ── Bounded suggestion cache ──
//
// Insertion-ordered map from normalized query to results. Entries never
// expire by age; once the bound is reached the oldest inserted key goes.

use indexmap::IndexMap;
use tracing::trace;

use crate::model::PlaceSuggestion;

/// Normalize a raw query into its cache key: trimmed and lowercased.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// FIFO-bounded cache of search results keyed by normalized query.
#[derive(Debug, Clone)]
pub struct SuggestionCache {
    entries: IndexMap<String, Vec<PlaceSuggestion>>,
    capacity: usize,
}

impl SuggestionCache {
    /// Create an empty cache holding at most `capacity` queries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Look up a normalized key. A hit does not refresh the entry's age.
    pub fn get(&self, key: &str) -> Option<&[PlaceSuggestion]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store results under `key`, evicting the oldest entry when full.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: String, suggestions: Vec<PlaceSuggestion>) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = suggestions;
            return;
        }
        while self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                trace!(key = %evicted, "evicted oldest cached query");
            }
        }
        self.entries.insert(key, suggestions);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached keys, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn hit(label: &str) -> PlaceSuggestion {
        PlaceSuggestion {
            id: label.into(),
            name: label.into(),
            label: label.into(),
            region: None,
            address: None,
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_query("  Quận 11 "), "quận 11");
        assert_eq!(normalize_query("HANOI"), "hanoi");
    }

    #[test]
    fn fifty_first_query_evicts_oldest() {
        let mut cache = SuggestionCache::new(50);
        for i in 0..50 {
            cache.insert(format!("q{i}"), vec![hit(&format!("r{i}"))]);
        }
        assert_eq!(cache.len(), 50);
        assert!(cache.contains("q0"));

        cache.insert("q50".into(), vec![]);

        assert_eq!(cache.len(), 50);
        assert!(!cache.contains("q0"));
        assert!(cache.contains("q1"));
        assert!(cache.contains("q50"));
    }

    #[test]
    fn hits_do_not_refresh_age() {
        let mut cache = SuggestionCache::new(2);
        cache.insert("a".into(), vec![hit("a")]);
        cache.insert("b".into(), vec![hit("b")]);

        assert!(cache.get("a").is_some());
        cache.insert("c".into(), vec![]);

        assert!(!cache.contains("a"));
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn replacing_keeps_position() {
        let mut cache = SuggestionCache::new(2);
        cache.insert("a".into(), vec![]);
        cache.insert("b".into(), vec![]);
        cache.insert("a".into(), vec![hit("fresh")]);

        assert_eq!(cache.get("a").map(<[_]>::len), Some(1));
        cache.insert("c".into(), vec![]);
        assert!(!cache.contains("a"));
    }

    #[test]
    fn empty_results_are_cached() {
        let mut cache = SuggestionCache::new(4);
        cache.insert("nowhere".into(), vec![]);
        assert_eq!(cache.get("nowhere"), Some(&[][..]));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = SuggestionCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert("a".into(), vec![]);
        cache.clear();
        assert!(cache.is_empty());
    }
}
