//! TTL-based in-memory cache of fetched search pages.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::SearchMode;
use crate::record::RawRow;

/// Identifies one search against the timetable.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SearchKey {
    pub semester: String,
    pub mode: SearchMode,
    pub term: String,
}

impl SearchKey {
    /// Builds a key; the term is trimmed and lowercased so trivially
    /// different inputs share an entry.
    pub fn new(semester: &str, mode: SearchMode, term: &str) -> Self {
        Self {
            semester: semester.to_string(),
            mode,
            term: term.trim().to_lowercase(),
        }
    }
}

impl std::fmt::Display for SearchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{:?}", self.semester, self.mode.form_value(), self.term)
    }
}

/// A cached search result with metadata.
#[derive(Clone)]
struct CachedRows {
    rows: Vec<RawRow>,
    fetched_at: String,
    cached_at: Instant,
}

/// Thread-safe cache of raw result rows.
///
/// Uses DashMap for concurrent access without external locking.
pub struct SearchCache {
    entries: DashMap<SearchKey, CachedRows>,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Gets cached rows and their fetch timestamp if the entry hasn't expired.
    pub fn get(&self, key: &SearchKey) -> Option<(Vec<RawRow>, String)> {
        self.entries.get(key).and_then(|entry| {
            if entry.cached_at.elapsed() < self.ttl {
                Some((entry.rows.clone(), entry.fetched_at.clone()))
            } else {
                // Entry expired, remove it
                drop(entry);
                self.entries.remove(key);
                None
            }
        })
    }

    /// Stores rows for `key`, sweeping out every expired entry first.
    pub fn insert(&self, key: SearchKey, rows: Vec<RawRow>, fetched_at: String) {
        self.cleanup_expired();
        self.entries.insert(
            key,
            CachedRows {
                rows,
                fetched_at,
                cached_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &SearchKey) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries.
    pub fn cleanup_expired(&self) {
        self.entries
            .retain(|_, entry| entry.cached_at.elapsed() < self.ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RawRow> {
        vec![vec!["header".to_string()], vec!["row".to_string()]]
    }

    #[test]
    fn test_key_normalizes_term() {
        let a = SearchKey::new("2022-2023-2", SearchMode::CourseName, "  Algebra ");
        let b = SearchKey::new("2022-2023-2", SearchMode::CourseName, "algebra");
        let c = SearchKey::new("2022-2023-2", SearchMode::Teacher, "algebra");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_get_and_invalidate() {
        let cache = SearchCache::new(Duration::from_secs(60));
        let key = SearchKey::new("s", SearchMode::CourseName, "alg");
        assert!(cache.get(&key).is_none());

        cache.insert(key.clone(), rows(), "2024-01-01T00:00:00Z".to_string());
        let (cached, fetched_at) = cache.get(&key).unwrap();
        assert_eq!(cached, rows());
        assert_eq!(fetched_at, "2024-01-01T00:00:00Z");

        cache.invalidate(&key);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = SearchCache::new(Duration::ZERO);
        let key = SearchKey::new("s", SearchMode::CourseName, "alg");
        cache.insert(key.clone(), rows(), String::new());
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0);

        cache.insert(key, rows(), String::new());
        cache.cleanup_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_sweeps_expired_entries_for_other_terms() {
        let cache = SearchCache::new(Duration::ZERO);
        for i in 0..1000 {
            let key = SearchKey::new("s", SearchMode::CourseName, &format!("term {i}"));
            cache.insert(key, rows(), String::new());
        }
        // Only the entry inserted last survives the sweep
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_keeps_live_entries() {
        let cache = SearchCache::new(Duration::from_secs(60));
        for term in ["alg", "anal", "logika"] {
            let key = SearchKey::new("s", SearchMode::CourseName, term);
            cache.insert(key, rows(), String::new());
        }
        assert_eq!(cache.len(), 3);
    }
}
