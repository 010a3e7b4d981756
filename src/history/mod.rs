//! Bounded per-session search history
//!
//! Newest first, capped at [`DEFAULT_CAPACITY`] entries unless configured
//! otherwise. Nothing is persisted.

use crate::config::HistorySettings;
use crate::search::SearchMode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 10;

/// One past search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHistoryEntry {
    pub query: String,
    pub mode: SearchMode,
    pub captured_at: DateTime<Utc>,
}

impl SearchHistoryEntry {
    pub fn new(query: impl Into<String>, mode: SearchMode) -> Self {
        Self::at(query, mode, Utc::now())
    }

    pub fn at(query: impl Into<String>, mode: SearchMode, captured_at: DateTime<Utc>) -> Self {
        Self {
            query: query.into(),
            mode,
            captured_at,
        }
    }
}

/// Most-recent-first list of past searches
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<SearchHistoryEntry>,
    capacity: usize,
    dedupe_consecutive: bool,
    incognito: bool,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::with_settings(&HistorySettings::default())
    }

    pub fn with_settings(settings: &HistorySettings) -> Self {
        let capacity = settings.capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            dedupe_consecutive: settings.dedupe_consecutive,
            incognito: false,
        }
    }

    /// Add an entry at the front, evicting the oldest past the capacity.
    /// Returns false when nothing was recorded (incognito).
    pub fn record(&mut self, entry: SearchHistoryEntry) -> bool {
        if self.incognito {
            return false;
        }

        if self.dedupe_consecutive {
            if let Some(newest) = self.entries.front_mut() {
                if newest.query == entry.query && newest.mode == entry.mode {
                    newest.captured_at = entry.captured_at;
                    return true;
                }
            }
        }

        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        true
    }

    /// Remove every entry, regardless of the incognito flag
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first
    pub fn list(&self) -> Vec<SearchHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn set_incognito(&mut self, incognito: bool) {
        self.incognito = incognito;
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_bounded_newest_first() {
        let mut history = SearchHistory::new();
        for n in 0..25 {
            assert!(history.record(SearchHistoryEntry::new(format!("q{n}"), SearchMode::Web)));
            assert_eq!(history.len(), (n + 1).min(DEFAULT_CAPACITY));
            assert_eq!(history.list()[0].query, format!("q{n}"));
        }
        let list = history.list();
        assert_eq!(list.last().unwrap().query, "q15");
    }

    #[test]
    fn test_repeats_are_kept_by_default() {
        let mut history = SearchHistory::new();
        history.record(SearchHistoryEntry::new("rust", SearchMode::Web));
        history.record(SearchHistoryEntry::new("rust", SearchMode::Web));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_dedupe_consecutive() {
        let mut history = SearchHistory::with_settings(&HistorySettings {
            capacity: 10,
            dedupe_consecutive: true,
        });
        let first = Utc::now();
        let later = first + Duration::seconds(30);

        history.record(SearchHistoryEntry::at("rust", SearchMode::Web, first));
        history.record(SearchHistoryEntry::at("rust", SearchMode::Web, later));
        assert_eq!(history.len(), 1);
        assert_eq!(history.list()[0].captured_at, later);

        history.record(SearchHistoryEntry::at("rust", SearchMode::Images, later));
        history.record(SearchHistoryEntry::at("go", SearchMode::Images, later));
        history.record(SearchHistoryEntry::at("rust", SearchMode::Images, later));
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_incognito_suppresses_record() {
        let mut history = SearchHistory::new();
        history.record(SearchHistoryEntry::new("cats", SearchMode::Web));
        let before = history.list();

        history.set_incognito(true);
        assert!(!history.record(SearchHistoryEntry::new("dogs", SearchMode::Web)));
        assert_eq!(history.list(), before);

        history.clear();
        assert!(history.is_empty());

        history.set_incognito(false);
        assert!(history.record(SearchHistoryEntry::new("dogs", SearchMode::Web)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let history = SearchHistory::with_settings(&HistorySettings {
            capacity: 0,
            dedupe_consecutive: false,
        });
        assert_eq!(history.capacity(), 1);
    }
}
