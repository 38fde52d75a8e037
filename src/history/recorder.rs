//! Bounded, most-recent-first history log.

use super::models::HistoryEntry;
use crate::models::{ApiRequest, ApiResponse};
use serde::{Deserialize, Serialize};

/// Default number of entries kept.
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 100;

/// Request history, newest entry first.
///
/// Appending beyond `max_entries` evicts the oldest entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_ENTRIES)
    }
}

impl HistoryLog {
    /// Creates an empty log. A cap of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Rebuilds a log from persisted entries, newest first, re-applying the cap.
    pub fn from_entries(mut entries: Vec<HistoryEntry>, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        entries.truncate(max_entries);
        Self {
            entries,
            max_entries,
        }
    }

    /// Records a request/response pair and returns the new entry.
    pub fn record(&mut self, request: ApiRequest, response: Option<ApiResponse>) -> &HistoryEntry {
        self.push_entry(HistoryEntry::new(request, response))
    }

    /// Prepends an existing entry.
    pub fn push_entry(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_entries);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
