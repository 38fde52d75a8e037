//! Search functionality for request history.
//!
//! Plain linear scans over the entries; history is small and bounded.

use super::models::HistoryEntry;
use crate::models::{BodyMode, HttpMethod};

/// Searches history entries using case-insensitive substring matching.
///
/// Searches across:
/// - URL
/// - HTTP method
/// - Request name
/// - Raw request body
/// - Response body
///
/// An empty query returns every entry. Results keep their original order.
pub fn search_history<'a>(query: &str, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
    if query.is_empty() {
        return entries.iter().collect();
    }

    let query_lower = query.to_lowercase();

    entries
        .iter()
        .filter(|entry| matches_query(entry, &query_lower))
        .collect()
}

fn matches_query(entry: &HistoryEntry, query_lower: &str) -> bool {
    let request = &entry.request;

    if request.url.to_lowercase().contains(query_lower)
        || request.method.as_str().to_lowercase().contains(query_lower)
        || request.name.to_lowercase().contains(query_lower)
    {
        return true;
    }

    if request.body.mode == BodyMode::Raw {
        if let Some(raw) = &request.body.raw {
            if raw.to_lowercase().contains(query_lower) {
                return true;
            }
        }
    }

    entry
        .response
        .as_ref()
        .map_or(false, |r| r.body.to_lowercase().contains(query_lower))
}

/// Filters history entries by HTTP method.
pub fn filter_by_method(method: HttpMethod, entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    entries
        .iter()
        .filter(|entry| entry.request.method == method)
        .collect()
}

/// Filters history entries by response status code.
///
/// Entries without a response never match.
pub fn filter_by_status(status: u16, entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    entries
        .iter()
        .filter(|entry| entry.status() == Some(status))
        .collect()
}

/// Entries that failed: no response, transport errors, and 4xx/5xx responses.
pub fn filter_errors(entries: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    entries.iter().filter(|entry| entry.is_error()).collect()
}
