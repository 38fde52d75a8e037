//! Data models for request history.

use crate::models::{ApiRequest, ApiResponse};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the request history.
///
/// Pairs the request as the user built it (before variable substitution)
/// with the normalized response. `response` is `None` only when the request
/// never reached the transport, e.g. because assembly failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier, a UUID v4.
    pub id: String,

    /// Milliseconds since the Unix epoch, UTC.
    pub timestamp: i64,

    pub request: ApiRequest,

    #[serde(default)]
    pub response: Option<ApiResponse>,
}

impl HistoryEntry {
    /// Creates an entry stamped with a fresh id and the current time.
    pub fn new(request: ApiRequest, response: Option<ApiResponse>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            request,
            response,
        }
    }

    /// The timestamp as a UTC date-time.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Status code of the response, `None` when no response was recorded.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Whether the request failed: no response, a transport error, or a 4xx/5xx.
    pub fn is_error(&self) -> bool {
        match &self.response {
            None => true,
            Some(response) => response.status == 0 || response.status >= 400,
        }
    }
}
