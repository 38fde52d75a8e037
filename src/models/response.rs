//! Normalized response record.
//!
//! Every request cycle produces exactly one `ApiResponse`, whether the server
//! answered or the transport failed. Transport failures are represented by the
//! status-0 sentinel built with [`ApiResponse::transport_error`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status text of the transport-failure sentinel.
pub const ERROR_STATUS_TEXT: &str = "Error";

/// Uniform response record handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// HTTP status code, or `0` when no response was received.
    pub status: u16,

    /// Reason phrase (e.g. "OK"), or `"Error"` for the sentinel.
    pub status_text: String,

    /// Response headers keyed by lower-case name.
    pub headers: HashMap<String, String>,

    /// Response body decoded as text.
    pub body: String,

    /// Elapsed wall-clock time in milliseconds, from dispatch to full body receipt.
    pub time: f64,

    /// Body size in bytes.
    pub size: usize,
}

impl ApiResponse {
    /// Creates a response with the given status and no headers or body.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: HashMap::new(),
            body: String::new(),
            time: 0.0,
            size: 0,
        }
    }

    /// Builds the sentinel record for a request that never got a response.
    ///
    /// The body carries a human-readable message prefixed with `Error: `.
    pub fn transport_error(message: impl AsRef<str>, time: f64) -> Self {
        Self {
            status: 0,
            status_text: ERROR_STATUS_TEXT.to_string(),
            headers: HashMap::new(),
            body: format!("Error: {}", message.as_ref()),
            time,
            size: 0,
        }
    }

    /// Sets the body and updates `size` to its byte length.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.size = self.body.len();
    }

    /// `true` when this record is the transport-failure sentinel.
    pub fn is_transport_error(&self) -> bool {
        self.status == 0
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `true` for 4xx statuses.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// `true` for 5xx statuses.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Gets the Content-Type header value if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }
}
