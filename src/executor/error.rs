//! HTTP request execution error types.
//!
//! These never escape [`super::invoke`]: every variant is folded into the
//! status-0 response sentinel. They exist so transports can report failures
//! with enough detail for the sentinel's message.

use thiserror::Error;

/// Errors that can occur while a transport executes a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection failures, DNS resolution errors and other network-level issues.
    #[error("Network error: {0}")]
    Network(String),

    /// The request took longer than the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Certificate validation or handshake failure.
    #[error("TLS/SSL error: {0}")]
    Tls(String),

    /// The server answered with something that is not valid HTTP.
    #[error("HTTP protocol error: {0}")]
    Protocol(String),

    /// The transport could not build the request.
    #[error("Request build error: {0}")]
    Build(String),

    /// The response body could not be read to the end.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The request was cancelled before a response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

/// Convert reqwest errors to RequestError.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::Build(message)
        } else if err.is_body() || err.is_decode() {
            RequestError::Body(message)
        } else if is_tls_failure(&err) {
            RequestError::Tls(message)
        } else if err.is_connect() || err.is_request() {
            RequestError::Network(message)
        } else if err.is_redirect() {
            RequestError::Protocol(message)
        } else {
            RequestError::Network(message)
        }
    }
}

fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source: Option<&dyn std::error::Error> = Some(err);
    while let Some(current) = source {
        let text = current.to_string();
        if text.contains("certificate") || text.contains("TLS") || text.contains("SSL") {
            return true;
        }
        source = current.source();
    }
    false
}
