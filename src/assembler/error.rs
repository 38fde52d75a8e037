//! Request assembly error types.
//!
//! Assembly errors are raised synchronously, before any network activity.

use thiserror::Error;

/// Errors that can occur while turning a request description into a
/// transport-ready request.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The URL could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but does not use HTTP or HTTPS.
    #[error("Unsupported protocol '{0}': only HTTP and HTTPS are supported")]
    UnsupportedScheme(String),

    /// A header name or value is not valid on the wire.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A file form field could not be read.
    #[error("Failed to read form file '{path}': {source}")]
    FormFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The raw body was expected to be JSON but does not parse.
    #[error("Invalid JSON format: {0}")]
    InvalidJsonBody(String),
}
