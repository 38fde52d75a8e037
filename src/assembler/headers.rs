//! Header map preparation.

use super::error::AssembleError;
use crate::models::Header;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashMap;

/// Collects enabled headers into a map.
///
/// Later rows win over earlier rows with the same key. Rows with a blank key
/// are skipped. Names and values must be valid on the wire.
pub fn prepare_headers(headers: &[Header]) -> Result<HashMap<String, String>, AssembleError> {
    let mut prepared = HashMap::new();

    for header in headers.iter().filter(|h| h.enabled) {
        let name = header.key.trim();
        if name.is_empty() {
            continue;
        }

        validate_header(name, &header.value)?;
        prepared.insert(name.to_string(), header.value.clone());
    }

    Ok(prepared)
}

fn validate_header(name: &str, value: &str) -> Result<(), AssembleError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| AssembleError::InvalidHeader {
        name: name.to_string(),
        reason: "invalid HTTP header name".to_string(),
    })?;

    HeaderValue::from_str(value).map_err(|_| AssembleError::InvalidHeader {
        name: name.to_string(),
        reason: "value contains characters not allowed in a header".to_string(),
    })?;

    Ok(())
}
