//! Request assembly
//!
//! Turns a substituted [`ApiRequest`] into an [`AssembledRequest`]: the final
//! URL with enabled query parameters, the enabled header map and the body for
//! the selected mode. Everything here is synchronous and performs no network
//! activity; malformed input is rejected with an [`AssembleError`] before the
//! transport is ever reached.

pub mod body;
pub mod error;
pub mod headers;
pub mod url;

pub use body::{build_body, AssembledBody, FormPart, PartContent};
pub use error::AssembleError;
pub use headers::prepare_headers;
pub use self::url::{build_url, resolve_target};

use crate::formatter::validate_json;
use crate::models::{ApiRequest, BodyMode, HttpMethod};
use std::collections::HashMap;

/// A request ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRequest {
    pub method: HttpMethod,
    /// URL as built from the request, for display and history.
    pub url: String,
    /// Absolute URL the transport dials.
    pub target: ::url::Url,
    pub headers: HashMap<String, String>,
    pub body: AssembledBody,
}

/// Assembles a request whose variables have already been substituted.
///
/// # Examples
///
/// ```
/// use rest_workbench::assembler::{assemble_request, AssembledBody};
/// use rest_workbench::models::{ApiRequest, HttpMethod, RequestBody};
///
/// let request = ApiRequest::new(HttpMethod::GET, "https://x.test/y")
///     .with_param("a", "1")
///     .with_body(RequestBody::raw("ignored for GET"));
///
/// let assembled = assemble_request(&request).unwrap();
/// assert_eq!(assembled.url, "https://x.test/y?a=1");
/// assert_eq!(assembled.body, AssembledBody::None);
/// ```
pub fn assemble_request(request: &ApiRequest) -> Result<AssembledRequest, AssembleError> {
    let url = build_url(&request.url, &request.params)?;
    let target = resolve_target(&url)?;
    let headers = prepare_headers(&request.headers)?;
    let body = build_body(request.method, &request.body)?;

    log::debug!(
        "Assembled {} {} ({} headers, {} body bytes)",
        request.method,
        url,
        headers.len(),
        body.len()
    );

    Ok(AssembledRequest {
        method: request.method,
        url,
        target,
        headers,
        body,
    })
}

/// Checks that a non-empty raw body parses as JSON.
///
/// Requests in other body modes, and raw bodies that are blank, always pass.
pub fn validate_raw_json(request: &ApiRequest) -> Result<(), AssembleError> {
    if request.body.mode != BodyMode::Raw {
        return Ok(());
    }

    let Some(raw) = request.body.raw.as_deref() else {
        return Ok(());
    };
    if raw.trim().is_empty() {
        return Ok(());
    }

    validate_json(raw).map_err(|e| AssembleError::InvalidJsonBody(e.to_string()))
}
