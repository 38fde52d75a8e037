//! Transport abstraction and the default reqwest-backed implementation.

use super::config::ExecutionConfig;
use super::error::RequestError;
use crate::assembler::{AssembledBody, AssembledRequest, PartContent};
use crate::models::HttpMethod;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use std::collections::HashMap;

/// Response as received from the wire, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    /// Lower-case header names; repeated headers joined with `", "`.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

/// Something that can put an assembled request on the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &AssembledRequest,
        config: &ExecutionConfig,
    ) -> Result<RawResponse, RequestError>;
}

/// Transport over a shared `reqwest::Client`.
///
/// Redirect and TLS policy are fixed when the client is built; the timeout and
/// default headers are read from the config passed to each send.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ExecutionConfig) -> Result<Self, RequestError> {
        let redirect = if config.follow_redirects {
            Policy::limited(config.max_redirects as usize)
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(!config.validate_ssl)
            .build()
            .map_err(|e| RequestError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &AssembledRequest,
        config: &ExecutionConfig,
    ) -> Result<RawResponse, RequestError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.target.clone())
            .timeout(config.timeout_duration());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (name, value) in &config.default_headers {
            let already_set = request
                .headers
                .keys()
                .any(|key| key.eq_ignore_ascii_case(name));
            if !already_set {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        builder = match &request.body {
            AssembledBody::None => builder,
            AssembledBody::Raw(text) => builder.body(text.clone()),
            AssembledBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        log::debug!("Dispatching {} {}", request.method, request.target);
        let response = builder.send().await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        HttpMethod::HEAD => reqwest::Method::HEAD,
    }
}

fn build_form(parts: &[crate::assembler::FormPart]) -> Result<Form, RequestError> {
    let mut form = Form::new();
    for part in parts {
        form = match &part.content {
            PartContent::Text(text) => form.text(part.name.clone(), text.clone()),
            PartContent::File { file_name, bytes } => {
                let file_part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str("application/octet-stream")
                    .map_err(|e| RequestError::Build(e.to_string()))?;
                form.part(part.name.clone(), file_part)
            }
        };
    }
    Ok(form)
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut collected = HashMap::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        collected.insert(name.as_str().to_string(), joined);
    }
    collected
}
