//! Request description data models.
//!
//! This module defines the structures that describe a request as the user
//! builds it: method, URL, ordered header and query-parameter rows, and a body
//! descriptor. Rows carry an `enabled` flag so they can be toggled off without
//! being deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
}

impl HttpMethod {
    /// All supported methods, in the order they are offered to users.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::DELETE,
        HttpMethod::PATCH,
        HttpMethod::OPTIONS,
        HttpMethod::HEAD,
    ];

    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Parses a method name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        HttpMethod::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == upper)
            .ok_or_else(|| format!("unsupported HTTP method: {}", s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_enabled() -> bool {
    true
}

/// A single key/value row with an enable toggle.
///
/// Used for both request headers and query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl KeyValue {
    /// Creates an enabled row.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled row.
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }
}

/// Header row.
pub type Header = KeyValue;

/// Query-parameter row.
pub type QueryParam = KeyValue;

/// Kind of a multipart form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    /// The field value is a path to a file whose contents are uploaded.
    File,
}

/// A multipart form field row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl FormField {
    /// Creates an enabled text field.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: FieldKind::Text,
            enabled: true,
        }
    }

    /// Creates an enabled file field; `path` names the file to upload.
    pub fn file(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::File,
            ..Self::text(key, path)
        }
    }
}

/// How the request body is described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyMode {
    #[default]
    None,
    Raw,
    FormData,
}

/// Body descriptor of a request.
///
/// Both payload slots may be populated (the editor keeps what the user typed
/// when switching modes); only the one selected by `mode` is ever sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub mode: BodyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Vec<FormField>>,
}

impl RequestBody {
    /// A body that sends nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// A raw text body.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            mode: BodyMode::Raw,
            raw: Some(text.into()),
            form_data: None,
        }
    }

    /// A multipart form body.
    pub fn form_data(fields: Vec<FormField>) -> Self {
        Self {
            mode: BodyMode::FormData,
            raw: None,
            form_data: Some(fields),
        }
    }
}

/// A request description as built by the user and stored in collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Unique identifier, fixed once created.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Target URL. May contain `{{variable}}` tokens.
    pub url: String,

    pub method: HttpMethod,

    /// Header rows in editor order.
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Query-parameter rows in editor order.
    #[serde(default)]
    pub params: Vec<QueryParam>,

    #[serde(default)]
    pub body: RequestBody,
}

impl ApiRequest {
    /// Default display name of a request that has not been named.
    pub const UNTITLED: &'static str = "Untitled Request";

    /// Creates a new request with a fresh identifier and no headers, params or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: Self::UNTITLED.to_string(),
            url: url.into(),
            method,
            headers: Vec::new(),
            params: Vec::new(),
            body: RequestBody::none(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an enabled header row.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValue::new(key, value));
        self
    }

    /// Appends an enabled query-parameter row.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(KeyValue::new(key, value));
        self
    }

    /// Replaces the body descriptor.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Iterates over enabled header rows.
    pub fn enabled_headers(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter().filter(|h| h.enabled)
    }

    /// Iterates over enabled query-parameter rows.
    pub fn enabled_params(&self) -> impl Iterator<Item = &QueryParam> {
        self.params.iter().filter(|p| p.enabled)
    }
}
