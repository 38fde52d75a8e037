//! Error responses for the demo backend.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A rejected body field, rendered as `{"msg": .., "path": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub path: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Resource type '{0}' not found")]
    UnknownResource(String),

    /// `label` is the resource as it appears in the message (`users`, `User`).
    #[error("{label} with id {id} not found")]
    RecordNotFound { label: String, id: String },

    #[error("request body failed validation ({} error(s))", .0.len())]
    Validation(Vec<FieldError>),
}

impl DemoError {
    pub fn status(&self) -> StatusCode {
        match self {
            DemoError::UnknownResource(_) | DemoError::RecordNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            DemoError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for DemoError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            DemoError::Validation(errors) => json!({ "errors": errors }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
