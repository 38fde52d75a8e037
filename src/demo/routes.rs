//! HTTP handlers for the demo backend.

use super::error::{DemoError, FieldError};
use super::store::ResourceStore;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Loose `local@domain.tld` shape check.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile email regex")
});

/// Decimal number text: optional sign, optional fraction, no whitespace.
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").expect("Failed to compile numeric regex")
});

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct DemoState {
    pub store: ResourceStore,
    /// Artificial delay before a generic update responds.
    pub latency: Duration,
}

impl DemoState {
    pub fn new(store: ResourceStore, latency: Duration) -> Self {
        Self { store, latency }
    }
}

impl Default for DemoState {
    fn default() -> Self {
        Self::new(ResourceStore::with_fixtures(), Duration::ZERO)
    }
}

/// Builds the `/api` router.
///
/// The user and product routes are matched before the generic
/// `/api/:resource/:id` route.
pub fn router(state: DemoState) -> Router {
    Router::new()
        .route("/api/users/:id", get(get_user).put(update_user))
        .route("/api/products/:id", get(get_product).put(update_product))
        .route("/api/:resource", get(list_records))
        .route("/api/:resource/:id", get(get_record).put(update_record))
        .with_state(state)
}

async fn list_records(
    State(state): State<DemoState>,
    Path(resource): Path<String>,
) -> Result<Json<Value>, DemoError> {
    let records = state
        .store
        .list(&resource)
        .ok_or_else(|| DemoError::UnknownResource(resource.clone()))?;
    Ok(Json(json!({ "data": records })))
}

async fn get_record(
    State(state): State<DemoState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, DemoError> {
    if !state.store.has_resource(&resource) {
        return Err(DemoError::UnknownResource(resource));
    }
    fetch(&state.store, &resource, &resource, &id)
}

async fn get_user(
    State(state): State<DemoState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DemoError> {
    fetch(&state.store, "users", "User", &id)
}

async fn get_product(
    State(state): State<DemoState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DemoError> {
    fetch(&state.store, "products", "Product", &id)
}

fn fetch(store: &ResourceStore, resource: &str, label: &str, id: &str) -> Result<Json<Value>, DemoError> {
    let record = parse_id(id)
        .and_then(|numeric| store.get(resource, numeric))
        .ok_or_else(|| not_found(label, id))?;
    Ok(Json(json!({ "data": record })))
}

async fn update_record(
    State(state): State<DemoState>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DemoError> {
    let changes = require_object(&body)?;
    if let Some(body_id) = changes.get("id") {
        if !is_numeric(body_id) {
            return Err(DemoError::Validation(vec![FieldError::new(
                "id",
                "ID must be a number if provided",
            )]));
        }
    }

    if !state.store.has_resource(&resource) {
        return Err(DemoError::UnknownResource(resource));
    }
    let numeric = parse_id(&id)
        .filter(|numeric| state.store.get(&resource, *numeric).is_some())
        .ok_or_else(|| not_found(&resource, &id))?;

    let data = state
        .store
        .update(&resource, numeric, changes)
        .ok_or_else(|| not_found(&resource, &id))?;
    log::info!("Updated {} {}", resource, numeric);

    // The change is visible before the response goes out
    if !state.latency.is_zero() {
        tokio::time::sleep(state.latency).await;
    }

    Ok(Json(json!({
        "message": format!("{} updated successfully", resource),
        "data": data,
    })))
}

async fn update_user(
    State(state): State<DemoState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DemoError> {
    let changes = require_object(&body)?;
    check_fields(validate_user(changes))?;
    apply_update(&state.store, "users", "User", &id, changes)
}

async fn update_product(
    State(state): State<DemoState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DemoError> {
    let changes = require_object(&body)?;
    check_fields(validate_product(changes))?;
    apply_update(&state.store, "products", "Product", &id, changes)
}

fn apply_update(
    store: &ResourceStore,
    resource: &str,
    label: &str,
    id: &str,
    changes: &Map<String, Value>,
) -> Result<Json<Value>, DemoError> {
    let numeric = parse_id(id).ok_or_else(|| not_found(label, id))?;
    let data = store
        .update(resource, numeric, changes)
        .ok_or_else(|| not_found(label, id))?;
    log::info!("Updated {} {}", resource, numeric);

    Ok(Json(json!({
        "message": format!("{} updated successfully", label),
        "data": data,
    })))
}

fn validate_user(changes: &Map<String, Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(name) = changes.get("name") {
        if !name.is_string() {
            errors.push(FieldError::new("name", "Name must be a string"));
        }
    }
    if let Some(email) = changes.get("email") {
        if !email.as_str().is_some_and(|e| EMAIL_REGEX.is_match(e)) {
            errors.push(FieldError::new("email", "Invalid email format"));
        }
    }
    if let Some(role) = changes.get("role") {
        if !matches!(role.as_str(), Some("user") | Some("admin")) {
            errors.push(FieldError::new(
                "role",
                r#"Role must be either "user" or "admin""#,
            ));
        }
    }
    errors
}

fn validate_product(changes: &Map<String, Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(name) = changes.get("name") {
        if !name.is_string() {
            errors.push(FieldError::new("name", "Name must be a string"));
        }
    }
    if let Some(price) = changes.get("price") {
        if !is_numeric(price) {
            errors.push(FieldError::new("price", "Price must be a number"));
        }
    }
    if let Some(in_stock) = changes.get("inStock") {
        if !in_stock.is_boolean() {
            errors.push(FieldError::new("inStock", "inStock must be a boolean"));
        }
    }
    errors
}

fn check_fields(errors: Vec<FieldError>) -> Result<(), DemoError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DemoError::Validation(errors))
    }
}

fn require_object(body: &Value) -> Result<&Map<String, Value>, DemoError> {
    body.as_object().ok_or_else(|| {
        DemoError::Validation(vec![FieldError::new(
            "",
            "Request body must be a JSON object",
        )])
    })
}

/// JSON numbers, and strings holding a plain decimal number, count as numeric.
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => NUMERIC_REGEX.is_match(s),
        _ => false,
    }
}

fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

fn not_found(label: &str, id: &str) -> DemoError {
    DemoError::RecordNotFound {
        label: label.to_string(),
        id: id.to_string(),
    }
}
