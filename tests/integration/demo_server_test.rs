//! Demo backend routes, driven in-process and over a real socket.

use super::{init_test_env, workspace_for};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rest_workbench::config::WorkbenchConfig;
use rest_workbench::demo::{self, router, DemoState, ResourceStore};
use rest_workbench::models::{ApiRequest, HttpMethod, RequestBody};
use rest_workbench::pipeline::Workbench;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

async fn call(state: DemoState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_update_user() {
    let state = DemoState::default();
    let (status, body) = call(
        state.clone(),
        "PUT",
        "/api/users/1",
        Some(json!({"name": "Johnny", "role": "admin", "id": 42})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Johnny");
    assert_eq!(body["data"]["email"], "john@example.com");
    assert_eq!(state.store.get("users", 1).unwrap()["role"], "admin");
}

#[tokio::test]
async fn test_update_user_validation() {
    let (status, body) = call(
        DemoState::default(),
        "PUT",
        "/api/users/1",
        Some(json!({"email": "not-an-email", "role": "root"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["msg"], "Invalid email format");
    assert_eq!(errors[1]["path"], "role");
}

#[tokio::test]
async fn test_update_missing_user_and_bad_id() {
    let (status, body) = call(DemoState::default(), "PUT", "/api/users/9", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User with id 9 not found");

    let (status, body) = call(DemoState::default(), "PUT", "/api/users/abc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User with id abc not found");
}

#[tokio::test]
async fn test_update_product() {
    let (status, body) = call(
        DemoState::default(),
        "PUT",
        "/api/products/2",
        Some(json!({"inStock": true, "price": 450})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["name"], "Smartphone");
    assert_eq!(body["data"]["inStock"], true);

    let (status, body) = call(
        DemoState::default(),
        "PUT",
        "/api/products/1",
        Some(json!({"price": "cheap"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Price must be a number");
}

#[tokio::test]
async fn test_generic_resource_update() {
    let store = ResourceStore::with_fixtures();
    store.insert_resource("orders", vec![json!({"id": 1, "total": 5, "status": "open"})]);
    let state = DemoState::new(store, Duration::from_millis(10));

    let (status, body) = call(
        state.clone(),
        "PUT",
        "/api/orders/1",
        Some(json!({"total": 10, "id": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "orders updated successfully");
    assert_eq!(body["data"], json!({"id": 1, "total": 10, "status": "open"}));

    let (status, body) = call(state.clone(), "PUT", "/api/orders/7", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "orders with id 7 not found");

    let (status, body) = call(state.clone(), "PUT", "/api/orders/1", Some(json!({"id": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "ID must be a number if provided");

    let (status, body) = call(state, "PUT", "/api/orders/1", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Request body must be a JSON object");
}

#[tokio::test]
async fn test_unknown_resource() {
    let (status, body) = call(DemoState::default(), "PUT", "/api/widgets/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource type 'widgets' not found");

    let (status, _) = call(DemoState::default(), "GET", "/api/widgets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_read_routes() {
    let (status, body) = call(DemoState::default(), "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = call(DemoState::default(), "GET", "/api/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Laptop");

    let (status, body) = call(DemoState::default(), "GET", "/api/users/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User with id 3 not found");
}

#[tokio::test]
async fn test_workbench_against_running_demo_server() {
    init_test_env();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(demo::serve(listener, DemoState::default(), async move {
        let _ = stopped.await;
    }));

    let mut workbench = Workbench::with_reqwest(
        workspace_for(&format!("http://{}", addr)),
        &WorkbenchConfig::default(),
    )
    .unwrap();
    let request = ApiRequest::new(HttpMethod::PUT, "{{baseUrl}}/api/users/2")
        .with_header("Content-Type", "application/json")
        .with_body(RequestBody::raw(r#"{"name": "Jane Doe"}"#));

    let outcome = workbench.send(&request).await.unwrap();
    assert_eq!(outcome.response.status, 200);
    assert_eq!(
        outcome.response.content_type(),
        Some("application/json")
    );
    let body: Value = serde_json::from_str(&outcome.response.body).unwrap();
    assert_eq!(body["data"]["name"], "Jane Doe");
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(workbench.workspace().history().len(), 1);

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_generic_update_is_applied_before_delayed_response() {
    let store = ResourceStore::with_fixtures();
    store.insert_resource("orders", vec![json!({"id": 1, "total": 5})]);
    let state = DemoState::new(store, Duration::from_millis(500));

    let pending = tokio::spawn(call(
        state.clone(),
        "PUT",
        "/api/orders/1",
        Some(json!({"total": 8})),
    ));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!pending.is_finished());
    assert_eq!(state.store.get("orders", 1).unwrap()["total"], 8);

    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 8);
}

#[tokio::test]
async fn test_product_price_accepts_numeric_string() {
    let state = DemoState::default();
    let (status, body) = call(
        state.clone(),
        "PUT",
        "/api/products/1",
        Some(json!({"price": "899.99"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], "899.99");
    assert_eq!(state.store.get("products", 1).unwrap()["price"], "899.99");
}
