//! End-to-end pipeline tests against a local mock server.

use super::{environment_with, init_test_env, workspace_for};
use rest_workbench::config::WorkbenchConfig;
use rest_workbench::executor::{ExecutionConfig, ReqwestTransport};
use rest_workbench::history::DEFAULT_MAX_HISTORY_ENTRIES;
use rest_workbench::models::{ApiRequest, FormField, HttpMethod, RequestBody};
use rest_workbench::pipeline::{send_request, Workbench};
use rest_workbench::store::Workspace;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> ReqwestTransport {
    ReqwestTransport::new(&ExecutionConfig::new(5_000)).expect("build transport")
}

#[tokio::test]
async fn test_get_with_environment_and_query() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-trace", "abc")
                .set_body_json(json!({"users": [{"id": 1}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let env = environment_with("local", &[("baseUrl", uri.as_str()), ("token", "secret")]);
    let mut request = ApiRequest::new(HttpMethod::GET, "{{baseUrl}}/api/users")
        .with_header("Authorization", "Bearer {{token}}")
        .with_param("page", "2")
        .with_param("debug", "1");
    request.params[1].enabled = false;

    let response = send_request(&transport(), &request, Some(&env), &ExecutionConfig::new(5_000))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.headers.get("x-trace").map(String::as_str), Some("abc"));
    assert_eq!(response.body, r#"{"users":[{"id":1}]}"#);
    assert_eq!(response.size, response.body.len());
    assert!(response.time >= 0.0);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("page=2"));
}

#[tokio::test]
async fn test_raw_post_sends_body_and_default_user_agent() {
    init_test_env();
    let server = MockServer::start().await;
    let user_agent = format!("rest-workbench/{}", env!("CARGO_PKG_VERSION"));
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("user-agent", user_agent.as_str()))
        .and(body_string(r#"{"name":"secret"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let mut workbench = Workbench::with_reqwest(workspace_for(&server.uri()), &WorkbenchConfig::default())
        .unwrap();
    let request = ApiRequest::new(HttpMethod::POST, "{{baseUrl}}/api/users")
        .with_header("Content-Type", "application/json")
        .with_body(RequestBody::raw(r#"{"name":"{{token}}"}"#));

    let outcome = workbench.send(&request).await.unwrap();
    assert_eq!(outcome.response.status, 201);
    assert_eq!(outcome.response.status_text, "Created");
    assert_eq!(outcome.response.body, "created");

    let history = workbench.workspace().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].request.body.raw.as_deref(), Some(r#"{"name":"{{token}}"}"#));
}

#[tokio::test]
async fn test_form_data_uploads_text_and_file_parts() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "file-contents-123").unwrap();

    let mut skipped = FormField::text("skipped", "nope");
    skipped.enabled = false;
    let request = ApiRequest::new(HttpMethod::POST, format!("{}/upload", server.uri())).with_body(
        RequestBody::form_data(vec![
            FormField::text("title", "hello"),
            FormField::file("attachment", file.path().to_string_lossy()),
            skipped,
        ]),
    );

    let response = send_request(&transport(), &request, None, &ExecutionConfig::new(5_000))
        .await
        .unwrap();
    assert_eq!(response.status, 200);

    let received = server.received_requests().await.unwrap();
    let content_type = received[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("hello"));
    assert!(body.contains("name=\"attachment\""));
    assert!(body.contains("file-contents-123"));
    assert!(!body.contains("skipped"));
}

#[tokio::test]
async fn test_get_never_sends_a_body() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = ApiRequest::new(HttpMethod::GET, server.uri())
        .with_body(RequestBody::raw(r#"{"ignored":true}"#));
    let response = send_request(&transport(), &request, None, &ExecutionConfig::new(5_000))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
    let received = server.received_requests().await.unwrap();
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_yields_sentinel() {
    init_test_env();
    let request = ApiRequest::new(HttpMethod::GET, "http://127.0.0.1:1/");

    let response = send_request(&transport(), &request, None, &ExecutionConfig::new(5_000))
        .await
        .unwrap();

    assert_eq!(response.status, 0);
    assert_eq!(response.status_text, "Error");
    assert!(response.headers.is_empty());
    assert!(response.body.starts_with("Error: "));
    assert_eq!(response.size, 0);
}

#[tokio::test]
async fn test_timeout_yields_sentinel() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1_500)))
        .mount(&server)
        .await;

    let config = WorkbenchConfig {
        timeout: 100,
        ..WorkbenchConfig::default()
    };
    let mut workbench = Workbench::with_reqwest(Workspace::new(), &config).unwrap();
    let outcome = workbench
        .send(&ApiRequest::new(HttpMethod::GET, server.uri()))
        .await
        .unwrap();

    assert!(outcome.response.is_transport_error());
    assert!(outcome.response.body.contains("timed out"));
    assert!(workbench.workspace().history().entries()[0].is_error());
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut workbench = Workbench::with_reqwest(Workspace::new(), &WorkbenchConfig::default()).unwrap();
    let tracker = workbench.tracker();
    let canceller = tokio::spawn(async move {
        for _ in 0..200 {
            if let Ok(id) = tracker.cancel_most_recent() {
                return Some(id);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    });

    let outcome = workbench
        .send(&ApiRequest::new(HttpMethod::GET, server.uri()))
        .await
        .unwrap();

    assert_eq!(canceller.await.unwrap().as_deref(), Some(outcome.request_id.as_str()));
    assert_eq!(outcome.response.status, 0);
    assert_eq!(outcome.response.body, "Error: Request cancelled");
    assert!(outcome.response.time < 5_000.0);
    assert_eq!(workbench.tracker().active_count().unwrap(), 0);
}

#[tokio::test]
async fn test_history_keeps_newest_hundred() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut workbench = Workbench::with_reqwest(workspace_for(&server.uri()), &WorkbenchConfig::default())
        .unwrap();
    for i in 0..=DEFAULT_MAX_HISTORY_ENTRIES {
        let request = ApiRequest::new(HttpMethod::GET, format!("{{{{baseUrl}}}}/items/{}", i));
        workbench.send(&request).await.unwrap();
    }

    let history = workbench.workspace().history();
    assert_eq!(history.len(), DEFAULT_MAX_HISTORY_ENTRIES);
    assert_eq!(history.entries()[0].request.url, "{{baseUrl}}/items/100");
    assert_eq!(history.entries()[99].request.url, "{{baseUrl}}/items/1");
}

#[tokio::test]
async fn test_raw_and_none_bodies_send_no_implicit_content_type() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let raw = ApiRequest::new(HttpMethod::POST, format!("{}/raw", server.uri()))
        .with_body(RequestBody::raw(r#"{"name":"Ann"}"#));
    let none = ApiRequest::new(HttpMethod::POST, format!("{}/none", server.uri()));

    for request in [&raw, &none] {
        let response = send_request(&transport(), request, None, &ExecutionConfig::new(5_000))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].url.path(), "/raw");
    assert_eq!(received[0].body, br#"{"name":"Ann"}"#.to_vec());
    assert!(received[0].headers.get("content-type").is_none());
    assert_eq!(received[1].url.path(), "/none");
    assert!(received[1].body.is_empty());
    assert!(received[1].headers.get("content-type").is_none());
}
