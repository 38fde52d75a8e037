//! Workspace persistence and import/export across storage backends.

use super::init_test_env;
use rest_workbench::models::{ApiRequest, ApiResponse, HttpMethod, RequestBody};
use rest_workbench::store::{FileStorage, MemoryStorage, Slot, Storage, StoreError, Workspace};
use tempfile::TempDir;

fn populated_workspace() -> Workspace {
    let mut workspace = Workspace::new();

    let collection_id = workspace.add_collection("Users API").unwrap().id.clone();
    workspace
        .save_request(
            &collection_id,
            ApiRequest::new(HttpMethod::PUT, "{{baseUrl}}/api/users/1")
                .with_name("Update user")
                .with_header("Content-Type", "application/json")
                .with_body(RequestBody::raw(r#"{"name":"Johnny"}"#)),
        )
        .unwrap();

    let env_id = workspace.add_environment("local").unwrap().id.clone();
    workspace
        .bulk_import_variables(&env_id, "baseUrl=http://localhost:3000\ntoken: abc\n\nnot a pair")
        .unwrap();
    workspace.set_active_environment(Some(&env_id)).unwrap();

    workspace.record(
        ApiRequest::new(HttpMethod::GET, "{{baseUrl}}/api/users"),
        Some(ApiResponse::new(200, "OK")),
    );
    workspace
}

#[test]
fn test_file_storage_round_trip() {
    init_test_env();
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("data"));

    let original = populated_workspace();
    original.save(&storage).unwrap();

    for slot in Slot::ALL {
        assert!(storage.slot_path(slot).exists(), "missing {}", slot);
    }

    let loaded = Workspace::load(&storage, 100).unwrap();
    assert_eq!(loaded.collections(), original.collections());
    assert_eq!(loaded.environments(), original.environments());
    assert_eq!(loaded.history().entries(), original.history().entries());
    assert_eq!(loaded.active_environment_id(), original.active_environment_id());

    let env = loaded.active_environment().unwrap();
    assert_eq!(env.get("baseUrl"), Some("http://localhost:3000"));
    assert_eq!(env.get("token"), Some("abc"));
    assert_eq!(env.len(), 2);
}

#[test]
fn test_empty_directory_loads_empty_workspace() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    let workspace = Workspace::load(&storage, 100).unwrap();
    assert!(workspace.collections().is_empty());
    assert!(workspace.environments().is_empty());
    assert!(workspace.history().is_empty());
    assert!(workspace.active_environment_id().is_none());
}

#[test]
fn test_corrupt_slot_is_reported() {
    let storage = MemoryStorage::new();
    storage.save(Slot::Collections, "{not json").unwrap();

    let err = Workspace::load(&storage, 100).unwrap_err();
    assert!(matches!(err, StoreError::Serialization { .. }));
}

#[test]
fn test_history_limit_reapplied_on_load() {
    let storage = MemoryStorage::new();
    let mut workspace = Workspace::new();
    for i in 0..10 {
        workspace.record(ApiRequest::new(HttpMethod::GET, format!("https://x.test/{}", i)), None);
    }
    workspace.save(&storage).unwrap();

    let loaded = Workspace::load(&storage, 3).unwrap();
    assert_eq!(loaded.history().len(), 3);
    assert_eq!(loaded.history().entries()[0].request.url, "https://x.test/9");
}

#[test]
fn test_collection_export_import_between_workspaces() {
    let source = populated_workspace();
    let collection = &source.collections()[0];
    let exported = source.export_collection(&collection.id).unwrap();
    assert!(exported.contains("\n  \"name\": \"Users API\""));

    let mut target = Workspace::new();
    let imported = target.import_collection(&exported).unwrap();
    assert_ne!(imported.id, collection.id);
    assert_eq!(imported.name, "Users API");
    assert_eq!(imported.requests, collection.requests);

    assert!(matches!(
        target.import_collection(r#"{"name": "No requests"}"#),
        Err(StoreError::InvalidImport(_))
    ));
    assert_eq!(target.collections().len(), 1);
}

#[test]
fn test_environment_export_import_between_workspaces() {
    let source = populated_workspace();
    let env = source.active_environment().unwrap();
    let exported = source.export_environment(&env.id).unwrap();

    let mut target = Workspace::new();
    let imported = target.import_environment(&exported).unwrap();
    assert_ne!(imported.id, env.id);
    assert_eq!(imported.name, "local");
    assert_eq!(imported.get("token"), Some("abc"));

    assert!(target.import_environment(r#"{"variables": []}"#).is_err());
}

#[test]
fn test_imported_requests_without_id_get_fresh_ids() {
    let mut workspace = Workspace::new();
    let imported = workspace
        .import_collection(
            r#"{
                "name": "Hand written",
                "requests": [
                    {"name": "List", "method": "GET", "url": "{{baseUrl}}/api/users"},
                    {"id": "", "name": "Show", "method": "GET", "url": "{{baseUrl}}/api/users/1"},
                    {"id": "keep-me", "name": "Edit", "method": "PUT", "url": "{{baseUrl}}/api/users/1"}
                ]
            }"#,
        )
        .unwrap();

    let requests = &imported.requests;
    assert_eq!(requests.len(), 3);
    assert!(!requests[0].id.is_empty());
    assert!(!requests[1].id.is_empty());
    assert_ne!(requests[0].id, requests[1].id);
    assert_eq!(requests[1].name, "Show");
    assert_eq!(requests[2].id, "keep-me");
}
