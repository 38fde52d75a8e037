//! The workspace: collections, environments, history and the active environment.

use super::storage::{Slot, Storage, StorageError};
use crate::environment::{self, Environment, EnvironmentVariable, DEFAULT_CATEGORY};
use crate::history::{HistoryEntry, HistoryLog};
use crate::models::{ApiRequest, ApiResponse, Collection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to (de)serialize {slot}: {source}")]
    Serialization {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("invalid import: {0}")]
    InvalidImport(String),
}

impl StoreError {
    fn not_found(kind: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Everything the user has saved, held explicitly and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    collections: Vec<Collection>,
    environments: Vec<Environment>,
    history: HistoryLog,
    active_environment_id: Option<String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty workspace whose history keeps at most `limit` entries.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: HistoryLog::new(limit),
            ..Self::default()
        }
    }

    /// Reads every slot from `storage`. Missing slots load as empty.
    pub fn load(storage: &dyn Storage, history_limit: usize) -> Result<Self, StoreError> {
        let collections: Vec<Collection> = load_slot(storage, Slot::Collections)?.unwrap_or_default();
        let environments: Vec<Environment> =
            load_slot(storage, Slot::Environments)?.unwrap_or_default();
        let entries: Vec<HistoryEntry> = load_slot(storage, Slot::History)?.unwrap_or_default();
        let active_environment_id: Option<String> =
            load_slot::<Option<String>>(storage, Slot::ActiveEnvironmentId)?.flatten();

        // Drop a dangling active id rather than failing the whole load
        let active_environment_id = active_environment_id
            .filter(|id| environments.iter().any(|e| &e.id == id));

        log::debug!(
            "Loaded workspace: {} collections, {} environments, {} history entries",
            collections.len(),
            environments.len(),
            entries.len()
        );

        Ok(Self {
            collections,
            environments,
            history: HistoryLog::from_entries(entries, history_limit),
            active_environment_id,
        })
    }

    /// Writes every slot to `storage`.
    pub fn save(&self, storage: &dyn Storage) -> Result<(), StoreError> {
        save_slot(storage, Slot::Collections, &self.collections)?;
        save_slot(storage, Slot::Environments, &self.environments)?;
        save_slot(storage, Slot::History, self.history.entries())?;
        save_slot(storage, Slot::ActiveEnvironmentId, &self.active_environment_id)?;
        Ok(())
    }

    // Collections

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// First collection with exactly this name.
    pub fn collection_by_name(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn add_collection(&mut self, name: &str) -> Result<&Collection, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName("collection name"));
        }

        self.collections.push(Collection::new(name));
        Ok(self.last_collection())
    }

    /// Replaces the collection with the same id.
    pub fn update_collection(&mut self, collection: Collection) -> Result<(), StoreError> {
        let existing = self
            .collections
            .iter_mut()
            .find(|c| c.id == collection.id)
            .ok_or_else(|| StoreError::not_found("collection", &collection.id))?;
        *existing = collection;
        Ok(())
    }

    pub fn delete_collection(&mut self, id: &str) -> Result<Collection, StoreError> {
        let pos = self
            .collections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("collection", id))?;
        Ok(self.collections.remove(pos))
    }

    /// Inserts or replaces (by request id) a request in a collection.
    pub fn save_request(&mut self, collection_id: &str, request: ApiRequest) -> Result<(), StoreError> {
        self.collection_mut(collection_id)?.upsert_request(request);
        Ok(())
    }

    pub fn delete_request(
        &mut self,
        collection_id: &str,
        request_id: &str,
    ) -> Result<ApiRequest, StoreError> {
        self.collection_mut(collection_id)?
            .remove_request(request_id)
            .ok_or_else(|| StoreError::not_found("request", request_id))
    }

    pub fn search_collections(&self, query: &str) -> Vec<&Collection> {
        if query.is_empty() {
            return self.collections.iter().collect();
        }
        self.collections.iter().filter(|c| c.matches(query)).collect()
    }

    /// Pretty-printed JSON of a collection.
    pub fn export_collection(&self, id: &str) -> Result<String, StoreError> {
        let collection = self
            .collection(id)
            .ok_or_else(|| StoreError::not_found("collection", id))?;
        to_pretty_json("collection", collection)
    }

    /// Imports an exported collection under a fresh id.
    ///
    /// The document needs a non-empty `name` and a `requests` array. Requests
    /// without an id get a fresh one.
    pub fn import_collection(&mut self, json: &str) -> Result<&Collection, StoreError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidImport(e.to_string()))?;

        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty());
        let requests = value.get("requests").filter(|r| r.is_array());
        let (Some(name), Some(requests)) = (name, requests) else {
            return Err(StoreError::InvalidImport(
                "Invalid collection format".to_string(),
            ));
        };

        let mut requests = requests.clone();
        if let Value::Array(items) = &mut requests {
            items.iter_mut().for_each(assign_missing_request_id);
        }
        let requests: Vec<ApiRequest> = serde_json::from_value(requests)
            .map_err(|e| StoreError::InvalidImport(e.to_string()))?;

        let mut collection = Collection::new(name);
        collection.requests = requests;
        self.collections.push(collection);
        Ok(self.last_collection())
    }

    fn collection_mut(&mut self, id: &str) -> Result<&mut Collection, StoreError> {
        self.collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("collection", id))
    }

    fn last_collection(&self) -> &Collection {
        &self.collections[self.collections.len() - 1]
    }

    // Environments

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    pub fn environment_by_name(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    pub fn add_environment(&mut self, name: &str) -> Result<&Environment, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName("environment name"));
        }

        Ok(self.push_environment(Environment::new(name)))
    }

    pub fn update_environment(&mut self, environment: Environment) -> Result<(), StoreError> {
        let existing = self
            .environments
            .iter_mut()
            .find(|e| e.id == environment.id)
            .ok_or_else(|| StoreError::not_found("environment", &environment.id))?;
        *existing = environment;
        Ok(())
    }

    /// Deletes an environment, clearing the active id if it pointed at it.
    pub fn delete_environment(&mut self, id: &str) -> Result<Environment, StoreError> {
        let pos = self
            .environments
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::not_found("environment", id))?;

        if self.active_environment_id.as_deref() == Some(id) {
            self.active_environment_id = None;
        }
        Ok(self.environments.remove(pos))
    }

    /// Selects the active environment; `None` clears the selection.
    pub fn set_active_environment(&mut self, id: Option<&str>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if self.environment(id).is_none() {
                return Err(StoreError::not_found("environment", id));
            }
        }
        self.active_environment_id = id.map(str::to_string);
        Ok(())
    }

    pub fn active_environment_id(&self) -> Option<&str> {
        self.active_environment_id.as_deref()
    }

    pub fn active_environment(&self) -> Option<&Environment> {
        self.active_environment_id
            .as_deref()
            .and_then(|id| self.environment(id))
    }

    pub fn duplicate_environment(&mut self, id: &str) -> Result<&Environment, StoreError> {
        let copy = self
            .environment(id)
            .map(environment::duplicate_environment)
            .ok_or_else(|| StoreError::not_found("environment", id))?;
        Ok(self.push_environment(copy))
    }

    /// Adds an enabled variable with a fresh id.
    pub fn add_variable(
        &mut self,
        env_id: &str,
        key: &str,
        value: &str,
        category: Option<&str>,
    ) -> Result<&EnvironmentVariable, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::EmptyName("variable key"));
        }

        let env = self.environment_mut(env_id)?;
        env.variables.push(
            EnvironmentVariable::new(key, value)
                .with_category(category.unwrap_or(DEFAULT_CATEGORY)),
        );
        let last = env.variables.len() - 1;
        Ok(&env.variables[last])
    }

    /// Appends variables parsed from `KEY=VALUE` / `KEY: VALUE` lines.
    ///
    /// Returns the number of variables added.
    pub fn bulk_import_variables(&mut self, env_id: &str, text: &str) -> Result<usize, StoreError> {
        let parsed = environment::parse_bulk_variables(text);
        let count = parsed.len();
        self.environment_mut(env_id)?.variables.extend(parsed);
        Ok(count)
    }

    pub fn export_environment(&self, id: &str) -> Result<String, StoreError> {
        let env = self
            .environment(id)
            .ok_or_else(|| StoreError::not_found("environment", id))?;
        to_pretty_json("environment", env)
    }

    pub fn import_environment(&mut self, json: &str) -> Result<&Environment, StoreError> {
        let env = environment::parse_environment_import(json).map_err(StoreError::InvalidImport)?;
        Ok(self.push_environment(env))
    }

    /// Variables of an environment in `category`, or all of them for `"all"`.
    pub fn filter_variables(
        &self,
        env_id: &str,
        category: &str,
    ) -> Result<Vec<&EnvironmentVariable>, StoreError> {
        self.environment(env_id)
            .map(|env| env.variables_in_category(category))
            .ok_or_else(|| StoreError::not_found("environment", env_id))
    }

    fn environment_mut(&mut self, id: &str) -> Result<&mut Environment, StoreError> {
        self.environments
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::not_found("environment", id))
    }

    fn push_environment(&mut self, env: Environment) -> &Environment {
        self.environments.push(env);
        &self.environments[self.environments.len() - 1]
    }

    // History

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn record(&mut self, request: ApiRequest, response: Option<ApiResponse>) -> &HistoryEntry {
        self.history.record(request, response)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn remove_history_entry(&mut self, id: &str) -> Result<HistoryEntry, StoreError> {
        self.history
            .remove(id)
            .ok_or_else(|| StoreError::not_found("history entry", id))
    }
}

fn load_slot<T: DeserializeOwned>(storage: &dyn Storage, slot: Slot) -> Result<Option<T>, StoreError> {
    match storage.load(slot)? {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                slot: slot.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

fn save_slot<T: serde::Serialize + ?Sized>(
    storage: &dyn Storage,
    slot: Slot,
    value: &T,
) -> Result<(), StoreError> {
    let text = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        slot: slot.to_string(),
        source,
    })?;
    storage.save(slot, &text)?;
    Ok(())
}

fn assign_missing_request_id(request: &mut Value) {
    let Value::Object(fields) = request else {
        return;
    };
    let missing = fields
        .get("id")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty);
    if missing {
        fields.insert(
            "id".to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
    }
}

fn to_pretty_json<T: serde::Serialize>(kind: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialization {
        slot: kind.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use crate::store::MemoryStorage;

    fn workspace_with_env() -> (Workspace, String) {
        let mut ws = Workspace::new();
        let id = ws.add_environment("dev").unwrap().id.clone();
        ws.add_variable(&id, "host", "localhost", None).unwrap();
        (ws, id)
    }

    #[test]
    fn test_add_collection_rejects_blank_name() {
        let mut ws = Workspace::new();
        assert!(matches!(
            ws.add_collection("   "),
            Err(StoreError::EmptyName(_))
        ));
        let collection = ws.add_collection("Users API").unwrap();
        assert_eq!(collection.name, "Users API");
        assert!(collection.requests.is_empty());
    }

    #[test]
    fn test_save_request_upserts() {
        let mut ws = Workspace::new();
        let cid = ws.add_collection("c").unwrap().id.clone();

        let mut request = ApiRequest::new(HttpMethod::GET, "https://x.test/a");
        ws.save_request(&cid, request.clone()).unwrap();
        request.url = "https://x.test/b".to_string();
        ws.save_request(&cid, request.clone()).unwrap();
        ws.save_request(&cid, ApiRequest::new(HttpMethod::POST, "https://x.test/c"))
            .unwrap();

        let collection = ws.collection(&cid).unwrap();
        assert_eq!(collection.requests.len(), 2);
        assert_eq!(collection.requests[0].id, request.id);
        assert_eq!(collection.requests[0].url, "https://x.test/b");

        ws.delete_request(&cid, &request.id).unwrap();
        assert_eq!(ws.collection(&cid).unwrap().requests.len(), 1);
        assert!(matches!(
            ws.delete_request(&cid, &request.id),
            Err(StoreError::NotFound { kind: "request", .. })
        ));
    }

    #[test]
    fn test_update_and_delete_collection() {
        let mut ws = Workspace::new();
        let mut collection = ws.add_collection("old").unwrap().clone();
        collection.name = "new".to_string();
        ws.update_collection(collection.clone()).unwrap();
        assert_eq!(ws.collection(&collection.id).unwrap().name, "new");

        assert!(ws.update_collection(Collection::new("ghost")).is_err());
        ws.delete_collection(&collection.id).unwrap();
        assert!(ws.collections().is_empty());
        assert!(ws.delete_collection(&collection.id).is_err());
    }

    #[test]
    fn test_search_collections() {
        let mut ws = Workspace::new();
        let users = ws.add_collection("Users").unwrap().id.clone();
        ws.add_collection("Billing").unwrap();
        ws.save_request(
            &users,
            ApiRequest::new(HttpMethod::GET, "https://x.test/invoices").with_name("Fetch"),
        )
        .unwrap();

        assert_eq!(ws.search_collections("users").len(), 1);
        assert_eq!(ws.search_collections("INVOICES").len(), 1);
        assert_eq!(ws.search_collections("bill").len(), 1);
        assert_eq!(ws.search_collections("").len(), 2);
    }

    #[test]
    fn test_collection_export_import() {
        let mut ws = Workspace::new();
        let cid = ws.add_collection("Exported").unwrap().id.clone();
        ws.save_request(&cid, ApiRequest::new(HttpMethod::PUT, "https://x.test/1"))
            .unwrap();

        let json = ws.export_collection(&cid).unwrap();
        assert!(json.contains("\n  \"id\""));

        let imported = ws.import_collection(&json).unwrap().clone();
        assert_ne!(imported.id, cid);
        assert_eq!(imported.name, "Exported");
        assert_eq!(imported.requests.len(), 1);
        assert_eq!(imported.requests[0].method, HttpMethod::PUT);
        assert_eq!(ws.collections().len(), 2);

        assert!(matches!(
            ws.import_collection(r#"{"name": "x"}"#),
            Err(StoreError::InvalidImport(_))
        ));
        assert!(matches!(
            ws.import_collection(r#"{"name": "", "requests": []}"#),
            Err(StoreError::InvalidImport(_))
        ));
        assert!(ws.import_collection("nope").is_err());
    }

    #[test]
    fn test_active_environment() {
        let (mut ws, id) = workspace_with_env();
        assert!(ws.active_environment().is_none());

        ws.set_active_environment(Some(&id)).unwrap();
        assert_eq!(ws.active_environment().unwrap().get("host"), Some("localhost"));

        assert!(ws.set_active_environment(Some("missing")).is_err());
        assert_eq!(ws.active_environment_id(), Some(id.as_str()));

        ws.set_active_environment(None).unwrap();
        assert!(ws.active_environment().is_none());
    }

    #[test]
    fn test_delete_active_environment_clears_selection() {
        let (mut ws, id) = workspace_with_env();
        ws.set_active_environment(Some(&id)).unwrap();
        ws.delete_environment(&id).unwrap();
        assert!(ws.active_environment_id().is_none());
        assert!(ws.environments().is_empty());
    }

    #[test]
    fn test_duplicate_environment() {
        let (mut ws, id) = workspace_with_env();
        let copy = ws.duplicate_environment(&id).unwrap().clone();
        assert_eq!(copy.name, "dev (Copy)");
        assert_ne!(copy.id, id);
        assert_eq!(ws.environments().len(), 2);
        assert!(ws.duplicate_environment("missing").is_err());
    }

    #[test]
    fn test_variables() {
        let (mut ws, id) = workspace_with_env();
        assert!(matches!(
            ws.add_variable(&id, " ", "v", None),
            Err(StoreError::EmptyName(_))
        ));
        let var = ws.add_variable(&id, "token", "abc", Some("auth")).unwrap();
        assert!(var.enabled);
        assert_eq!(var.category.as_deref(), Some("auth"));

        let added = ws
            .bulk_import_variables(&id, "A=1\nB: 2\n\ngarbage")
            .unwrap();
        assert_eq!(added, 2);

        assert_eq!(ws.filter_variables(&id, "all").unwrap().len(), 4);
        assert_eq!(ws.filter_variables(&id, "auth").unwrap().len(), 1);
        assert_eq!(ws.filter_variables(&id, "general").unwrap().len(), 3);
        assert!(ws.filter_variables("missing", "all").is_err());
    }

    #[test]
    fn test_environment_export_import() {
        let (mut ws, id) = workspace_with_env();
        let json = ws.export_environment(&id).unwrap();
        let imported = ws.import_environment(&json).unwrap().clone();
        assert_ne!(imported.id, id);
        assert_eq!(imported.get("host"), Some("localhost"));
        assert!(matches!(
            ws.import_environment(r#"{"name":"x"}"#),
            Err(StoreError::InvalidImport(_))
        ));
    }

    #[test]
    fn test_history_ops() {
        let mut ws = Workspace::with_history_limit(2);
        for n in 0..3 {
            ws.record(ApiRequest::new(HttpMethod::GET, format!("https://x.test/{n}")), None);
        }
        assert_eq!(ws.history().len(), 2);

        let id = ws.history().entries()[0].id.clone();
        ws.remove_history_entry(&id).unwrap();
        assert!(ws.remove_history_entry(&id).is_err());

        ws.clear_history();
        assert!(ws.history().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let storage = MemoryStorage::new();
        let (mut ws, id) = workspace_with_env();
        ws.set_active_environment(Some(&id)).unwrap();
        let cid = ws.add_collection("c").unwrap().id.clone();
        ws.save_request(&cid, ApiRequest::new(HttpMethod::GET, "{{host}}/x"))
            .unwrap();
        for n in 0..5 {
            ws.record(ApiRequest::new(HttpMethod::GET, format!("/{n}")), None);
        }
        ws.save(&storage).unwrap();

        let loaded = Workspace::load(&storage, 3).unwrap();
        assert_eq!(loaded.collections(), ws.collections());
        assert_eq!(loaded.environments(), ws.environments());
        assert_eq!(loaded.active_environment_id(), Some(id.as_str()));
        assert_eq!(loaded.history().len(), 3);
        assert_eq!(loaded.history().entries()[0].request.url, "/4");
    }

    #[test]
    fn test_load_empty_storage() {
        let ws = Workspace::load(&MemoryStorage::new(), 100).unwrap();
        assert!(ws.collections().is_empty());
        assert!(ws.environments().is_empty());
        assert!(ws.history().is_empty());
        assert!(ws.active_environment_id().is_none());
    }

    #[test]
    fn test_load_corrupt_slot_fails() {
        let storage = MemoryStorage::new();
        storage.save(Slot::Collections, "{not json").unwrap();
        assert!(matches!(
            Workspace::load(&storage, 100),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn test_load_drops_dangling_active_id() {
        let storage = MemoryStorage::new();
        storage
            .save(Slot::ActiveEnvironmentId, "\"gone\"")
            .unwrap();
        let ws = Workspace::load(&storage, 100).unwrap();
        assert!(ws.active_environment_id().is_none());
    }
}
