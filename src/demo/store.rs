//! In-memory fixture records for the demo backend.

use dashmap::DashMap;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Records keyed by resource name (`users`, `products`).
///
/// Each record is a JSON object carrying a numeric `id`. The map is shared
/// between handler tasks, so clones point at the same data.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    resources: Arc<DashMap<String, Vec<Map<String, Value>>>>,
}

impl ResourceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with two users and two products.
    pub fn with_fixtures() -> Self {
        let store = Self::new();
        store.insert_resource(
            "users",
            vec![
                json!({"id": 1, "name": "John Doe", "email": "john@example.com", "role": "user"}),
                json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "role": "admin"}),
            ],
        );
        store.insert_resource(
            "products",
            vec![
                json!({"id": 1, "name": "Laptop", "price": 999.99, "inStock": true}),
                json!({"id": 2, "name": "Smartphone", "price": 499.99, "inStock": false}),
            ],
        );
        store
    }

    /// Replaces every record of `resource`. Values that are not objects are skipped.
    pub fn insert_resource(&self, resource: &str, records: Vec<Value>) {
        let records = records
            .into_iter()
            .filter_map(|record| match record {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.resources.insert(resource.to_string(), records);
    }

    pub fn has_resource(&self, resource: &str) -> bool {
        self.resources.contains_key(resource)
    }

    /// Resource names, sorted.
    pub fn resource_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// All records of `resource`, or `None` for an unknown resource.
    pub fn list(&self, resource: &str) -> Option<Vec<Value>> {
        self.resources.get(resource).map(|records| {
            records
                .iter()
                .map(|record| Value::Object(record.clone()))
                .collect()
        })
    }

    pub fn get(&self, resource: &str, id: u64) -> Option<Value> {
        let records = self.resources.get(resource)?;
        records
            .iter()
            .find(|record| record_id(record) == Some(id))
            .map(|record| Value::Object(record.clone()))
    }

    /// Shallow-merges `changes` into the record and returns the result.
    ///
    /// Keys in `changes` overwrite existing keys; `id` always keeps the
    /// path id. Returns `None` when the resource or record does not exist.
    pub fn update(&self, resource: &str, id: u64, changes: &Map<String, Value>) -> Option<Value> {
        let mut records = self.resources.get_mut(resource)?;
        let record = records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))?;

        for (key, value) in changes {
            record.insert(key.clone(), value.clone());
        }
        record.insert("id".to_string(), Value::from(id));

        Some(Value::Object(record.clone()))
    }
}

fn record_id(record: &Map<String, Value>) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}
