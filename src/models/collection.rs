//! Collections of saved requests.

use super::request::ApiRequest;
use serde::{Deserialize, Serialize};

/// A named, ordered list of saved request descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub requests: Vec<ApiRequest>,
}

impl Collection {
    /// Creates an empty collection with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            requests: Vec::new(),
        }
    }

    /// Finds a request by id.
    pub fn request(&self, request_id: &str) -> Option<&ApiRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    /// Inserts the request, replacing an existing one with the same id in place.
    pub fn upsert_request(&mut self, request: ApiRequest) {
        match self.requests.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => *existing = request,
            None => self.requests.push(request),
        }
    }

    /// Removes a request by id, returning it if present.
    pub fn remove_request(&mut self, request_id: &str) -> Option<ApiRequest> {
        let index = self.requests.iter().position(|r| r.id == request_id)?;
        Some(self.requests.remove(index))
    }

    /// Case-insensitive match on the collection name or any request name or URL.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.requests.iter().any(|r| {
                r.name.to_lowercase().contains(&query) || r.url.to_lowercase().contains(&query)
            })
    }
}
