//! Request cancellation tracking and management.
//!
//! In-flight requests are registered with a [`RequestTracker`] under an id.
//! Each registration owns the sending half of a `tokio::sync::watch` channel;
//! the matching [`CancelToken`] is raced against the transport call, so
//! cancelling flips the flag and the in-flight send is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

/// A handle to a running request that can be cancelled.
#[derive(Debug)]
pub struct RequestHandle {
    /// Unique identifier for this request.
    pub request_id: String,

    cancelled: watch::Sender<bool>,
}

impl RequestHandle {
    /// Creates a new request handle with a generated UUID.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Creates a new request handle with a specific request ID.
    pub fn with_id(request_id: impl Into<String>) -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            request_id: request_id.into(),
            cancelled,
        }
    }

    /// Returns a token that resolves once this request is cancelled.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: self.cancelled.subscribe(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Marks this request as cancelled and wakes every token.
    pub fn mark_cancelled(&self) {
        self.cancelled.send_replace(true);
    }
}

impl Default for RequestHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a cancellation flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Waits until the request is cancelled.
    ///
    /// Never resolves if the handle is dropped without cancelling, which is
    /// what happens when a request completes normally.
    pub async fn cancelled(&mut self) {
        while !*self.receiver.borrow_and_update() {
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Error types for cancellation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancelError {
    #[error("Request not found: {0}")]
    NotFound(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

/// Registry of in-flight requests.
#[derive(Debug, Default)]
pub struct RequestTracker {
    active_requests: HashMap<String, RequestHandle>,

    /// Order of request IDs by insertion time (oldest first).
    request_order: Vec<String>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a request and returns its id.
    pub fn register(&mut self, handle: RequestHandle) -> String {
        let request_id = handle.request_id.clone();
        self.request_order.push(request_id.clone());
        self.active_requests.insert(request_id.clone(), handle);
        request_id
    }

    /// Removes a request from tracking (called when request completes).
    ///
    /// Returns `true` if the request was found.
    pub fn unregister(&mut self, request_id: &str) -> bool {
        if let Some(pos) = self.request_order.iter().position(|id| id == request_id) {
            self.request_order.remove(pos);
        }

        self.active_requests.remove(request_id).is_some()
    }

    /// Cancels a specific request by ID and stops tracking it.
    pub fn cancel_request(&mut self, request_id: &str) -> Result<(), CancelError> {
        let handle = self
            .active_requests
            .get(request_id)
            .ok_or_else(|| CancelError::NotFound(request_id.to_string()))?;

        handle.mark_cancelled();
        self.unregister(request_id);

        Ok(())
    }

    /// Cancels the most recently started request and returns its id.
    pub fn cancel_most_recent(&mut self) -> Result<String, CancelError> {
        let request_id = self
            .request_order
            .last()
            .ok_or_else(|| CancelError::NotFound("no active requests".to_string()))?
            .clone();

        self.cancel_request(&request_id)?;
        Ok(request_id)
    }

    pub fn active_count(&self) -> usize {
        self.active_requests.len()
    }

    /// Active request ids, oldest first.
    pub fn active_request_ids(&self) -> Vec<String> {
        self.request_order.clone()
    }

    pub fn is_active(&self, request_id: &str) -> bool {
        self.active_requests.contains_key(request_id)
    }
}

/// Thread-safe wrapper around RequestTracker.
#[derive(Debug, Clone, Default)]
pub struct SharedRequestTracker {
    inner: Arc<Mutex<RequestTracker>>,
}

impl SharedRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RequestTracker>, CancelError> {
        self.inner
            .lock()
            .map_err(|e| CancelError::LockError(e.to_string()))
    }

    pub fn register(&self, handle: RequestHandle) -> Result<String, CancelError> {
        Ok(self.lock()?.register(handle))
    }

    pub fn unregister(&self, request_id: &str) -> Result<bool, CancelError> {
        Ok(self.lock()?.unregister(request_id))
    }

    pub fn cancel_request(&self, request_id: &str) -> Result<(), CancelError> {
        self.lock()?.cancel_request(request_id)
    }

    pub fn cancel_most_recent(&self) -> Result<String, CancelError> {
        self.lock()?.cancel_most_recent()
    }

    pub fn active_count(&self) -> Result<usize, CancelError> {
        Ok(self.lock()?.active_count())
    }

    pub fn active_request_ids(&self) -> Result<Vec<String>, CancelError> {
        Ok(self.lock()?.active_request_ids())
    }

    pub fn is_active(&self, request_id: &str) -> Result<bool, CancelError> {
        Ok(self.lock()?.is_active(request_id))
    }
}
