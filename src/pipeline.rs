//! The request pipeline.
//!
//! One send runs substitution, assembly, transport and history recording in
//! that order:
//!
//! ```text
//! ApiRequest ──substitute──▶ ApiRequest ──assemble──▶ AssembledRequest
//!                                                        │
//!              HistoryEntry ◀──record── ApiResponse ◀──invoke
//! ```
//!
//! [`send_request`] runs the first three stages on their own. [`Workbench`]
//! runs all four against a [`Workspace`], taking the active environment from
//! it and recording every attempt in its history.

use crate::assembler::{assemble_request, validate_raw_json, AssembleError};
use crate::config::WorkbenchConfig;
use crate::environment::Environment;
use crate::executor::{
    invoke, invoke_cancellable, ExecutionConfig, RequestError, RequestHandle, ReqwestTransport,
    SharedRequestTracker, Transport,
};
use crate::models::{ApiRequest, ApiResponse};
use crate::store::Workspace;
use crate::variables::{substitute_request, unresolved_variables};
use std::sync::Arc;

/// Substitutes, assembles and sends one request, without touching history.
///
/// Assembly errors are returned before anything is sent; transport failures
/// come back as the status-0 response.
pub async fn send_request(
    transport: &dyn Transport,
    request: &ApiRequest,
    environment: Option<&Environment>,
    config: &ExecutionConfig,
) -> Result<ApiResponse, AssembleError> {
    let resolved = substitute_request(request, environment);
    let assembled = assemble_request(&resolved)?;
    Ok(invoke(transport, &assembled, config).await)
}

/// Result of a [`Workbench::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    /// Id of the history entry recorded for this send.
    pub entry_id: String,
    /// Id under which the in-flight request was tracked for cancellation.
    pub request_id: String,
    pub response: ApiResponse,
    /// `{{tokens}}` in the URL that no enabled variable resolved.
    pub unresolved: Vec<String>,
}

/// A workspace wired to a transport.
pub struct Workbench {
    workspace: Workspace,
    transport: Arc<dyn Transport>,
    execution: ExecutionConfig,
    tracker: SharedRequestTracker,
    validate_json_body: bool,
}

impl Workbench {
    pub fn new(workspace: Workspace, transport: Arc<dyn Transport>, config: &WorkbenchConfig) -> Self {
        Self {
            workspace,
            transport,
            execution: ExecutionConfig::from(config),
            tracker: SharedRequestTracker::new(),
            validate_json_body: config.validate_json_body,
        }
    }

    /// A workbench sending through reqwest.
    pub fn with_reqwest(workspace: Workspace, config: &WorkbenchConfig) -> Result<Self, RequestError> {
        let transport = ReqwestTransport::new(&ExecutionConfig::from(config))?;
        Ok(Self::new(workspace, Arc::new(transport), config))
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    /// Tracker of in-flight sends; clone it to cancel from another task.
    pub fn tracker(&self) -> SharedRequestTracker {
        self.tracker.clone()
    }

    pub fn execution_config(&self) -> &ExecutionConfig {
        &self.execution
    }

    /// Sends `request` using the workspace's active environment.
    pub async fn send(&mut self, request: &ApiRequest) -> Result<SendOutcome, AssembleError> {
        let environment = self.workspace.active_environment().cloned();
        self.send_with_environment(request, environment.as_ref()).await
    }

    /// Sends `request` with an explicit environment, recording the attempt.
    ///
    /// A raw body that is not valid JSON is rejected up front when
    /// `validateJsonBody` is on, and nothing is recorded. Any other assembly
    /// failure is recorded with no response before the error is returned.
    /// History always stores the request as written, tokens included.
    pub async fn send_with_environment(
        &mut self,
        request: &ApiRequest,
        environment: Option<&Environment>,
    ) -> Result<SendOutcome, AssembleError> {
        if self.validate_json_body {
            validate_raw_json(request)?;
        }

        let resolved = substitute_request(request, environment);
        let unresolved = unresolved_variables(&request.url, environment);
        if !unresolved.is_empty() {
            log::warn!("Unresolved variables in URL: {}", unresolved.join(", "));
        }

        let assembled = match assemble_request(&resolved) {
            Ok(assembled) => assembled,
            Err(e) => {
                log::warn!("Could not assemble {} {}: {}", request.method, request.url, e);
                self.workspace.record(request.clone(), None);
                return Err(e);
            }
        };

        let handle = RequestHandle::new();
        let token = handle.token();
        let request_id = handle.request_id.clone();
        let tracked = match self.tracker.register(handle) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Request {} will not be cancellable: {}", request_id, e);
                false
            }
        };

        let response =
            invoke_cancellable(self.transport.as_ref(), &assembled, &self.execution, token).await;

        if tracked {
            if let Err(e) = self.tracker.unregister(&request_id) {
                log::warn!("Failed to untrack request {}: {}", request_id, e);
            }
        }

        let entry_id = self
            .workspace
            .record(request.clone(), Some(response.clone()))
            .id
            .clone();

        Ok(SendOutcome {
            entry_id,
            request_id,
            response,
            unresolved,
        })
    }
}
