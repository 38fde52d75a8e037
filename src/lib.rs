//! REST Workbench
//!
//! The request pipeline of an API-testing workbench, plus the workspace it
//! runs against: collections of saved requests, environments of named
//! variables and a bounded request history.
//!
//! # Architecture
//!
//! - **variables**: `{{name}}` substitution against the active environment
//! - **assembler**: turns a substituted request into a dispatchable one
//!   (final URL, header map, body)
//! - **executor**: sends an assembled request through a [`Transport`] and
//!   normalizes the outcome into an [`ApiResponse`]
//! - **history**: records every send, newest first, capped at a limit
//! - **store**: the [`Workspace`] holding collections, environments, history
//!   and the active environment, persisted through a [`Storage`] backend
//! - **pipeline**: wires the stages together behind [`Workbench::send`]
//! - **config**: settings loaded from JSON into a process-wide config
//! - **formatter**: response display for the command line
//! - **demo**: a small in-memory CRUD backend to try requests against
//!
//! # Example
//!
//! ```no_run
//! use rest_workbench::config::WorkbenchConfig;
//! use rest_workbench::models::{ApiRequest, HttpMethod};
//! use rest_workbench::{Workbench, Workspace};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workspace = Workspace::new();
//! let env_id = workspace.add_environment("local")?.id.clone();
//! workspace.add_variable(&env_id, "baseUrl", "http://localhost:3000", None)?;
//! workspace.set_active_environment(Some(&env_id))?;
//!
//! let mut workbench = Workbench::with_reqwest(workspace, &WorkbenchConfig::default())?;
//! let outcome = workbench
//!     .send(&ApiRequest::new(HttpMethod::GET, "{{baseUrl}}/api/users"))
//!     .await?;
//! println!("{}", outcome.response.status);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod config;
#[cfg(feature = "demo")]
pub mod demo;
pub mod environment;
pub mod executor;
pub mod formatter;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod variables;

pub use assembler::{assemble_request, AssembleError, AssembledBody, AssembledRequest};
pub use environment::{Environment, EnvironmentVariable};
pub use executor::{invoke, ExecutionConfig, RequestError, ReqwestTransport, Transport};
pub use history::{HistoryEntry, HistoryLog};
pub use models::{ApiRequest, ApiResponse, Collection, HttpMethod};
pub use pipeline::{send_request, SendOutcome, Workbench};
pub use store::{FileStorage, MemoryStorage, Storage, StoreError, Workspace};
pub use variables::substitute_variables;
