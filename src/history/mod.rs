//! Request history tracking.
//!
//! Every send is recorded as a [`HistoryEntry`] in a [`HistoryLog`]: a
//! bounded list ordered newest first. When the log is full the oldest entry is
//! evicted. Persisting the log is the workspace store's job.
//!
//! # Example
//!
//! ```
//! use rest_workbench::history::HistoryLog;
//! use rest_workbench::models::{ApiRequest, ApiResponse, HttpMethod};
//!
//! let mut history = HistoryLog::new(2);
//! for path in ["a", "b", "c"] {
//!     let request = ApiRequest::new(HttpMethod::GET, format!("https://x.test/{path}"));
//!     history.record(request, Some(ApiResponse::new(200, "OK")));
//! }
//!
//! assert_eq!(history.len(), 2);
//! assert_eq!(history.entries()[0].request.url, "https://x.test/c");
//! ```

pub mod models;
pub mod recorder;
pub mod search;

pub use models::HistoryEntry;
pub use recorder::{HistoryLog, DEFAULT_MAX_HISTORY_ENTRIES};
pub use search::{filter_by_method, filter_by_status, filter_errors, search_history};
