//! Workspace store
//!
//! Holds collections, environments, request history and the active
//! environment as one explicit [`Workspace`] value. Persistence is delegated
//! to an injected [`Storage`] backend keyed by four fixed [`Slot`]s.

pub mod storage;
pub mod workspace;

pub use storage::{FileStorage, MemoryStorage, Slot, Storage, StorageError};
pub use workspace::{StoreError, Workspace};
