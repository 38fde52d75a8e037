//! Persistence backends for the workspace.
//!
//! A [`Storage`] is an opaque key/value store with four fixed slots. Values
//! are JSON documents; the store never interprets them.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Named persistence slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Collections,
    Environments,
    History,
    ActiveEnvironmentId,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::Collections,
        Slot::Environments,
        Slot::History,
        Slot::ActiveEnvironmentId,
    ];

    /// Key under which the slot is stored.
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Collections => "collections",
            Slot::Environments => "environments",
            Slot::History => "history",
            Slot::ActiveEnvironmentId => "activeEnvironmentId",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Load/save of opaque slot values.
pub trait Storage: Send + Sync {
    /// Returns the stored value, or `None` if the slot was never written.
    fn load(&self, slot: Slot) -> Result<Option<String>, StorageError>;

    fn save(&self, slot: Slot, value: &str) -> Result<(), StorageError>;

    /// Removes a slot. Removing an absent slot is not an error.
    fn remove(&self, slot: Slot) -> Result<(), StorageError>;
}

/// In-process storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<Slot, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        let slots = self.slots.read().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(&slot).cloned())
    }

    fn save(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        slots.insert(slot, value.to_string());
        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        slots.remove(&slot);
        Ok(())
    }
}

/// One JSON file per slot inside a directory.
///
/// The directory is created on first save. Writes go to a temporary file that
/// is then renamed over the slot file, so a crash never leaves a half-written
/// slot behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn load(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn save(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let path = self.slot_path(slot);
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path).map_err(io_error(&tmp_path))?;
            file.write_all(value.as_bytes())
                .map_err(io_error(&tmp_path))?;
            file.flush().map_err(io_error(&tmp_path))?;
        }
        fs::rename(&tmp_path, &path).map_err(io_error(&path))?;

        log::debug!("Saved slot {} to {}", slot, path.display());
        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}
