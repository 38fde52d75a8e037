//! Configuration schema for the workbench.
//!
//! This module defines the configuration structure and validation logic for all
//! user-configurable settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure for the workbench.
///
/// All settings live under the "rest-workbench" key of a settings document.
/// Missing settings fall back to sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchConfig {
    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Defaults to 30000ms (30 seconds).
    ///
    /// Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to automatically follow HTTP redirects.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    ///
    /// Only used when `follow_redirects` is true. Defaults to 10.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate SSL/TLS certificates.
    ///
    /// **Warning:** Disabling SSL validation can expose you to security risks.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// Maximum number of entries kept in the request history.
    ///
    /// Must be greater than 0. Defaults to 100.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Whether raw bodies must parse as JSON before a request is sent.
    #[serde(default = "default_validate_json_body")]
    pub validate_json_body: bool,

    /// Directory holding the persisted workspace slots.
    ///
    /// A leading `~/` is expanded to the user's home directory.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Headers added to every request that does not set them itself.
    #[serde(default = "default_headers")]
    pub default_headers: HashMap<String, String>,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            validate_ssl: default_validate_ssl(),
            history_limit: default_history_limit(),
            validate_json_body: default_validate_json_body(),
            storage_dir: default_storage_dir(),
            default_headers: default_headers(),
        }
    }
}

impl WorkbenchConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.history_limit == 0 {
            return Err("historyLimit must be greater than 0".to_string());
        }

        if self.storage_dir.trim().is_empty() {
            return Err("storageDir must not be empty".to_string());
        }

        // max_redirects can be 0 (no redirects)

        Ok(())
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout)
    }

    /// Resolves `storage_dir`, expanding a leading `~/`.
    pub fn storage_path(&self) -> PathBuf {
        match self.storage_dir.strip_prefix("~/") {
            Some(rest) => match std::env::var_os("HOME") {
                Some(home) => PathBuf::from(home).join(rest),
                None => PathBuf::from(&self.storage_dir),
            },
            None => PathBuf::from(&self.storage_dir),
        }
    }
}

// Default value functions for serde

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_validate_ssl() -> bool {
    true
}

fn default_history_limit() -> usize {
    crate::history::DEFAULT_MAX_HISTORY_ENTRIES
}

fn default_validate_json_body() -> bool {
    true
}

fn default_storage_dir() -> String {
    "~/.config/rest-workbench".to_string()
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "User-Agent".to_string(),
        format!("rest-workbench/{}", env!("CARGO_PKG_VERSION")),
    );
    headers
}
