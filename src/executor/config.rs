//! HTTP request execution configuration.

use crate::config::{get_config, WorkbenchConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Parameters that control how a transport executes requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in milliseconds, covering connect through body download.
    pub timeout_ms: u64,

    pub follow_redirects: bool,

    pub max_redirects: u32,

    pub validate_ssl: bool,

    /// Headers added when the request does not set them.
    pub default_headers: HashMap<String, String>,
}

impl ExecutionConfig {
    /// Creates a config with the given timeout and default settings otherwise.
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Self::from(&WorkbenchConfig::default())
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Creates an ExecutionConfig from the global configuration.
    pub fn from_global_config() -> Self {
        Self::from(&get_config())
    }
}

impl Default for ExecutionConfig {
    /// Reads the global configuration.
    fn default() -> Self {
        Self::from_global_config()
    }
}

impl From<&WorkbenchConfig> for ExecutionConfig {
    fn from(config: &WorkbenchConfig) -> Self {
        Self {
            timeout_ms: config.timeout,
            follow_redirects: config.follow_redirects,
            max_redirects: config.max_redirects,
            validate_ssl: config.validate_ssl,
            default_headers: config.default_headers.clone(),
        }
    }
}
