//! Environment data models for the workbench
//!
//! An environment is a named variable set. Exactly one environment (or none)
//! is active at a time, and its enabled variables feed `{{variable}}`
//! substitution.

use serde::{Deserialize, Serialize};

/// Category assigned to variables that arrive without one.
pub const DEFAULT_CATEGORY: &str = "general";

fn default_enabled() -> bool {
    true
}

/// A single variable inside an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    /// Identifier, fixed once created
    pub id: String,

    pub key: String,

    pub value: String,

    /// Disabled variables never participate in substitution
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Free-form grouping label (e.g. "general", "auth")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EnvironmentVariable {
    /// Creates an enabled variable with a fresh identifier
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            key: key.into(),
            value: value.into(),
            enabled: true,
            category: None,
        }
    }

    /// Sets the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Marks the variable as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A named set of variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Identifier, fixed once created
    pub id: String,

    /// Environment name (e.g. "dev", "staging", "production")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Variables in editor order
    #[serde(default)]
    pub variables: Vec<EnvironmentVariable>,
}

impl Environment {
    /// Creates an empty environment with a fresh identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            variables: Vec::new(),
        }
    }

    /// Appends a variable and returns the environment
    pub fn with_variable(mut self, variable: EnvironmentVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Value of the first enabled variable whose key equals `key` exactly
    pub fn get(&self, key: &str) -> Option<&str> {
        self.enabled_variables()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// Checks whether an enabled variable with this key exists
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over enabled variables
    pub fn enabled_variables(&self) -> impl Iterator<Item = &EnvironmentVariable> {
        self.variables.iter().filter(|v| v.enabled)
    }

    /// Variables in the given category; `"all"` selects every variable
    pub fn variables_in_category(&self, category: &str) -> Vec<&EnvironmentVariable> {
        self.variables
            .iter()
            .filter(|v| category == "all" || v.category.as_deref() == Some(category))
            .collect()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.variables.iter().filter_map(|v| v.category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Returns the number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks if the environment has no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
