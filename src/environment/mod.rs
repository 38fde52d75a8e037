//! Environment management for the workbench
//!
//! Environments are named variable sets. This module holds the data models
//! plus the operations that act on a single environment: duplication, bulk
//! entry and import validation. Keeping track of which environment is active
//! is the job of [`crate::store::Workspace`].
//!
//! # Example
//!
//! ```
//! use rest_workbench::environment::{Environment, EnvironmentVariable};
//! use rest_workbench::variables::substitute_variables;
//!
//! let env = Environment::new("dev")
//!     .with_variable(EnvironmentVariable::new("baseUrl", "http://localhost:3000"));
//!
//! assert_eq!(
//!     substitute_variables("{{baseUrl}}/users", Some(&env)),
//!     "http://localhost:3000/users"
//! );
//! ```

pub mod bulk;
pub mod models;

pub use bulk::parse_bulk_variables;
pub use models::{Environment, EnvironmentVariable, DEFAULT_CATEGORY};

use serde_json::Value;

/// Copies an environment under a new id, named `"<name> (Copy)"`.
///
/// Every variable in the copy gets a fresh id as well.
pub fn duplicate_environment(environment: &Environment) -> Environment {
    Environment {
        id: uuid::Uuid::new_v4().to_string(),
        name: format!("{} (Copy)", environment.name),
        description: environment.description.clone(),
        variables: environment
            .variables
            .iter()
            .map(|v| EnvironmentVariable {
                id: uuid::Uuid::new_v4().to_string(),
                ..v.clone()
            })
            .collect(),
    }
}

/// Parses an exported environment document.
///
/// The document must have a non-empty `name` and a `variables` array. The
/// result gets a fresh environment id; variables keep their id when present
/// (a fresh one otherwise) and default to the `general` category.
pub fn parse_environment_import(json: &str) -> Result<Environment, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;

    let has_name = value
        .get("name")
        .and_then(Value::as_str)
        .map_or(false, |n| !n.is_empty());
    let has_variables = value.get("variables").map_or(false, Value::is_array);
    if !has_name || !has_variables {
        return Err("Invalid environment format".to_string());
    }

    let name = value["name"].as_str().unwrap_or_default().to_string();
    let description = value
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let variables = value["variables"]
        .as_array()
        .map(|vars| vars.iter().map(import_variable).collect())
        .unwrap_or_default();

    Ok(Environment {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        description,
        variables,
    })
}

fn import_variable(value: &Value) -> EnvironmentVariable {
    let text = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    EnvironmentVariable {
        id: text("id").unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        key: text("key").unwrap_or_default(),
        value: text("value").unwrap_or_default(),
        enabled: value.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        category: Some(text("category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
    }
}
