//! Integration tests module for REST Workbench
//!
//! Shared helpers for the pipeline, store and demo backend tests.

#[cfg(feature = "demo")]
pub mod demo_server_test;
pub mod pipeline_test;
pub mod store_test;

use rest_workbench::environment::{Environment, EnvironmentVariable};
use rest_workbench::store::Workspace;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// An environment named `name` with every pair enabled.
pub fn environment_with(name: &str, vars: &[(&str, &str)]) -> Environment {
    vars.iter().fold(Environment::new(name), |env, (key, value)| {
        env.with_variable(EnvironmentVariable::new(*key, *value))
    })
}

/// A workspace whose active environment points `baseUrl` at `base_url`.
pub fn workspace_for(base_url: &str) -> Workspace {
    let mut workspace = Workspace::new();
    let env = environment_with("local", &[("baseUrl", base_url), ("token", "secret")]);
    let env_id = env.id.clone();
    workspace
        .import_environment(&serde_json::to_string(&env).expect("serialize environment"))
        .expect("import environment");
    let imported_id = workspace
        .environment_by_name("local")
        .map(|e| e.id.clone())
        .expect("environment imported");
    assert_ne!(imported_id, env_id, "imports get a fresh id");
    workspace
        .set_active_environment(Some(&imported_id))
        .expect("activate environment");
    workspace
}
