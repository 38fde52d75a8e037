//! Variable substitution engine
//!
//! Replaces `{{variable}}` tokens with values from the active environment in a
//! single regex pass. Substitution is total: unknown, disabled or malformed
//! tokens are left exactly as written, and substituted values are never
//! re-scanned.

use crate::environment::Environment;
use crate::models::{ApiRequest, BodyMode};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Cached regex pattern for matching `{{variableName}}`.
/// The captured name is used as-is; surrounding whitespace is part of the key.
static VARIABLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Failed to compile variable regex"));

/// Substitutes all `{{variable}}` tokens in `text`.
///
/// Each token resolves to the first enabled variable of `environment` whose key
/// equals the token name exactly. When `environment` is `None`, or no enabled
/// variable matches, the token is kept verbatim.
///
/// # Examples
///
/// ```
/// use rest_workbench::environment::{Environment, EnvironmentVariable};
/// use rest_workbench::variables::substitute_variables;
///
/// let env = Environment::new("dev")
///     .with_variable(EnvironmentVariable::new("host", "api.test"));
///
/// assert_eq!(
///     substitute_variables("https://{{host}}/{{missing}}", Some(&env)),
///     "https://api.test/{{missing}}"
/// );
/// assert_eq!(substitute_variables("{{host}}", None), "{{host}}");
/// ```
pub fn substitute_variables(text: &str, environment: Option<&Environment>) -> String {
    let Some(env) = environment else {
        return text.to_string();
    };

    // Fast path: no token markers at all
    if !text.contains("{{") {
        return text.to_string();
    }

    VARIABLE_REGEX
        .replace_all(text, |caps: &Captures| match env.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Applies substitution to every part of a request that is sent on the wire.
///
/// Covers the URL, each header value, each query-parameter value, the raw
/// body (raw mode only) and each form-field value (form-data mode only). Keys
/// are left untouched.
pub fn substitute_request(request: &ApiRequest, environment: Option<&Environment>) -> ApiRequest {
    let mut resolved = request.clone();
    let sub = |text: &str| substitute_variables(text, environment);

    resolved.url = sub(&request.url);

    for header in &mut resolved.headers {
        header.value = sub(&header.value);
    }

    for param in &mut resolved.params {
        param.value = sub(&param.value);
    }

    match resolved.body.mode {
        BodyMode::Raw => {
            if let Some(raw) = resolved.body.raw.as_mut() {
                *raw = sub(raw.as_str());
            }
        }
        BodyMode::FormData => {
            if let Some(fields) = resolved.body.form_data.as_mut() {
                for field in fields.iter_mut() {
                    field.value = sub(&field.value);
                }
            }
        }
        BodyMode::None => {}
    }

    resolved
}

/// Lists token names referenced in `text`, in order of appearance.
pub fn find_variable_references(text: &str) -> Vec<String> {
    VARIABLE_REGEX
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Lists referenced token names that would be left verbatim by substitution.
///
/// Duplicates are reported once.
pub fn unresolved_variables(text: &str, environment: Option<&Environment>) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for name in find_variable_references(text) {
        let resolved = environment.map_or(false, |env| env.contains(&name));
        if !resolved && !missing.contains(&name) {
            missing.push(name);
        }
    }
    missing
}
