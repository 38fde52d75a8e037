//! Bulk variable entry
//!
//! Parses pasted text such as a `.env` fragment into environment variables.
//! Each non-blank line of the form `KEY=VALUE` or `KEY: VALUE` becomes one
//! enabled variable; anything else is skipped.

use super::models::{EnvironmentVariable, DEFAULT_CATEGORY};
use once_cell::sync::Lazy;
use regex::Regex;

static BULK_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^=:]+)[=:](.*)$").expect("Failed to compile bulk line regex"));

/// Parses `KEY=VALUE` / `KEY: VALUE` lines into enabled variables.
///
/// Keys and values are trimmed. Every variable gets a fresh id and the
/// `general` category.
pub fn parse_bulk_variables(text: &str) -> Vec<EnvironmentVariable> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let caps = BULK_LINE_REGEX.captures(line)?;
            Some(
                EnvironmentVariable::new(caps[1].trim(), caps[2].trim())
                    .with_category(DEFAULT_CATEGORY),
            )
        })
        .collect()
}
