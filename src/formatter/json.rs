//! JSON pretty-printing for response display.

use serde::Serialize;
use serde_json::Value;

/// Responses larger than this are shown as received.
const MAX_JSON_FORMAT_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Pretty-prints JSON with 2-space indentation.
///
/// Input that is not valid JSON, or is too large to reformat, is returned
/// unchanged so callers can always display the result.
///
/// # Examples
///
/// ```
/// use rest_workbench::formatter::format_json;
///
/// let formatted = format_json(r#"{"name":"John","age":30}"#);
/// assert!(formatted.contains("  \"name\": \"John\""));
/// assert_eq!(format_json("not json"), "not json");
/// ```
pub fn format_json(json: &str) -> String {
    try_format_json(json).unwrap_or_else(|| json.to_string())
}

fn try_format_json(json: &str) -> Option<String> {
    if json.len() > MAX_JSON_FORMAT_SIZE || json.trim().is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(json).ok()?;

    // Formatted output is usually ~1.5x the compact size
    let mut buf = Vec::with_capacity(json.len() + json.len() / 2);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).ok()?;

    String::from_utf8(buf).ok()
}

/// Checks that `text` parses as JSON, returning the parser error otherwise.
pub fn validate_json(text: &str) -> Result<(), serde_json::Error> {
    serde_json::from_str::<Value>(text).map(|_| ())
}
