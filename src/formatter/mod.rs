//! Response formatting for terminal display.
//!
//! Renders an [`ApiResponse`] the way the command-line front end prints it: a
//! one-line summary, the header block and the body, pretty-printed when it is
//! JSON.

pub mod json;

pub use json::{format_json, validate_json};

use crate::history::HistoryEntry;
use crate::models::ApiResponse;

/// Formats a byte count as `B`, `KB` or `MB`.
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Formats elapsed milliseconds, switching to seconds from one second up.
pub fn format_duration(millis: f64) -> String {
    if millis < 1000.0 {
        format!("{:.0} ms", millis)
    } else {
        format!("{:.2} s", millis / 1000.0)
    }
}

/// One-line summary such as `200 OK · 12 ms · 1.2 KB`.
pub fn format_status_line(response: &ApiResponse) -> String {
    let status = if response.is_transport_error() {
        response.status_text.clone()
    } else if response.status_text.is_empty() {
        response.status.to_string()
    } else {
        format!("{} {}", response.status, response.status_text)
    };

    format!(
        "{} · {} · {}",
        status,
        format_duration(response.time),
        format_size(response.size)
    )
}

/// Header block, one `name: value` line per header, sorted by name.
pub fn format_headers(response: &ApiResponse) -> String {
    let mut headers: Vec<(&String, &String)> = response.headers.iter().collect();
    headers.sort_by(|a, b| a.0.cmp(b.0));
    headers
        .into_iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full display: status line, headers and body.
pub fn format_response(response: &ApiResponse) -> String {
    let mut output = format_status_line(response);
    output.push('\n');

    let headers = format_headers(response);
    if !headers.is_empty() {
        output.push('\n');
        output.push_str(&headers);
        output.push('\n');
    }

    if !response.body.is_empty() {
        output.push('\n');
        output.push_str(&format_json(&response.body));
        output.push('\n');
    }

    output
}

/// Compact history line: local time, method, URL and outcome.
pub fn format_history_line(entry: &HistoryEntry) -> String {
    let when = entry
        .recorded_at()
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| entry.timestamp.to_string());

    let outcome = match &entry.response {
        Some(response) if response.is_transport_error() => "ERR".to_string(),
        Some(response) => format!("{} {}", response.status, format_duration(response.time)),
        None => "not sent".to_string(),
    };

    format!(
        "{}  {:<7} {}  [{}]",
        when,
        entry.request.method.as_str(),
        entry.request.url,
        outcome
    )
}
