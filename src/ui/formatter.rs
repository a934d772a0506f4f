//! Pure formatting functions for terminal output.
//!
//! Status lines go to stderr so stdout carries only the JSON report.

use serde::Serialize;

use crate::error::Result;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("\x1b[33m→\x1b[0m {}", message);
}

/// Render a report as pretty-printed JSON.
pub fn format_report<R: Serialize>(report: &R) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One-line summary of an apply result
pub fn format_change_summary(state: &str, hook_id: &str, check_mode: bool) -> String {
    if check_mode {
        format!("Hook {} would be set {} (check mode)", hook_id, state)
    } else {
        format!("Hook {} set {}", hook_id, state)
    }
}
