//! User interface module - terminal output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing the final report

use std::io::{self, Write};

use serde::Serialize;

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_status, display_success, format_change_summary, format_report,
};

/// Print a report as JSON on stdout.
pub fn print_report<R: Serialize>(report: &R) -> Result<()> {
    let rendered = format_report(report)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    stdout.flush()?;
    Ok(())
}
