//! Output formatting utilities
//!
//! Provides text and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::health::HealthReport;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TextDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", render(data, format))
}

/// Render output without printing it
pub fn render<T: Serialize + TextDisplay>(data: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => data.to_text(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Trait for types that can be displayed as text
pub trait TextDisplay {
    /// Format as human-readable text
    fn to_text(&self) -> String;
}

impl TextDisplay for HealthReport {
    fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Simple message for command results
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TextDisplay for Message {
    fn to_text(&self) -> String {
        self.message.clone()
    }
}
