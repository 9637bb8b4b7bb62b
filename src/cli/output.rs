//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::Summary;
pub use crate::storage::OutputFormat;

const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
    color: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            color: false,
        }
    }

    /// Enables or disables ANSI colours in text output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints warnings, then errors, then a one-line tally (text only)
    pub fn report(&self, summary: &Summary) {
        if self.format != OutputFormat::Text {
            return;
        }

        for warning in &summary.warnings {
            println!("{}", self.paint(YELLOW, &format!("WARNING: {}", warning)));
        }
        for error in &summary.errors {
            println!("{}", self.paint(RED, &format!("ERROR: {}", error)));
        }

        if summary.is_clean() {
            println!("{}", self.paint(GREEN, "No problems found"));
        } else {
            println!();
            println!(
                "{} warning(s), {} error(s)",
                summary.warnings.len(),
                summary.errors.len()
            );
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}
