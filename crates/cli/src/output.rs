//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt;

/// How a command prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

impl OutputFormat {
    /// Whether JSON was requested
    #[must_use]
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a label and its value, aligned
    pub fn field(label: &str, value: impl fmt::Display) {
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }

    /// Print a list item
    pub fn item(message: &str) {
        println!("  • {message}");
    }
}

/// Format a count with singular/plural
#[must_use]
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Show `value`, or a dimmed dash when it is missing
#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "entry", "entries"), "1 entry");
        assert_eq!(format_count(0, "entry", "entries"), "0 entries");
    }

    #[test]
    fn test_or_dash_keeps_values() {
        assert_eq!(or_dash(Some("Arena")), "Arena");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("json", true), Ok(OutputFormat::Json));
        assert!(OutputFormat::from_str("yaml", true).is_err());
        assert_eq!(OutputFormat::default().to_string(), "text");
    }
}
