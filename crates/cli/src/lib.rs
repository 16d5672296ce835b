//! Terminal output helpers for the Clubhouse command-line tools
//!
//! Provides shared CLI functionality:
//! - Text or JSON output selection
//! - Status messages and simple tables
//! - Spinners while a request is in flight

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
