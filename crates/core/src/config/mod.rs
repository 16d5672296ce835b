//! Configuration loading and schema definitions
//!
//! Shared configuration types used by the adapters and the CLI.

#![allow(missing_docs)]

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
