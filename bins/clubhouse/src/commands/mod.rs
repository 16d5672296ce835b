//! CLI command implementations

pub mod cms;
pub mod tournament;
