//! Shared types for the Concierge support pipeline.
//!
//! Everything that crosses a crate boundary lives here: languages, topics,
//! knowledge matches, prompt bundles, the error taxonomy, structured trace
//! events and the TOML configuration.

pub mod config;
pub mod error;
pub mod knowledge;
pub mod language;
pub mod prompt;
pub mod scenario;
pub mod topic;
pub mod trace;
