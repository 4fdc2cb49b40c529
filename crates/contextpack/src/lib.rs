//! Prompt assembly for the generation delegate.
//!
//! Pure functions only: callers pass already-gathered facts, knowledge and
//! history; the builder returns a capped [`cg_domain::prompt::PromptBundle`]
//! plus a machine-readable report of what was kept.

pub mod budget;
pub mod builder;
pub mod injection;
pub mod report;
pub mod style;
pub mod truncation;

pub use budget::{classify_complexity, Complexity};
pub use builder::{PromptBuilder, PromptInputs, VenueFacts};
pub use report::{PromptReport, SectionReport};
