use serde::{Deserialize, Serialize};

/// Per-section report within a prompt build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionReport {
    pub name: String,
    pub raw_chars: usize,
    pub injected_chars: usize,
    pub truncated_per_section: bool,
    pub truncated_total_cap: bool,
    pub included: bool,
}

/// What went into a generated prompt, logged at debug level per turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptReport {
    pub sections: Vec<SectionReport>,
    pub knowledge_items: usize,
    pub history_turns: usize,
    pub total_system_chars: usize,
}
