use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Speaker of a history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Guest,
    Assistant,
}

/// One line of conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Everything the completion service needs to answer one message.
///
/// `system` carries the assembled sections (style rules, venue facts,
/// knowledge, scenario context); `history` is the bounded recent transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptBundle {
    pub system: String,
    pub history: Vec<HistoryTurn>,
    pub user_message: String,
    pub language: Language,
}
