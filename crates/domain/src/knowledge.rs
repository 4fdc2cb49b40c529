use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// A factual snippet returned by a knowledge source.
///
/// `content` is opaque to the pipeline: it is serialized into the prompt and
/// scanned for message words when scoring confidence.  `priority` and
/// `duration_override` are annotations added by the context filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMatch {
    pub topic: Topic,
    pub content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_override: Option<String>,
}

impl KnowledgeMatch {
    pub fn new(topic: Topic, content: serde_json::Value) -> Self {
        Self {
            topic,
            content,
            priority: None,
            duration_override: None,
        }
    }

    /// Lowercased serialized content, used for word-overlap scoring.
    pub fn searchable_text(&self) -> String {
        match &self.content {
            serde_json::Value::String(s) => s.to_lowercase(),
            other => other.to_string().to_lowercase(),
        }
    }
}
