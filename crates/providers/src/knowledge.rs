//! File-backed knowledge source.
//!
//! The knowledge file is a JSON array of entries:
//!
//! ```json
//! [{ "topic": "packages", "name": "Hammam Ritual",
//!    "keywords": ["hammam", "ritual"], "content": { "duration": "90 minutes" } }]
//! ```
//!
//! An entry matches when any of its keywords occurs in the message as a
//! whole word or phrase. Matches are ordered by how many keywords hit.

use std::path::Path;

use serde::Deserialize;

use cg_domain::error::{Error, Result};
use cg_domain::knowledge::KnowledgeMatch;
use cg_domain::topic::Topic;

use crate::traits::KnowledgeSource;

const MAX_MATCHES: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: Topic,
    /// Display name, required for package entries.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct StaticKnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl StaticKnowledgeBase {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut e| {
                e.keywords = e.keywords.iter().map(|k| k.trim().to_lowercase()).collect();
                e.keywords.retain(|k| !k.is_empty());
                e
            })
            .collect();
        Self { entries }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(entries))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("knowledge file {}: {e}", path.display()))
        })?;
        let kb = Self::from_json(&raw)?;
        tracing::info!(entries = kb.len(), path = %path.display(), "knowledge base loaded");
        Ok(kb)
    }

    /// Load from `path` if set, otherwise start empty.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::empty()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KnowledgeSource for StaticKnowledgeBase {
    fn lookup(&self, message: &str) -> Vec<KnowledgeMatch> {
        let haystack = message.to_lowercase();
        let mut scored: Vec<(usize, &KnowledgeEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let hits = entry
                    .keywords
                    .iter()
                    .filter(|k| contains_phrase(&haystack, k))
                    .count();
                (hits > 0).then_some((hits, entry))
            })
            .collect();

        // Stable: equal scores keep file order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(MAX_MATCHES)
            .map(|(_, entry)| {
                let mut content = entry.content.clone();
                if let (Some(name), Some(obj)) = (&entry.name, content.as_object_mut()) {
                    obj.entry("name")
                        .or_insert_with(|| serde_json::Value::String(name.clone()));
                }
                KnowledgeMatch::new(entry.topic, content)
            })
            .collect()
    }

    fn package_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.topic == Topic::Packages)
            .filter_map(|e| e.name.clone())
            .collect()
    }
}

/// Whole-word containment: `needle` must not be glued to alphanumerics on
/// either side.
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}
