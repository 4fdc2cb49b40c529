use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::language::Language;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response cache
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "d_true")]
    pub enabled: bool,
    #[serde(default = "d_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: d_ttl(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Language
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Used when a message carries no evidence and the session has no
    /// language yet.
    #[serde(default = "d_language")]
    pub default: Language,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: d_language(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Venue
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Facts about the venue injected into prompts and canned replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    #[serde(default = "d_venue_name")]
    pub name: String,
    /// IANA timezone used for local date/time and season.
    #[serde(default = "d_timezone")]
    pub timezone: String,
    /// Phone number quoted in safety and escalation replies.
    #[serde(default = "d_phone")]
    pub phone: String,
    /// Seed for every new session's sold-out flag.
    #[serde(default)]
    pub sold_out: bool,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            name: d_venue_name(),
            timezone: d_timezone(),
            phone: d_phone(),
            sold_out: false,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Knowledge
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Paths of the per-language knowledge files.  A missing path yields an
/// empty knowledge source for that language.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub english_path: Option<PathBuf>,
    #[serde(default)]
    pub spanish_path: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Post-processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminologyRule {
    pub phrase: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostprocessConfig {
    /// Applied in a single pass; longer phrases win over their prefixes.
    #[serde(default = "d_terminology")]
    pub terminology: Vec<TerminologyRule>,
    /// Terms that must come out of post-processing untouched.
    #[serde(default)]
    pub protected: Vec<String>,
    /// Trailing emoji per topic (keys are topic names, e.g. `"ritual"`).
    #[serde(default = "d_topic_emoji")]
    pub topic_emoji: HashMap<String, String>,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            terminology: d_terminology(),
            protected: Vec::new(),
            topic_emoji: d_topic_emoji(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_true() -> bool {
    true
}
fn d_ttl() -> u64 {
    1_800
}
fn d_language() -> Language {
    Language::English
}
fn d_venue_name() -> String {
    "Concierge Spa".into()
}
fn d_timezone() -> String {
    "Europe/Madrid".into()
}
fn d_phone() -> String {
    "+34 900 000 000".into()
}
fn d_terminology() -> Vec<TerminologyRule> {
    [
        ("turkish bath", "hammam"),
        ("steam bath", "hammam"),
        ("spa treatment", "ritual"),
        ("baño turco", "hammam"),
    ]
    .into_iter()
    .map(|(phrase, replacement)| TerminologyRule {
        phrase: phrase.into(),
        replacement: replacement.into(),
    })
    .collect()
}
fn d_topic_emoji() -> HashMap<String, String> {
    [("ritual", "🌿"), ("packages", "✨"), ("dining", "🍵")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
