use serde::{Deserialize, Serialize};
use std::fmt;

/// A conversation language.
///
/// `Unknown` is the value a session holds before any evidence arrives; it is
/// never produced by the classifier as a final answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "en", alias = "english")]
    English,
    #[serde(rename = "es", alias = "spanish")]
    Spanish,
}

impl Language {
    /// The languages the pipeline can answer in, in tie-break order.
    pub const SUPPORTED: [Language; 2] = [Language::English, Language::Spanish];

    pub fn code(self) -> &'static str {
        match self {
            Language::Unknown => "unknown",
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn is_known(self) -> bool {
        self != Language::Unknown
    }

    /// `Some(self)` when known, `None` for `Unknown`.
    pub fn known(self) -> Option<Language> {
        self.is_known().then_some(self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How the classifier arrived at its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageConfidence {
    /// A strong-evidence signal fired for the language.
    Strong,
    /// No decisive evidence; the session's established language was kept.
    Session,
    /// No evidence and no session language; the configured default was used.
    Default,
}

impl LanguageConfidence {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageConfidence::Strong => "strong",
            LanguageConfidence::Session => "session",
            LanguageConfidence::Default => "default",
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub detected: Language,
    pub confidence: LanguageConfidence,
}
