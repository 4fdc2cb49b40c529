//! Language classification from layered strong-evidence signals.
//!
//! 1. Collect strong signals per language (diacritics, function words,
//!    phrases, greeting tokens). Numbers, identifier-like tokens and emoji
//!    never contribute.
//! 2. Exactly one language firing wins outright. If both fire, the one with
//!    the longest matched pattern wins, then the one with more matches.
//! 3. Otherwise the session's prior language is kept.
//! 4. Otherwise the configured default applies.

pub mod signals;

use cg_domain::language::{Language, LanguageConfidence, LanguageDetection};

use crate::text;
use signals::{SignalTable, TABLES};

/// What fired for one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalHits {
    pub patterns: Vec<String>,
    /// Character length of the longest matched pattern.
    pub longest: usize,
}

impl SignalHits {
    fn record(&mut self, pattern: &str) {
        self.longest = self.longest.max(pattern.chars().count());
        self.patterns.push(pattern.to_owned());
    }

    pub fn fired(&self) -> bool {
        !self.patterns.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LanguageClassifier {
    default: Language,
}

impl LanguageClassifier {
    pub fn new(default: Language) -> Self {
        let default = if default.is_known() {
            default
        } else {
            Language::English
        };
        Self { default }
    }

    pub fn default_language(&self) -> Language {
        self.default
    }

    pub fn classify(&self, message: &str, prior: Language) -> LanguageDetection {
        let evidence = collect_evidence(message);

        let firing: Vec<&(Language, SignalHits)> =
            evidence.iter().filter(|(_, hits)| hits.fired()).collect();

        let strong = match firing.as_slice() {
            [(lang, _)] => Some(*lang),
            [(a, ha), (b, hb)] => break_tie(*a, ha, *b, hb),
            _ => None,
        };

        if let Some(lang) = strong {
            return LanguageDetection {
                detected: lang,
                confidence: LanguageConfidence::Strong,
            };
        }
        if prior.is_known() {
            return LanguageDetection {
                detected: prior,
                confidence: LanguageConfidence::Session,
            };
        }
        LanguageDetection {
            detected: self.default,
            confidence: LanguageConfidence::Default,
        }
    }
}

/// Longest pattern first, then match count. A full tie is no evidence.
fn break_tie(a: Language, ha: &SignalHits, b: Language, hb: &SignalHits) -> Option<Language> {
    use std::cmp::Ordering;
    match ha
        .longest
        .cmp(&hb.longest)
        .then(ha.patterns.len().cmp(&hb.patterns.len()))
    {
        Ordering::Greater => Some(a),
        Ordering::Less => Some(b),
        Ordering::Equal => None,
    }
}

/// Evidence per supported language, in table order.
pub fn collect_evidence(message: &str) -> Vec<(Language, SignalHits)> {
    let lowered = message.to_lowercase();

    // Tokens that can carry evidence: identifiers, numbers and emoji-only
    // tokens are dropped before anything else looks at the text.
    let words: Vec<String> = lowered
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '¿' && c != '¡'))
        .filter(|t| !t.is_empty() && !text::is_identifier_like(t))
        .map(str::to_owned)
        .collect();
    let normalized = text::normalize_message(&words.join(" "));
    let tokens = text::tokens(&normalized);

    TABLES
        .iter()
        .map(|table| (table.language, hits_for(table, &words, &normalized, &tokens)))
        .collect()
}

fn hits_for(table: &SignalTable, words: &[String], normalized: &str, tokens: &[&str]) -> SignalHits {
    let mut hits = SignalHits::default();

    for word in words {
        if word.chars().any(|c| table.diacritics.contains(&c)) {
            hits.record(word);
        }
    }
    for token in tokens {
        if table.words.contains(token) || table.greetings.contains(token) {
            hits.record(token);
        }
    }
    for phrase in table.phrases {
        if text::contains_phrase(normalized, phrase) {
            hits.record(phrase);
        }
    }
    hits
}
