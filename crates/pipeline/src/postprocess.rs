//! Deterministic clean-up of generated text: house terminology and the
//! emoji allow-list.

use std::collections::HashMap;

use regex::{Captures, Regex, RegexBuilder};

use cg_domain::config::PostprocessConfig;
use cg_domain::error::{Error, Result};
use cg_domain::topic::Topic;

use crate::text;

const MASK_OPEN: char = '\u{E000}';
const MASK_CLOSE: char = '\u{E001}';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Terminology
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Phrase → replacement table compiled into one alternation, so every
/// position is rewritten at most once.
pub struct TerminologyRules {
    pattern: Option<Regex>,
    replacements: HashMap<String, String>,
    protected: Option<Regex>,
}

impl TerminologyRules {
    pub fn new(rules: &[(String, String)], protected: &[String]) -> Result<Self> {
        let mut phrases: Vec<&(String, String)> =
            rules.iter().filter(|(p, _)| !p.trim().is_empty()).collect();
        // Longest first so "turkish bath house" beats "turkish bath".
        phrases.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let pattern = alternation(phrases.iter().map(|(p, _)| p.as_str()))?;
        let replacements = phrases
            .iter()
            .map(|(p, r)| (p.to_lowercase(), r.clone()))
            .collect();
        let protected = alternation(protected.iter().map(String::as_str))?;

        Ok(Self {
            pattern,
            replacements,
            protected,
        })
    }

    pub fn from_config(config: &PostprocessConfig) -> Result<Self> {
        let rules: Vec<(String, String)> = config
            .terminology
            .iter()
            .map(|r| (r.phrase.clone(), r.replacement.clone()))
            .collect();
        Self::new(&rules, &config.protected)
    }

    pub fn apply(&self, input: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return input.to_owned();
        };

        let mut saved: Vec<String> = Vec::new();
        let masked = match &self.protected {
            Some(protected) => protected
                .replace_all(input, |caps: &Captures| {
                    saved.push(caps[0].to_owned());
                    format!("{MASK_OPEN}{}{MASK_CLOSE}", saved.len() - 1)
                })
                .into_owned(),
            None => input.to_owned(),
        };

        let replaced = pattern.replace_all(&masked, |caps: &Captures| {
            let found = &caps[0];
            match self.replacements.get(&found.to_lowercase()) {
                Some(replacement) => match_case(found, replacement),
                None => found.to_owned(),
            }
        });

        restore(&replaced, &saved)
    }
}

fn alternation<'a>(phrases: impl Iterator<Item = &'a str>) -> Result<Option<Regex>> {
    let escaped: Vec<String> = phrases
        .filter(|p| !p.trim().is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(&format!(r"\b(?:{})\b", escaped.join("|")))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| Error::Config(format!("postprocess rules: {e}")))
}

/// Carry the capitalization of `found` over to `replacement`.
fn match_case(found: &str, replacement: &str) -> String {
    let letters: Vec<char> = found.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if found.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_owned()
}

fn restore(text: &str, saved: &[String]) -> String {
    if saved.is_empty() {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(MASK_OPEN) {
        out.push_str(&rest[..open]);
        let after = &rest[open + MASK_OPEN.len_utf8()..];
        let Some(close) = after.find(MASK_CLOSE) else {
            out.push_str(&rest[open..]);
            return out;
        };
        match after[..close].parse::<usize>().ok().and_then(|i| saved.get(i)) {
            Some(original) => out.push_str(original),
            None => out.push_str(&rest[open..open + MASK_OPEN.len_utf8() + close + MASK_CLOSE.len_utf8()]),
        }
        rest = &after[close + MASK_CLOSE.len_utf8()..];
    }
    out.push_str(rest);
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Emoji
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Strips every emoji, then appends at most one chosen by topic.
pub struct EmojiFilter {
    by_topic: HashMap<String, String>,
}

impl EmojiFilter {
    pub fn new(by_topic: HashMap<String, String>) -> Self {
        Self { by_topic }
    }

    pub fn apply(&self, input: &str, topic: Option<Topic>) -> String {
        let stripped = text::strip_emoji(input);
        match topic.and_then(|t| self.by_topic.get(t.as_str())) {
            Some(emoji) if !stripped.is_empty() => format!("{stripped} {emoji}"),
            _ => stripped,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Post-processor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct PostProcessor {
    terminology: TerminologyRules,
    emoji: EmojiFilter,
}

impl PostProcessor {
    pub fn new(terminology: TerminologyRules, emoji: EmojiFilter) -> Self {
        Self { terminology, emoji }
    }

    pub fn from_config(config: &PostprocessConfig) -> Result<Self> {
        Ok(Self::new(
            TerminologyRules::from_config(config)?,
            EmojiFilter::new(config.topic_emoji.clone()),
        ))
    }

    pub fn normalize(&self, input: &str, topic: Option<Topic>) -> String {
        let rewritten = self.terminology.apply(input.trim());
        self.emoji.apply(&rewritten, topic)
    }
}
