//! Message normalization shared by every detector.

use std::sync::LazyLock;

use regex::Regex;

/// Whole-token emoticons such as `:)`, `;-P`, `<3`, `^_^`, `xD`.
static EMOTICON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[:;=8][-'^o]?[()\[\]dpo3/\\|*$@]+|[xX][dD]+|<3+|\^_?\^|[()]+[:;=])$")
        .expect("valid regex")
});

/// Pictographs, dingbats, flags, variation selectors and joiners.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x2B00..=0x2BFF
            | 0x2300..=0x23FF
            | 0xFE0E..=0xFE0F
            | 0x200D
            | 0x20E3
            | 0xE0020..=0xE007F
    )
}

/// Remove every emoji, leaving the rest of the text untouched apart from
/// whitespace runs created by the removal. Line breaks survive.
pub fn strip_emoji(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_emoji(*c)).collect();
    stripped
        .lines()
        .map(collapse_whitespace)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form used for vocabulary matching and cache keys.
///
/// Case-folds, drops emoticon tokens, emoji and punctuation, squeezes runs
/// of three or more identical characters to one (`hellooo` → `hello`) and
/// collapses whitespace. Apostrophes are removed so `what's` → `whats`.
pub fn normalize_message(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for token in lowered.split_whitespace() {
        if EMOTICON_RE.is_match(token) {
            continue;
        }
        for c in token.chars() {
            if c == '\'' || c == '’' {
                continue;
            }
            if c.is_alphanumeric() {
                cleaned.push(c);
            } else {
                cleaned.push(' ');
            }
        }
        cleaned.push(' ');
    }
    collapse_whitespace(&squeeze_repeats(&cleaned))
}

/// Runs of three or more of the same character become one.
fn squeeze_repeats(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        let keep = if run >= 3 { 1 } else { run };
        for _ in 0..keep {
            out.push(c);
        }
        i += run;
    }
    out
}

/// Drop Spanish acute accents and diaeresis so `qué tal` matches `que tal`.
/// `ñ` is a distinct letter and stays.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Whole-word containment: `needle` must not be glued to alphanumerics on
/// either side.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    find_phrase(haystack, needle).is_some()
}

/// Byte offset of the first whole-word occurrence of `needle`.
pub fn find_phrase(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
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
            return Some(begin);
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// True when any phrase in `phrases` occurs in `haystack` as whole words.
pub fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(haystack, p))
}

/// The longest phrase from `phrases` that occurs in `haystack`.
pub fn longest_match<'p>(haystack: &str, phrases: &[&'p str]) -> Option<&'p str> {
    phrases
        .iter()
        .copied()
        .filter(|p| contains_phrase(haystack, p))
        .max_by_key(|p| p.chars().count())
}

const STOP_WORDS: &[&str] = &[
    // English
    "about", "after", "again", "also", "been", "before", "being", "could", "does", "doing",
    "from", "have", "having", "here", "into", "just", "like", "more", "much", "need", "only",
    "other", "please", "should", "some", "such", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "those", "very", "want", "were", "what", "when",
    "where", "which", "while", "will", "with", "would", "your", "yours", "whats", "thanks",
    "thank", "hello",
    // Spanish
    "algo", "ante", "antes", "como", "cómo", "con", "cual", "cuál", "cuando", "cuándo",
    "desde", "donde", "dónde", "esta", "está", "este", "esto", "estos", "estas", "hola",
    "hasta", "hacer", "mucho", "muy", "nada", "nosotros", "para", "pero", "poco", "porque",
    "puede", "puedo", "quiero", "quisiera", "sobre", "también", "tengo", "tiene", "todo",
    "una", "unas", "unos", "gracias", "favor", "vuestro", "vuestra",
];

/// Words longer than three characters that are not stop-words.
pub fn content_words(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .collect()
}

/// Pure digits, or a token mixing digits with letters or separators
/// (`AB-1234`, `x9f3`, `12/05`). These carry no language evidence.
pub fn is_identifier_like(token: &str) -> bool {
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    has_digit || token.contains('@') || token.starts_with("http")
}
