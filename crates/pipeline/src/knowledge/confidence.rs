//! Retrieval confidence.

use cg_domain::knowledge::KnowledgeMatch;

use crate::text;

/// At or above this the retrieved knowledge is considered to cover the
/// question.
pub const KNOWN_THRESHOLD: f64 = 0.5;
/// Floor for short, acknowledgment-like messages.
pub const SHORT_MESSAGE_FLOOR: f64 = 0.1;
/// Fixed score for a multi-part question that hit several matches.
pub const MULTI_PART_CONFIDENCE: f64 = 0.85;
/// Messages of at most this many tokens count as short.
pub const SHORT_MESSAGE_TOKENS: usize = 3;

/// Highest share of the message's content words found in any match.
pub fn content_overlap(folded: &str, matches: &[KnowledgeMatch]) -> f64 {
    let words = text::content_words(folded);
    if words.is_empty() {
        return 0.0;
    }
    matches
        .iter()
        .map(|m| {
            let haystack = text::fold_accents(&m.searchable_text());
            let found = words.iter().filter(|w| haystack.contains(*w)).count();
            found as f64 / words.len() as f64
        })
        .fold(0.0, f64::max)
}

/// Number of question parts, counting `?` and `¿` separately and taking the
/// larger so `¿A? ¿B?` is two, not four.
pub fn question_parts(message: &str) -> usize {
    let closing = message.matches('?').count();
    let opening = message.matches('¿').count();
    closing.max(opening)
}

pub fn is_short(folded: &str) -> bool {
    folded.split_whitespace().count() <= SHORT_MESSAGE_TOKENS
}

/// Overlap adjusted by the short-message floor and the multi-part rule.
pub fn score(message: &str, folded: &str, matches: &[KnowledgeMatch]) -> f64 {
    let mut confidence = content_overlap(folded, matches);
    if is_short(folded) {
        confidence = confidence.max(SHORT_MESSAGE_FLOOR);
    }
    if question_parts(message) >= 2 && matches.len() >= 2 {
        confidence = confidence.max(MULTI_PART_CONFIDENCE);
    }
    confidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_domain::topic::Topic;
    use serde_json::json;

    fn m(topic: Topic, content: serde_json::Value) -> KnowledgeMatch {
        KnowledgeMatch::new(topic, content)
    }

    #[test]
    fn overlap_is_best_single_match() {
        let matches = vec![
            m(Topic::Hours, json!({"opening": "the spa opens at 10:00"})),
            m(Topic::Pricing, json!({"massage": "massage price 60 EUR"})),
        ];
        let c = content_overlap("massage price", &matches);
        assert!((c - 1.0).abs() < f64::EPSILON);
        let half = content_overlap("massage parking", &matches);
        assert!((half - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_content_words_scores_zero() {
        let matches = vec![m(Topic::Hours, json!("anything"))];
        assert_eq!(content_overlap("is it", &matches), 0.0);
    }

    #[test]
    fn short_messages_get_a_floor() {
        assert!((score("sauna?", "sauna", &[]) - SHORT_MESSAGE_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn two_part_question_is_confident() {
        let matches = vec![
            m(Topic::Hours, json!({"opening": "open from 10:00"})),
            m(Topic::Transportation, json!({"parking": "free parking"})),
        ];
        let message = "What time do you open on weekends? And is there valet parking nearby?";
        let folded = text::fold_accents(&text::normalize_message(message));
        assert!(content_overlap(&folded, &matches) < KNOWN_THRESHOLD);
        assert!(score(message, &folded, &matches) >= 0.8);
    }

    #[test]
    fn spanish_question_marks_count_once() {
        assert_eq!(question_parts("¿Abrís el lunes? ¿Y el martes?"), 2);
        assert_eq!(question_parts("¿Abrís el lunes?"), 1);
    }
}
