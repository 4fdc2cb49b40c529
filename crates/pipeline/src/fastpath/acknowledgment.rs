//! Acknowledgments and sign-offs.
//!
//! Never fires on a question or a request: a question mark, or an
//! interrogative or request token outside the matched phrase, sends the
//! message on to retrieval. Simple acknowledgments (thanks, positive,
//! continuity) are capped at four tokens; endings and praise at six.

use cg_domain::topic::Topic;
use cg_sessions::ContextUpdate;

use super::canned::{CONTINUITY, ENDING, POSITIVE, PRAISE, THANKS};
use super::pool::{pick_plain, Pool};
use super::{Detector, DetectorInput, FastPathMatch};
use crate::text;

const SIMPLE_CAP: usize = 4;
const DEFAULT_CAP: usize = 6;

const INTERROGATIVES: &[&str] = &[
    "what", "when", "where", "how", "which", "who", "why", "can", "could", "do", "does", "is",
    "are", "would", "should", "que", "cuando", "donde", "como", "cual", "quien", "cuanto",
    "cuanta", "puedo", "puedes", "podemos", "hay", "tienen", "teneis",
];

/// Request verbs that turn "ok, I need ..." into a real question.
const REQUESTS: &[&str] = &[
    "need", "want", "wanted", "like", "looking", "tell", "give", "send", "book", "reserve",
    "show", "info", "information", "necesito", "quiero", "quisiera", "queria", "gustaria",
    "busco", "dime", "dame", "manda", "envia", "reservar", "informacion",
];

struct Category {
    name: &'static str,
    phrases: &'static [&'static str],
    cap: usize,
    pool: &'static Pool,
}

/// Checked in order; the first category with a phrase present wins.
const CATEGORIES: &[Category] = &[
    Category {
        name: "ending",
        phrases: &[
            "bye", "goodbye", "bye bye", "see you", "see you later", "see you soon", "thats all",
            "that is all", "nothing else", "have a nice day", "have a good day", "adios", "chao",
            "chau", "hasta luego", "hasta pronto", "nos vemos", "eso es todo", "nada mas",
            "buen dia",
        ],
        cap: DEFAULT_CAP,
        pool: &ENDING,
    },
    Category {
        name: "praise",
        phrases: &[
            "you are great", "youre great", "you are the best", "youre the best", "amazing",
            "awesome", "great job", "well done", "so helpful", "very helpful", "eres genial",
            "eres el mejor", "sois geniales", "increible", "muy amable", "que amable",
        ],
        cap: DEFAULT_CAP,
        pool: &PRAISE,
    },
    Category {
        name: "thanks",
        phrases: &[
            "thanks", "thank you", "thx", "ty", "cheers", "many thanks", "thanks a lot",
            "gracias", "muchas gracias", "mil gracias",
        ],
        cap: SIMPLE_CAP,
        pool: &THANKS,
    },
    Category {
        name: "positive",
        phrases: &[
            "perfect", "great", "excellent", "sounds good", "sounds great", "lovely", "wonderful",
            "fantastic", "perfecto", "genial", "excelente", "estupendo", "me parece bien",
            "fenomenal", "maravilloso", "que bien",
        ],
        cap: SIMPLE_CAP,
        pool: &POSITIVE,
    },
    Category {
        name: "continuity",
        phrases: &[
            "ok", "okay", "okey", "got it", "i see", "understood", "alright", "all right", "noted",
            "entendido", "vale", "de acuerdo", "ya veo", "entiendo", "okis", "oki",
        ],
        cap: SIMPLE_CAP,
        pool: &CONTINUITY,
    },
];

pub struct AcknowledgmentDetector;

impl Detector for AcknowledgmentDetector {
    fn name(&self) -> &'static str {
        "acknowledgment"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        if input.is_question() {
            return None;
        }
        let count = input.token_count();
        let category = CATEGORIES.iter().find(|c| {
            count <= c.cap
                && c.phrases
                    .iter()
                    .any(|p| matches_standalone(&input.folded, p))
        })?;

        let response = pick_plain(category.pool, input.language, &input.recent_responses());
        Some(FastPathMatch {
            detector: self.name(),
            category: category.name,
            topic: Topic::SmallTalk,
            response,
            update: ContextUpdate {
                topic: Some(Topic::SmallTalk),
                ..Default::default()
            },
        })
    }
}

/// `phrase` occurs and nothing around it asks or requests anything.
fn matches_standalone(folded: &str, phrase: &str) -> bool {
    let Some(start) = text::find_phrase(folded, phrase) else {
        return false;
    };
    let before = &folded[..start];
    let after = &folded[start + phrase.len()..];
    !before
        .split_whitespace()
        .chain(after.split_whitespace())
        .any(|t| INTERROGATIVES.contains(&t) || REQUESTS.contains(&t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastpath::test_support::fresh_session;
    use cg_domain::language::Language;
    use cg_sessions::ContextUpdate;

    fn category(message: &str) -> Option<&'static str> {
        let session = fresh_session();
        let normalized = text::normalize_message(message);
        AcknowledgmentDetector
            .detect(&DetectorInput::new(message, &normalized, Language::English, &session))
            .map(|m| m.category)
    }

    #[test]
    fn categories() {
        assert_eq!(category("Thanks!"), Some("thanks"));
        assert_eq!(category("muchas gracias 😊"), Some("thanks"));
        assert_eq!(category("perfect"), Some("positive"));
        assert_eq!(category("ok got it"), Some("continuity"));
        assert_eq!(category("thanks, bye!"), Some("ending"));
        assert_eq!(category("you are the best"), Some("praise"));
        assert_eq!(category("vale"), Some("continuity"));
    }

    #[test]
    fn thanks_is_capped_at_four_tokens() {
        assert_eq!(category("thanks so much really"), Some("thanks"));
        assert_eq!(category("thanks for the info about massages"), None);
    }

    #[test]
    fn simple_acknowledgments_share_the_four_token_cap() {
        assert_eq!(category("ok got it thanks"), Some("thanks"));
        assert_eq!(category("okay sounds good"), Some("positive"));
        assert_eq!(category("ok i need the opening hours"), None);
        assert_eq!(category("perfect, i want the parking info"), None);
        assert_eq!(category("great see you tomorrow then"), Some("ending"));
    }

    #[test]
    fn requests_after_an_acknowledgment_reach_retrieval() {
        assert_eq!(category("ok i need parking"), None);
        assert_eq!(category("vale, quiero reservar"), None);
        assert_eq!(category("perfecto necesito factura"), None);
        assert_eq!(category("ok thanks"), Some("thanks"));
    }

    #[test]
    fn questions_are_never_acknowledgments() {
        assert_eq!(category("ok, what time do you open"), None);
        assert_eq!(category("great, and the price?"), None);
        assert_eq!(category("vale, cuanto cuesta"), None);
        assert_eq!(category("ok are you open sunday"), None);
    }

    #[test]
    fn avoids_repeating_previous_reply() {
        let mut session = fresh_session();
        let message = "thanks";
        let normalized = text::normalize_message(message);
        let first = AcknowledgmentDetector
            .detect(&DetectorInput::new(message, &normalized, Language::English, &session))
            .unwrap();
        session.apply(
            ContextUpdate {
                exchange: Some((message.into(), first.response.clone())),
                ..Default::default()
            },
            Default::default(),
            chrono::Utc::now(),
        );
        let second = AcknowledgmentDetector
            .detect(&DetectorInput::new(message, &normalized, Language::English, &session))
            .unwrap();
        assert_ne!(first.response, second.response);
    }
}
