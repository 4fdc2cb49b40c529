use cg_domain::language::Language;
use cg_domain::topic::Topic;
use cg_sessions::ContextUpdate;

use super::canned::{self, IDENTITY, MEETING, RETURNING, WELLBEING};
use super::pool::{pick, Pool};
use super::{match_phrase, Detector, DetectorInput, FastPathMatch};

/// Extra tokens tolerated around a small-talk phrase ("hi, how are you today").
const SLACK: usize = 2;

struct Category {
    name: &'static str,
    en: &'static [&'static str],
    es: &'static [&'static str],
    pool: &'static Pool,
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "wellbeing",
        en: &[
            "how are you", "how are you doing", "hows it going", "how is it going",
            "how is your day", "hows your day", "how have you been", "you ok", "are you well",
        ],
        es: &[
            "que tal", "como estas", "como esta", "como va", "como va todo", "que tal estas",
            "como te va", "todo bien",
        ],
        pool: &WELLBEING,
    },
    Category {
        name: "identity",
        en: &[
            "who are you", "what are you", "are you a bot", "are you a robot", "are you human",
            "are you real", "am i talking to a bot", "is this a bot", "whats your name",
        ],
        es: &[
            "quien eres", "eres un bot", "eres un robot", "eres humano", "eres una persona",
            "con quien hablo", "eres real", "como te llamas",
        ],
        pool: &IDENTITY,
    },
    Category {
        name: "meeting",
        en: &["nice to meet you", "pleased to meet you", "good to meet you", "lovely to meet you"],
        es: &["mucho gusto", "encantado", "encantada", "un placer", "encantado de conocerte"],
        pool: &MEETING,
    },
    Category {
        name: "returning",
        en: &["im back", "i am back", "back again", "its me again"],
        es: &["ya estoy aqui", "he vuelto", "ya volvi", "soy yo otra vez", "ya estoy de vuelta"],
        pool: &RETURNING,
    },
];

pub struct SmallTalkDetector {
    venue: String,
}

impl SmallTalkDetector {
    pub fn new(venue: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
        }
    }
}

impl Detector for SmallTalkDetector {
    fn name(&self) -> &'static str {
        "small_talk"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        let category = CATEGORIES.iter().find(|c| {
            let hit = |phrases: &[&str]| match_phrase(&input.folded, phrases, SLACK).is_some();
            match input.language {
                Language::English => hit(c.en),
                Language::Spanish => hit(c.es),
                Language::Unknown => hit(c.en) || hit(c.es),
            }
        })?;

        let response = pick(category.pool, input.language, &input.recent_responses(), |t| {
            canned::fill(t, &self.venue, "")
        });
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastpath::test_support::fresh_session;
    use crate::text;

    fn category(message: &str, language: Language) -> Option<&'static str> {
        let session = fresh_session();
        let normalized = text::normalize_message(message);
        SmallTalkDetector::new("Aire Spa")
            .detect(&DetectorInput::new(message, &normalized, language, &session))
            .map(|m| m.category)
    }

    #[test]
    fn categories_per_language() {
        assert_eq!(category("How are you?", Language::English), Some("wellbeing"));
        assert_eq!(category("¿Qué tal?", Language::Spanish), Some("wellbeing"));
        assert_eq!(category("Are you a bot?", Language::English), Some("identity"));
        assert_eq!(category("¿Quién eres?", Language::Spanish), Some("identity"));
        assert_eq!(category("nice to meet you!", Language::English), Some("meeting"));
        assert_eq!(category("I'm back", Language::English), Some("returning"));
    }

    #[test]
    fn identity_names_the_venue() {
        let session = fresh_session();
        let message = "who are you?";
        let normalized = text::normalize_message(message);
        let hit = SmallTalkDetector::new("Aire Spa")
            .detect(&DetectorInput::new(message, &normalized, Language::English, &session))
            .unwrap();
        assert!(hit.response.contains("Aire Spa"));
    }

    #[test]
    fn scoped_to_resolved_language() {
        assert_eq!(category("que tal", Language::English), None);
        assert_eq!(category("que tal", Language::Unknown), Some("wellbeing"));
    }

    #[test]
    fn longer_questions_are_not_small_talk() {
        assert_eq!(
            category("how are you handling bookings for groups of ten", Language::English),
            None
        );
        assert_eq!(
            category("que tal es el ritual de chocolate para parejas", Language::Spanish),
            None
        );
    }
}
