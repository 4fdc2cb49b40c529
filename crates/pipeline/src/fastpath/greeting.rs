//! Exact greetings. The whole normalized message must be a greeting,
//! optionally followed by a returning marker; anything more is a question
//! and goes on down the pipeline.

use cg_domain::topic::Topic;
use cg_sessions::ContextUpdate;

use super::canned::{self, GREETING, RETURNING_GREETING, WELCOME};
use super::pool::{pick, Pool};
use super::{Detector, DetectorInput, FastPathMatch};

const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "hiya", "howdy", "heya", "hi there", "hello there", "hey there",
    "greetings", "good morning", "good afternoon", "good evening", "morning", "evening",
    "hola", "buenas", "holi", "saludos", "ola", "hola buenas", "muy buenas", "buenos dias",
    "buenas tardes", "buenas noches", "hola que tal", "hola hola",
];

const RETURNING_MARKERS: &[&str] = &[
    "again", "im back", "i am back", "back", "once more", "de nuevo", "otra vez", "de vuelta",
    "ya estoy aqui", "he vuelto",
];

pub struct GreetingDetector {
    venue: String,
}

impl GreetingDetector {
    pub fn new(venue: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
        }
    }
}

/// Strip one trailing returning marker. Returns the remainder and whether a
/// marker was removed.
fn split_marker(folded: &str) -> (&str, bool) {
    for marker in RETURNING_MARKERS {
        if let Some(rest) = folded.strip_suffix(marker) {
            if rest.is_empty() {
                return (folded, false);
            }
            if let Some(rest) = rest.strip_suffix(' ') {
                return (rest, true);
            }
        }
    }
    (folded, false)
}

impl Detector for GreetingDetector {
    fn name(&self) -> &'static str {
        "greeting"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        let (greeting, marked) = split_marker(&input.folded);
        if !GREETINGS.contains(&greeting) {
            return None;
        }

        let flags = &input.session.flags;
        let (category, pool): (&'static str, &Pool) = if marked {
            ("returning_greeting", &RETURNING_GREETING)
        } else if flags.conversation_started {
            ("greeting", &GREETING)
        } else {
            ("welcome", &WELCOME)
        };

        let response = pick(pool, input.language, &input.recent_responses(), |t| {
            canned::fill(t, &self.venue, "")
        });
        Some(FastPathMatch {
            detector: self.name(),
            category,
            topic: Topic::SmallTalk,
            response,
            update: ContextUpdate {
                topic: Some(Topic::SmallTalk),
                start_conversation: true,
                ..Default::default()
            },
        })
    }
}
