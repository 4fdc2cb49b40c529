//! Ordered chain of deterministic detectors that can answer a message
//! without retrieval or generation.
//!
//! Detectors only read the session snapshot. The winning detector hands back
//! a [`ContextUpdate`]; the orchestrator applies it in one step together with
//! the exchange itself.

pub mod acknowledgment;
pub mod canned;
pub mod greeting;
pub mod pool;
pub mod safety;
pub mod scenario;
pub mod small_talk;

use cg_domain::language::Language;
use cg_domain::topic::Topic;
use cg_sessions::{ContextUpdate, SessionContext};

use crate::text;

pub use acknowledgment::AcknowledgmentDetector;
pub use greeting::GreetingDetector;
pub use safety::SafetyDetector;
pub use scenario::{ArrivalDelayDetector, BookingModificationDetector};
pub use small_talk::SmallTalkDetector;

/// How many of the session's latest replies a pool avoids repeating.
pub const REPEAT_WINDOW: usize = 3;

/// Everything a detector may look at.
pub struct DetectorInput<'a> {
    /// Raw guest text.
    pub message: &'a str,
    /// [`text::normalize_message`] output.
    pub normalized: &'a str,
    /// `normalized` with accents folded, for vocabulary lookups.
    pub folded: String,
    /// Language resolved for this message.
    pub language: Language,
    pub session: &'a SessionContext,
}

impl<'a> DetectorInput<'a> {
    pub fn new(
        message: &'a str,
        normalized: &'a str,
        language: Language,
        session: &'a SessionContext,
    ) -> Self {
        Self {
            message,
            normalized,
            folded: text::fold_accents(normalized),
            language,
            session,
        }
    }

    pub fn recent_responses(&self) -> Vec<&'a str> {
        self.session.recent_responses().take(REPEAT_WINDOW).collect()
    }

    pub fn token_count(&self) -> usize {
        self.folded.split_whitespace().count()
    }

    pub fn is_question(&self) -> bool {
        self.message.contains('?') || self.message.contains('¿')
    }
}

/// A resolved fast-path reply.
#[derive(Debug, Clone, PartialEq)]
pub struct FastPathMatch {
    pub detector: &'static str,
    pub category: &'static str,
    pub topic: Topic,
    pub response: String,
    /// State change owed to the session when this match is used.
    pub update: ContextUpdate,
}

pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` means "not mine". Detectors never fail.
    fn detect(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch>;
}

pub struct FastPathChain {
    detectors: Vec<Box<dyn Detector>>,
}

impl FastPathChain {
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Priority order: urgent scenarios, exact greetings, booking changes,
    /// small talk, acknowledgments.
    pub fn standard(venue_name: &str, venue_phone: &str) -> Self {
        Self::new(vec![
            Box::new(SafetyDetector::new(venue_phone)),
            Box::new(ArrivalDelayDetector),
            Box::new(GreetingDetector::new(venue_name)),
            Box::new(BookingModificationDetector),
            Box::new(SmallTalkDetector::new(venue_name)),
            Box::new(AcknowledgmentDetector),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// First detector to match wins.
    pub fn evaluate(&self, input: &DetectorInput<'_>) -> Option<FastPathMatch> {
        self.detectors.iter().find_map(|d| d.detect(input))
    }
}

/// Whole-word vocabulary match over folded text, honouring a token cap of
/// `phrase tokens + slack`.
pub(crate) fn match_phrase<'p>(
    folded: &str,
    phrases: &[&'p str],
    slack: usize,
) -> Option<&'p str> {
    let count = folded.split_whitespace().count();
    phrases
        .iter()
        .copied()
        .filter(|p| text::contains_phrase(folded, p))
        .filter(|p| count <= p.split_whitespace().count() + slack)
        .max_by_key(|p| p.len())
}
