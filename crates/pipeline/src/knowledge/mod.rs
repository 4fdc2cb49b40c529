//! Knowledge retrieval and the session-aware context filter.

pub mod confidence;
pub mod followup;

use std::sync::Arc;

use cg_domain::knowledge::KnowledgeMatch;
use cg_domain::language::Language;
use cg_domain::topic::Topic;
use cg_domain::trace::TraceEvent;
use cg_providers::KnowledgeSource;
use cg_sessions::SessionContext;

use crate::fastpath::canned::{self, UNKNOWN_TOPIC};
use crate::fastpath::pool::pick;
use crate::text;

pub use confidence::KNOWN_THRESHOLD;

/// Priority given to matches the context filter promotes.
const CONTEXT_PRIORITY: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// Knowledge for the generation step. `matches` may be empty when the
    /// message is short or continues an earlier subject.
    Matches {
        matches: Vec<KnowledgeMatch>,
        confidence: f64,
        restricted_to: Option<Topic>,
    },
    /// Answered from session context. Never cached: the text depends on
    /// what this session talked about before.
    Contextual { text: String, topic: Topic },
    /// Nothing relevant and nothing to build on.
    UnknownTopic { response: String },
}

impl RetrievalOutcome {
    /// Topic to record on the session for this turn.
    pub fn topic(&self) -> Option<Topic> {
        match self {
            RetrievalOutcome::Matches {
                matches,
                restricted_to,
                ..
            } => restricted_to.or_else(|| matches.first().map(|m| m.topic)),
            RetrievalOutcome::Contextual { topic, .. } => Some(*topic),
            RetrievalOutcome::UnknownTopic { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    pub outcome: RetrievalOutcome,
    /// Package named in this message, to remember on the session.
    pub package: Option<String>,
    /// The outcome leaned on earlier turns (an anaphoric follow-up or a
    /// package remembered from before), so the same text may mean
    /// something else later in the conversation.
    pub depends_on_session: bool,
}

pub struct KnowledgeRetriever {
    english: Arc<dyn KnowledgeSource>,
    spanish: Arc<dyn KnowledgeSource>,
    phone: String,
}

impl KnowledgeRetriever {
    pub fn new(
        english: Arc<dyn KnowledgeSource>,
        spanish: Arc<dyn KnowledgeSource>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            english,
            spanish,
            phone: phone.into(),
        }
    }

    fn source(&self, language: Language) -> &dyn KnowledgeSource {
        match language {
            Language::Spanish => self.spanish.as_ref(),
            Language::English | Language::Unknown => self.english.as_ref(),
        }
    }

    pub fn retrieve(
        &self,
        message: &str,
        language: Language,
        session: &SessionContext,
    ) -> Retrieval {
        let source = self.source(language);
        let folded = text::fold_accents(&text::normalize_message(message));
        let package = named_package(&folded, &source.package_names());

        let active_topic = session.last_topic.filter(|t| !t.is_conversational());
        let follow_up = active_topic.filter(|_| followup::is_anaphoric(&folded));

        if let Some(topic) = follow_up {
            if followup::is_duration_question(&folded) && package.is_none() {
                if let Some(text) = self.duration_answer(source, topic, language, session) {
                    tracing::debug!(session_id = %session.id, topic = %topic, "contextual duration answer");
                    return Retrieval {
                        outcome: RetrievalOutcome::Contextual { text, topic },
                        package: None,
                        depends_on_session: true,
                    };
                }
            }
        }

        let mut matches = source.lookup(message);

        let mut restricted_to = None;
        if let Some(topic) = follow_up {
            let on_topic: Vec<KnowledgeMatch> =
                matches.iter().filter(|m| m.topic == topic).cloned().collect();
            if !on_topic.is_empty() {
                matches = on_topic
                    .into_iter()
                    .map(|mut m| {
                        m.priority = Some(CONTEXT_PRIORITY);
                        m
                    })
                    .collect();
                restricted_to = Some(topic);
            }
        }

        // Unqualified dining questions resolve against the package in play.
        let mut remembered_package = false;
        let package_in_play = package.clone().or_else(|| session.packages.current.clone());
        if let Some(name) = package_in_play.filter(|_| followup::is_dining_question(&folded)) {
            if let Some(mut hit) = package_match(source, &name) {
                matches.retain(|m| m.content != hit.content);
                hit.priority = Some(CONTEXT_PRIORITY);
                matches.insert(0, hit);
                remembered_package = package.is_none();
            }
        }

        let confidence = confidence::score(message, &folded, &matches);

        TraceEvent::KnowledgeRetrieved {
            session_id: session.id.clone(),
            matches: matches.len(),
            confidence,
            restricted_to_topic: restricted_to.map(|t| t.as_str().to_owned()),
        }
        .emit();

        let is_unknown = confidence == 0.0
            && matches.is_empty()
            && !confidence::is_short(&folded)
            && follow_up.is_none();
        if is_unknown {
            TraceEvent::UnknownTopic {
                session_id: session.id.clone(),
                language: language.code().to_owned(),
            }
            .emit();
            let response = pick(&UNKNOWN_TOPIC, language, &[], |t| {
                canned::fill(t, "", &self.phone)
            });
            return Retrieval {
                outcome: RetrievalOutcome::UnknownTopic { response },
                package,
                depends_on_session: false,
            };
        }

        Retrieval {
            outcome: RetrievalOutcome::Matches {
                matches,
                confidence,
                restricted_to,
            },
            package,
            depends_on_session: follow_up.is_some() || remembered_package,
        }
    }

    /// Package-specific when the session remembers a package and the
    /// subject is packages, otherwise the per-topic table.
    fn duration_answer(
        &self,
        source: &dyn KnowledgeSource,
        topic: Topic,
        language: Language,
        session: &SessionContext,
    ) -> Option<String> {
        if topic == Topic::Packages {
            if let Some(name) = &session.packages.current {
                let duration = package_match(source, name).and_then(|m| {
                    m.content
                        .get("duration")
                        .and_then(|d| d.as_str())
                        .map(str::to_owned)
                });
                if let Some(duration) = duration {
                    return Some(followup::package_duration(name, &duration, language));
                }
            }
        }
        followup::topic_duration(topic, language).map(str::to_owned)
    }
}

/// Longest package name mentioned in the message.
fn named_package(folded: &str, names: &[String]) -> Option<String> {
    names
        .iter()
        .filter(|name| {
            let needle = text::fold_accents(&text::normalize_message(name));
            text::contains_phrase(folded, &needle)
        })
        .max_by_key(|name| name.chars().count())
        .cloned()
}

fn package_match(source: &dyn KnowledgeSource, name: &str) -> Option<KnowledgeMatch> {
    source.lookup(name).into_iter().find(|m| {
        m.topic == Topic::Packages
            && m.content.get("name").and_then(|n| n.as_str()) == Some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cg_providers::StaticKnowledgeBase;
    use cg_sessions::{ContextUpdate, HistoryLimits, SessionSeed};

    const KB: &str = r#"[
        {"topic": "packages", "name": "Hammam Ritual", "keywords": ["hammam ritual", "hammam"],
         "content": {"duration": "90 minutes", "price": "85 EUR", "dining": "tea ceremony included"}},
        {"topic": "packages", "name": "Gold Experience", "keywords": ["gold experience", "gold"],
         "content": {"duration": "3 hours", "dining": "three-course dinner included"}},
        {"topic": "dining", "keywords": ["dinner", "restaurant", "menu"],
         "content": "Our restaurant serves dinner from 19:00."},
        {"topic": "hours", "keywords": ["open", "hours", "opening"],
         "content": {"opening": "10:00 to 22:00 every day"}},
        {"topic": "transportation", "keywords": ["parking", "shuttle"],
         "content": {"parking": "free parking for guests"}},
        {"topic": "ritual", "keywords": ["ritual", "steam"],
         "content": "The ritual combines steam, exfoliation and massage."}
    ]"#;

    fn retriever() -> KnowledgeRetriever {
        let kb: Arc<dyn KnowledgeSource> = Arc::new(StaticKnowledgeBase::from_json(KB).unwrap());
        let es: Arc<dyn KnowledgeSource> = Arc::new(StaticKnowledgeBase::empty());
        KnowledgeRetriever::new(kb, es, "+34 600")
    }

    fn session_with(update: ContextUpdate) -> SessionContext {
        let mut s = SessionContext::new("s1", SessionSeed::default(), Utc::now());
        s.apply(update, HistoryLimits::default(), Utc::now());
        s
    }

    fn fresh() -> SessionContext {
        session_with(ContextUpdate::default())
    }

    #[test]
    fn unrelated_question_is_unknown() {
        let r = retriever().retrieve("Do you sell helicopter tours?", Language::English, &fresh());
        match r.outcome {
            RetrievalOutcome::UnknownTopic { response } => assert!(response.contains("+34 600")),
            other => panic!("expected unknown topic, got {other:?}"),
        }
    }

    #[test]
    fn short_messages_are_never_unknown() {
        let r = retriever().retrieve("helicopter?", Language::English, &fresh());
        assert!(matches!(r.outcome, RetrievalOutcome::Matches { .. }));
    }

    #[test]
    fn names_package_for_the_session() {
        let r = retriever().retrieve(
            "Tell me about the Gold Experience",
            Language::English,
            &fresh(),
        );
        assert_eq!(r.package.as_deref(), Some("Gold Experience"));
        assert_eq!(r.outcome.topic(), Some(Topic::Packages));
    }

    #[test]
    fn duration_follow_up_uses_remembered_topic() {
        let session = session_with(ContextUpdate {
            topic: Some(Topic::Ritual),
            ..Default::default()
        });
        let r = retriever().retrieve("how long does it take?", Language::English, &session);
        assert_eq!(
            r.outcome,
            RetrievalOutcome::Contextual {
                text: followup::topic_duration(Topic::Ritual, Language::English)
                    .unwrap()
                    .to_owned(),
                topic: Topic::Ritual,
            }
        );
    }

    #[test]
    fn duration_follow_up_prefers_package_content() {
        let session = session_with(ContextUpdate {
            topic: Some(Topic::Packages),
            package: Some("Gold Experience".into()),
            ..Default::default()
        });
        let r = retriever().retrieve("how long is that?", Language::English, &session);
        match r.outcome {
            RetrievalOutcome::Contextual { text, .. } => assert!(text.contains("3 hours")),
            other => panic!("expected contextual answer, got {other:?}"),
        }
    }

    #[test]
    fn anaphora_restricts_to_active_topic() {
        let session = session_with(ContextUpdate {
            topic: Some(Topic::Transportation),
            ..Default::default()
        });
        let r = retriever().retrieve(
            "is that parking open at night?",
            Language::English,
            &session,
        );
        match r.outcome {
            RetrievalOutcome::Matches {
                matches,
                restricted_to,
                ..
            } => {
                assert_eq!(restricted_to, Some(Topic::Transportation));
                assert!(matches.iter().all(|m| m.topic == Topic::Transportation));
                assert_eq!(matches[0].priority, Some(1));
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn dining_resolves_against_current_package() {
        let session = session_with(ContextUpdate {
            topic: Some(Topic::Packages),
            package: Some("Hammam Ritual".into()),
            ..Default::default()
        });
        let r = retriever().retrieve("what about dinner?", Language::English, &session);
        match r.outcome {
            RetrievalOutcome::Matches { matches, .. } => {
                assert_eq!(matches[0].topic, Topic::Packages);
                assert_eq!(matches[0].content["name"], "Hammam Ritual");
                assert!(matches.iter().any(|m| m.topic == Topic::Dining));
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn last_shuttle_question_is_not_a_duration_follow_up() {
        let session = session_with(ContextUpdate {
            topic: Some(Topic::Transportation),
            ..Default::default()
        });
        let r = retriever().retrieve(
            "When is the last shuttle, is it at 22:00?",
            Language::English,
            &session,
        );
        match r.outcome {
            RetrievalOutcome::Matches { restricted_to, .. } => {
                assert_eq!(restricted_to, Some(Topic::Transportation));
            }
            other => panic!("expected matches, got {other:?}"),
        }
        assert!(r.depends_on_session);
    }

    #[test]
    fn follow_up_without_matches_builds_on_the_active_topic() {
        let message = "Could you explain that part again more slowly please?";

        let session = session_with(ContextUpdate {
            topic: Some(Topic::Ritual),
            ..Default::default()
        });
        let r = retriever().retrieve(message, Language::English, &session);
        match r.outcome {
            RetrievalOutcome::Matches {
                matches,
                restricted_to,
                ..
            } => {
                assert!(matches.is_empty());
                assert_eq!(restricted_to, None);
            }
            other => panic!("expected matches, got {other:?}"),
        }
        assert!(r.depends_on_session);

        // Same words with nothing to build on.
        let r = retriever().retrieve(message, Language::English, &fresh());
        assert!(matches!(r.outcome, RetrievalOutcome::UnknownTopic { .. }));
        assert!(!r.depends_on_session);
    }

    #[test]
    fn standalone_question_does_not_depend_on_the_session() {
        let session = session_with(ContextUpdate {
            topic: Some(Topic::Ritual),
            ..Default::default()
        });
        let r = retriever().retrieve("What are your opening hours?", Language::English, &session);
        assert!(!r.depends_on_session);
    }

    #[test]
    fn two_part_question_scores_high() {
        let r = retriever().retrieve(
            "What are your opening hours? And do you have parking?",
            Language::English,
            &fresh(),
        );
        match r.outcome {
            RetrievalOutcome::Matches { confidence, matches, .. } => {
                assert!(matches.len() >= 2);
                assert!(confidence >= 0.8);
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }
}
