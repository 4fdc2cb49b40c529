//! The per-message decision pipeline.
//!
//! message → language → fast-path chain → retrieval → unknown-topic or
//! contextual answer → cache → generation → post-processing → cache write
//! + one context update. Answers that lean on earlier turns skip the cache.
//!
//! A turn reads one session snapshot and applies one [`ContextUpdate`] at the
//! end. Callers that need snapshot-to-update atomicity per session serialize
//! turns for the same session id; different sessions run freely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cg_contextpack::{classify_complexity, PromptBuilder, PromptInputs};
use cg_domain::config::{Config, TokenBudgets};
use cg_domain::error::{Error, Result};
use cg_domain::knowledge::KnowledgeMatch;
use cg_domain::language::{Language, LanguageDetection};
use cg_domain::topic::Topic;
use cg_domain::trace::TraceEvent;
use cg_providers::{
    CompletionProvider, GenerationDelegate, KnowledgeSource, LogTelemetry, OpenAiCompatProvider,
    StaticKnowledgeBase, TelemetryEvent, TelemetrySink, WebhookTelemetry,
};
use cg_sessions::{ContextUpdate, SessionContext, SessionSeed, SessionStore};

use crate::cache::{CacheKey, CachedResponse, ResponseCache};
use crate::fastpath::canned::{self, CONNECTIVITY_APOLOGY};
use crate::fastpath::pool::pick;
use crate::fastpath::{DetectorInput, FastPathChain};
use crate::knowledge::{KnowledgeRetriever, RetrievalOutcome, KNOWN_THRESHOLD};
use crate::language::LanguageClassifier;
use crate::postprocess::PostProcessor;
use crate::text;
use crate::venue::VenueClock;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reply types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which strategy produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    FastPath,
    Cache,
    Contextual,
    UnknownTopic,
    Generated,
    /// Generation unavailable or failed; the guest got an apology.
    Fallback,
}

impl ResponseSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseSource::FastPath => "fast_path",
            ResponseSource::Cache => "cache",
            ResponseSource::Contextual => "contextual",
            ResponseSource::UnknownTopic => "unknown_topic",
            ResponseSource::Generated => "generated",
            ResponseSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub message: String,
    pub language: LanguageDetection,
    pub source: ResponseSource,
    pub topic: Option<Topic>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Collaborators
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// External services the pipeline talks to.
pub struct Collaborators {
    pub english: Arc<dyn KnowledgeSource>,
    pub spanish: Arc<dyn KnowledgeSource>,
    /// `None` when no completion service is configured.
    pub completion: Option<Arc<dyn CompletionProvider>>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl Collaborators {
    pub fn from_config(config: &Config) -> Result<Self> {
        let english =
            StaticKnowledgeBase::load_optional(config.knowledge.english_path.as_deref())?;
        let spanish =
            StaticKnowledgeBase::load_optional(config.knowledge.spanish_path.as_deref())?;

        let completion: Option<Arc<dyn CompletionProvider>> =
            if config.generation.base_url.trim().is_empty() {
                None
            } else {
                Some(Arc::new(OpenAiCompatProvider::from_config(&config.generation)?))
            };

        let telemetry: Arc<dyn TelemetrySink> =
            match WebhookTelemetry::from_config(&config.telemetry)? {
                Some(webhook) => Arc::new(webhook),
                None => Arc::new(LogTelemetry),
            };

        Ok(Self {
            english: Arc::new(english),
            spanish: Arc::new(spanish),
            completion,
            telemetry,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pipeline
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct Pipeline {
    sessions: Arc<SessionStore>,
    cache: Arc<ResponseCache>,
    classifier: LanguageClassifier,
    chain: FastPathChain,
    retriever: KnowledgeRetriever,
    prompt: PromptBuilder,
    budgets: TokenBudgets,
    generation: Option<GenerationDelegate>,
    postprocess: PostProcessor,
    venue: VenueClock,
    telemetry: Arc<dyn TelemetrySink>,
}

/// How a turn ended, before the session is updated.
struct Outcome {
    text: String,
    source: ResponseSource,
    topic: Option<Topic>,
    update: ContextUpdate,
}

impl Pipeline {
    /// Build a pipeline over a shared session store. The store is owned by
    /// the caller so other components can inspect and update it directly.
    pub fn new(
        config: &Config,
        sessions: Arc<SessionStore>,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let venue = VenueClock::from_config(&config.venue)?;
        let generation = collaborators
            .completion
            .map(|provider| GenerationDelegate::from_config(provider, &config.generation));

        Ok(Self {
            sessions,
            cache: Arc::new(ResponseCache::from_config(&config.cache)),
            classifier: LanguageClassifier::new(config.language.default),
            chain: FastPathChain::standard(venue.name(), venue.phone()),
            retriever: KnowledgeRetriever::new(
                collaborators.english,
                collaborators.spanish,
                venue.phone(),
            ),
            prompt: PromptBuilder::default(),
            budgets: config.generation.budgets,
            generation,
            postprocess: PostProcessor::from_config(&config.postprocess)?,
            venue,
            telemetry: collaborators.telemetry,
        })
    }

    /// Pipeline with its own store, seeded from `[venue]`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sessions = Arc::new(session_store(config));
        Self::new(config, sessions, Collaborators::from_config(config)?)
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn venue(&self) -> &VenueClock {
        &self.venue
    }

    pub fn generation_configured(&self) -> bool {
        self.generation.is_some()
    }

    pub fn fast_path_detectors(&self) -> Vec<&'static str> {
        self.chain.names()
    }

    pub async fn handle(&self, session_id: &str, message: &str) -> ChatReply {
        self.handle_at(session_id, message, Utc::now()).await
    }

    pub async fn handle_at(&self, session_id: &str, message: &str, now: DateTime<Utc>) -> ChatReply {
        let seed = self.venue.seed(now);
        let (session, _) = self
            .sessions
            .resolve_or_create_at(session_id, seed.clone(), now);

        let detection = self.classifier.classify(message, session.language);
        let language = detection.detected;
        if language != session.language {
            TraceEvent::LanguageResolved {
                session_id: session_id.to_owned(),
                language: language.code().to_owned(),
                confidence: detection.confidence.as_str().to_owned(),
                previous: session.language.code().to_owned(),
            }
            .emit();
        }

        let outcome = self.decide(&session, message, language, now).await;

        let mut update = outcome.update;
        update.language = Some(language);
        if update.topic.is_none() {
            update.topic = outcome.topic;
        }
        update.start_conversation = true;
        update.exchange = Some((message.to_owned(), outcome.text.clone()));
        // Swept mid-turn: recreated from the same seed, not a blank one.
        self.sessions.apply_seeded_at(session_id, &seed, update, now);

        self.telemetry.publish(TelemetryEvent {
            session_id: session_id.to_owned(),
            language,
            source: outcome.source.as_str().to_owned(),
            topic: outcome.topic.map(|t| t.as_str().to_owned()),
            message: message.to_owned(),
            response: outcome.text.clone(),
            at: now,
        });

        ChatReply {
            session_id: session_id.to_owned(),
            message: outcome.text,
            language: detection,
            source: outcome.source,
            topic: outcome.topic,
        }
    }

    async fn decide(
        &self,
        session: &SessionContext,
        message: &str,
        language: Language,
        now: DateTime<Utc>,
    ) -> Outcome {
        let normalized = text::normalize_message(message);

        let input = DetectorInput::new(message, &normalized, language, session);
        if let Some(hit) = self.chain.evaluate(&input) {
            TraceEvent::FastPathMatched {
                session_id: session.id.clone(),
                detector: hit.detector.to_owned(),
                category: hit.category.to_owned(),
            }
            .emit();
            if let Some(delay) = &hit.update.late_arrival {
                TraceEvent::ScenarioDetected {
                    session_id: session.id.clone(),
                    kind: delay.kind.as_str().to_owned(),
                    minutes: delay.minutes,
                }
                .emit();
            }
            if let Some(change) = &hit.update.booking_modification {
                TraceEvent::ScenarioDetected {
                    session_id: session.id.clone(),
                    kind: change.kind.as_str().to_owned(),
                    minutes: None,
                }
                .emit();
            }
            return Outcome {
                text: hit.response,
                source: ResponseSource::FastPath,
                topic: Some(hit.topic),
                update: hit.update,
            };
        }

        // Answers that lean on earlier turns never read or write the cache.
        let retrieval = self.retriever.retrieve(message, language, session);
        let topic = retrieval.outcome.topic();
        let update = ContextUpdate {
            package: retrieval.package,
            ..Default::default()
        };

        match retrieval.outcome {
            RetrievalOutcome::UnknownTopic { response } => Outcome {
                text: response,
                source: ResponseSource::UnknownTopic,
                topic: None,
                update,
            },
            RetrievalOutcome::Contextual { text, topic } => Outcome {
                text,
                source: ResponseSource::Contextual,
                topic: Some(topic),
                update,
            },
            RetrievalOutcome::Matches {
                matches,
                confidence,
                restricted_to,
            } => {
                let cacheable = !retrieval.depends_on_session
                    && restricted_to.is_none()
                    && !matches.is_empty();
                let key = CacheKey::new(&session.id, message, language);

                if cacheable {
                    if let Some(cached) = self.cache.get_at(&key, now) {
                        TraceEvent::CacheHit {
                            session_id: session.id.clone(),
                            language: language.code().to_owned(),
                        }
                        .emit();
                        return Outcome {
                            text: cached.text,
                            source: ResponseSource::Cache,
                            topic: cached.topic,
                            update,
                        };
                    }
                }

                let generated = self
                    .generate(session, message, language, &matches, confidence, topic, now)
                    .await;
                match generated {
                    Some(text) => {
                        if cacheable {
                            self.cache.set_at(
                                key,
                                CachedResponse {
                                    text: text.clone(),
                                    topic,
                                },
                                now,
                            );
                        }
                        Outcome {
                            text,
                            source: ResponseSource::Generated,
                            topic,
                            update,
                        }
                    }
                    None => Outcome {
                        text: self.apology(language),
                        source: ResponseSource::Fallback,
                        topic,
                        update,
                    },
                }
            }
        }
    }

    /// Generated and post-processed text, or `None` when the completion
    /// service is missing, failed, or returned nothing usable.
    #[allow(clippy::too_many_arguments)]
    async fn generate(
        &self,
        session: &SessionContext,
        message: &str,
        language: Language,
        matches: &[KnowledgeMatch],
        confidence: f64,
        topic: Option<Topic>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let Some(delegate) = &self.generation else {
            tracing::debug!(session_id = %session.id, "no completion service configured");
            return None;
        };

        let topics: Vec<Topic> = matches.iter().map(|m| m.topic).collect();
        let max_tokens = classify_complexity(message, &topics).budget(&self.budgets);

        let facts = self.venue.facts(language, now, session);
        let (bundle, report) = self.prompt.build(PromptInputs {
            language,
            venue: &facts,
            knowledge: matches,
            scenario: scenario_notes(session, confidence),
            history: session.history_turns(),
            user_message: message,
        });
        tracing::debug!(
            session_id = %session.id,
            system_chars = report.total_system_chars,
            knowledge_items = report.knowledge_items,
            history_turns = report.history_turns,
            max_tokens,
            "prompt assembled"
        );

        let result = delegate.generate(&bundle, max_tokens).await;
        let (ok, attempts, duration_ms) = match &result {
            Ok(g) => (true, g.attempts, g.duration_ms),
            Err(Error::RetriesExhausted { attempts, .. }) => (false, *attempts, 0),
            Err(_) => (false, 1, 0),
        };
        TraceEvent::GenerationRequest {
            session_id: session.id.clone(),
            max_tokens,
            attempts,
            duration_ms,
            ok,
        }
        .emit();

        match result {
            Ok(generation) => {
                let text = self.postprocess.normalize(&generation.text, topic);
                (!text.is_empty()).then_some(text)
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "generation failed, apologizing");
                None
            }
        }
    }

    fn apology(&self, language: Language) -> String {
        pick(&CONNECTIVITY_APOLOGY, language, &[], |t| {
            canned::fill(t, "", self.venue.phone())
        })
    }

    /// Evict expired sessions and their cached answers, plus any other
    /// expired cache entries.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> (usize, usize) {
        let removed = self.sessions.sweep_expired(now);
        let mut cache_removed: usize = removed
            .iter()
            .map(|id| self.cache.remove_session(id))
            .sum();
        cache_removed += self.cache.sweep_expired(now);

        if !removed.is_empty() || cache_removed > 0 {
            TraceEvent::SessionsSwept {
                sessions_removed: removed.len(),
                cache_entries_removed: cache_removed,
            }
            .emit();
        }
        (removed.len(), cache_removed)
    }

    /// Remove a session and everything cached for it.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.cache.remove_session(session_id);
        self.sessions.remove(session_id)
    }
}

/// Session store configured from `[sessions]`, recreating swept sessions
/// with the `[venue]` sold-out flag.
pub fn session_store(config: &Config) -> SessionStore {
    SessionStore::new(&config.sessions).with_seed(SessionSeed {
        sold_out: config.venue.sold_out,
        ..SessionSeed::default()
    })
}

/// Open scenario state and caveats for the SCENARIO prompt section.
fn scenario_notes(session: &SessionContext, confidence: f64) -> Vec<String> {
    let mut notes = Vec::new();

    let late = &session.late_arrival;
    if let Some(kind) = late.kind {
        let minutes = late
            .minutes
            .map(|m| format!(" ({m} min)"))
            .unwrap_or_default();
        notes.push(format!("ARRIVAL: guest reported {}{minutes}", kind.as_str()));
    }

    let booking = &session.booking_modification;
    if let (true, Some(kind)) = (booking.requested, booking.kind) {
        let original = booking
            .original_time
            .as_deref()
            .map(|t| format!(", original time {t}"))
            .unwrap_or_default();
        notes.push(format!("BOOKING_CHANGE: {}{original}", kind.as_str()));
    }

    if let Some(package) = &session.packages.current {
        notes.push(format!("PACKAGE: guest is asking about {package}"));
    }

    if confidence < KNOWN_THRESHOLD {
        notes.push(
            "COVERAGE: knowledge may not cover this question; if the answer is not in \
             KNOWLEDGE, say so and offer the phone number"
                .to_owned(),
        );
    }
    notes
}
