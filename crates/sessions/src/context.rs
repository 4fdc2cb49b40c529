//! Per-session conversation context.
//!
//! A `SessionContext` is only ever changed through [`SessionContext::apply`]
//! with a [`ContextUpdate`]; the store hands out clones for reading.

use std::collections::VecDeque;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use cg_domain::config::SessionsConfig;
use cg_domain::language::Language;
use cg_domain::prompt::{HistoryTurn, Speaker};
use cg_domain::scenario::{BookingChangeKind, DelayKind};
use cg_domain::topic::Topic;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sub-records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One guest message and the reply it got.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub message: String,
    pub response: String,
    pub at: DateTime<Utc>,
}

/// Last known arrival-delay state for the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LateArrivalRecord {
    pub is_late: bool,
    pub kind: Option<DelayKind>,
    pub minutes: Option<i64>,
    pub last_update: Option<DateTime<Utc>>,
}

impl LateArrivalRecord {
    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }
}

/// A pending booking modification request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingModificationRecord {
    pub requested: bool,
    pub kind: Option<BookingChangeKind>,
    pub original_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Northern-hemisphere meteorological seasons.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn from_date(date: impl Datelike) -> Self {
        Self::from_month(date.month())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalContext {
    pub season: Season,
    pub sold_out: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageContext {
    pub current: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFlags {
    pub conversation_started: bool,
    pub is_first_greeting: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            conversation_started: false,
            is_first_greeting: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffRecord {
    pub chat_id: String,
    pub created_at: DateTime<Utc>,
}

/// Values a brand-new session starts from.
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub language: Language,
    pub season: Season,
    pub sold_out: bool,
}

impl Default for SessionSeed {
    fn default() -> Self {
        Self {
            language: Language::Unknown,
            season: Season::from_date(Utc::now()),
            sold_out: false,
        }
    }
}

/// History bounds applied on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub exchanges: usize,
    pub topics: usize,
}

impl HistoryLimits {
    pub fn from_config(config: &SessionsConfig) -> Self {
        Self {
            exchanges: config.history_limit,
            topics: config.topic_history_limit,
        }
    }
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            exchanges: 10,
            topics: 5,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub id: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    pub history: VecDeque<Exchange>,
    pub last_topic: Option<Topic>,
    pub topic_history: VecDeque<Topic>,
    pub late_arrival: LateArrivalRecord,
    pub booking_modification: BookingModificationRecord,
    pub seasonal: SeasonalContext,
    pub packages: PackageContext,
    pub flags: SessionFlags,
    pub handoff: Option<HandoffRecord>,
}

impl SessionContext {
    pub fn new(id: impl Into<String>, seed: SessionSeed, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            language: seed.language,
            created_at: now,
            last_interaction: now,
            history: VecDeque::new(),
            last_topic: None,
            topic_history: VecDeque::new(),
            late_arrival: LateArrivalRecord::default(),
            booking_modification: BookingModificationRecord::default(),
            seasonal: SeasonalContext {
                season: seed.season,
                sold_out: seed.sold_out,
            },
            packages: PackageContext::default(),
            flags: SessionFlags::default(),
            handoff: None,
        }
    }

    /// Responses given in this session, most recent first.
    pub fn recent_responses(&self) -> impl Iterator<Item = &str> {
        self.history.iter().rev().map(|e| e.response.as_str())
    }

    /// History flattened into alternating guest/assistant turns, oldest first.
    pub fn history_turns(&self) -> Vec<HistoryTurn> {
        let mut turns = Vec::with_capacity(self.history.len() * 2);
        for exchange in &self.history {
            turns.push(HistoryTurn {
                speaker: Speaker::Guest,
                text: exchange.message.clone(),
            });
            turns.push(HistoryTurn {
                speaker: Speaker::Assistant,
                text: exchange.response.clone(),
            });
        }
        turns
    }

    /// Apply a batch of changes atomically with respect to other callers
    /// holding the same session.
    pub fn apply(&mut self, update: ContextUpdate, limits: HistoryLimits, now: DateTime<Utc>) {
        if let Some(lang) = update.language {
            if lang.is_known() {
                self.language = lang;
            }
        }

        if let Some(topic) = update.topic {
            self.record_topic(topic, limits.topics);
        }

        if let Some(delay) = update.late_arrival {
            self.late_arrival = LateArrivalRecord {
                is_late: delay.kind.is_late(),
                kind: Some(delay.kind),
                minutes: delay.minutes,
                last_update: Some(now),
            };
        }

        if let Some(change) = update.booking_modification {
            self.booking_modification = BookingModificationRecord {
                requested: true,
                kind: Some(change.kind),
                original_time: change.original_time,
            };
        }

        if let Some(package) = update.package {
            if self.packages.current.as_deref() != Some(package.as_str()) {
                self.packages.previous = self.packages.current.take();
                self.packages.current = Some(package);
            }
        }

        if let Some(sold_out) = update.sold_out {
            self.seasonal.sold_out = sold_out;
        }
        if let Some(season) = update.season {
            self.seasonal.season = season;
        }

        if update.start_conversation {
            self.flags.conversation_started = true;
            self.flags.is_first_greeting = false;
        }

        if let Some(chat_id) = update.handoff_chat_id {
            self.handoff = Some(HandoffRecord {
                chat_id,
                created_at: now,
            });
        }

        if let Some((message, response)) = update.exchange {
            self.history.push_back(Exchange {
                message,
                response,
                at: now,
            });
            while self.history.len() > limits.exchanges {
                self.history.pop_front();
            }
        }

        self.last_interaction = now;
    }

    fn record_topic(&mut self, topic: Topic, limit: usize) {
        if topic.is_conversational() {
            return;
        }

        // Moving to an unrelated subject closes any open scenario.
        if !topic.is_scenario() {
            self.late_arrival = LateArrivalRecord::default();
            self.booking_modification = BookingModificationRecord::default();
        }

        if self.last_topic != Some(topic) {
            self.topic_history.push_back(topic);
            while self.topic_history.len() > limit {
                self.topic_history.pop_front();
            }
        }
        self.last_topic = Some(topic);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Context update
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq)]
pub struct DelayUpdate {
    pub kind: DelayKind,
    pub minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingChangeUpdate {
    pub kind: BookingChangeKind,
    pub original_time: Option<String>,
}

/// Everything a single turn may change about a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUpdate {
    pub language: Option<Language>,
    pub topic: Option<Topic>,
    pub late_arrival: Option<DelayUpdate>,
    pub booking_modification: Option<BookingChangeUpdate>,
    pub package: Option<String>,
    pub sold_out: Option<bool>,
    pub season: Option<Season>,
    pub start_conversation: bool,
    pub handoff_chat_id: Option<String>,
    pub exchange: Option<(String, String)>,
}

impl ContextUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ContextUpdate::default()
    }

    /// Fold `other` into `self`; fields set in `other` win.
    pub fn merge(&mut self, other: ContextUpdate) {
        if other.language.is_some() {
            self.language = other.language;
        }
        if other.topic.is_some() {
            self.topic = other.topic;
        }
        if other.late_arrival.is_some() {
            self.late_arrival = other.late_arrival;
        }
        if other.booking_modification.is_some() {
            self.booking_modification = other.booking_modification;
        }
        if other.package.is_some() {
            self.package = other.package;
        }
        if other.sold_out.is_some() {
            self.sold_out = other.sold_out;
        }
        if other.season.is_some() {
            self.season = other.season;
        }
        self.start_conversation |= other.start_conversation;
        if other.handoff_chat_id.is_some() {
            self.handoff_chat_id = other.handoff_chat_id;
        }
        if other.exchange.is_some() {
            self.exchange = other.exchange;
        }
    }
}
