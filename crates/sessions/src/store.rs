//! In-memory session store.
//!
//! The map lock is only held to find or insert an entry. Each session has its
//! own mutex, so updates to different sessions never contend, and updates to
//! the same session are serialized. The sweeper marks an entry evicted under
//! that same mutex before unlinking it; a caller that finds its handle
//! evicted re-resolves and works on the replacement.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use cg_domain::config::SessionsConfig;
use cg_domain::trace::TraceEvent;

use crate::context::{ContextUpdate, HistoryLimits, Season, SessionContext, SessionSeed};
use crate::lifecycle::ExpiryPolicy;

struct Slot {
    context: SessionContext,
    evicted: bool,
}

type SlotRef = Arc<Mutex<Slot>>;

pub struct SessionStore {
    sessions: RwLock<HashMap<String, SlotRef>>,
    expiry: ExpiryPolicy,
    limits: HistoryLimits,
    /// Used when an update lands on a session that no longer exists.
    seed: SessionSeed,
}

impl SessionStore {
    pub fn new(config: &SessionsConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            expiry: ExpiryPolicy::from_config(config),
            limits: HistoryLimits::from_config(config),
            seed: SessionSeed::default(),
        }
    }

    /// Seed for sessions this store recreates on its own. The season is
    /// recomputed at recreation time.
    pub fn with_seed(mut self, seed: SessionSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn expiry(&self) -> ExpiryPolicy {
        self.expiry
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    /// Look up a session, creating it from `seed` if absent. Returns a
    /// snapshot of the context and whether it was just created.
    pub fn resolve_or_create(&self, session_id: &str, seed: SessionSeed) -> (SessionContext, bool) {
        self.resolve_or_create_at(session_id, seed, Utc::now())
    }

    pub fn resolve_or_create_at(
        &self,
        session_id: &str,
        seed: SessionSeed,
        now: DateTime<Utc>,
    ) -> (SessionContext, bool) {
        loop {
            let (slot, is_new) = self.slot_or_insert(session_id, &seed, now);
            let guard = slot.lock();
            if guard.evicted {
                continue;
            }
            let snapshot = guard.context.clone();
            drop(guard);

            if is_new {
                TraceEvent::SessionResolved {
                    session_id: session_id.to_owned(),
                    is_new,
                }
                .emit();
            }
            return (snapshot, is_new);
        }
    }

    /// Clone of the current context, if the session exists.
    pub fn snapshot(&self, session_id: &str) -> Option<SessionContext> {
        let slot = self.sessions.read().get(session_id).cloned()?;
        let guard = slot.lock();
        (!guard.evicted).then(|| guard.context.clone())
    }

    /// Apply an update to a session, recreating it from the store's seed if
    /// it was swept in the meantime. Returns the updated snapshot.
    pub fn apply(&self, session_id: &str, update: ContextUpdate) -> SessionContext {
        self.apply_at(session_id, update, Utc::now())
    }

    pub fn apply_at(
        &self,
        session_id: &str,
        update: ContextUpdate,
        now: DateTime<Utc>,
    ) -> SessionContext {
        let seed = SessionSeed {
            season: Season::from_date(now),
            ..self.seed.clone()
        };
        self.apply_seeded_at(session_id, &seed, update, now)
    }

    /// Like [`apply_at`](Self::apply_at), recreating a swept session from
    /// `seed`.
    pub fn apply_seeded_at(
        &self,
        session_id: &str,
        seed: &SessionSeed,
        update: ContextUpdate,
        now: DateTime<Utc>,
    ) -> SessionContext {
        loop {
            let (slot, _) = self.slot_or_insert(session_id, seed, now);
            let mut guard = slot.lock();
            if guard.evicted {
                continue;
            }
            guard.context.apply(update, self.limits, now);
            return guard.context.clone();
        }
    }

    /// Apply an update only if the session already exists.
    pub fn apply_existing(&self, session_id: &str, update: ContextUpdate) -> Option<SessionContext> {
        let slot = self.sessions.read().get(session_id).cloned()?;
        let mut guard = slot.lock();
        if guard.evicted {
            return None;
        }
        guard.context.apply(update, self.limits, Utc::now());
        Some(guard.context.clone())
    }

    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id);
        match removed {
            Some(slot) => {
                slot.lock().evicted = true;
                true
            }
            None => false,
        }
    }

    /// Snapshots of all live sessions, most recently active first.
    pub fn list(&self) -> Vec<SessionContext> {
        let slots: Vec<SlotRef> = self.sessions.read().values().cloned().collect();
        let mut out: Vec<SessionContext> = slots
            .iter()
            .filter_map(|slot| {
                let guard = slot.lock();
                (!guard.evicted).then(|| guard.context.clone())
            })
            .collect();
        out.sort_by(|a, b| b.last_interaction.cmp(&a.last_interaction));
        out
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every session idle for longer than the TTL. Returns the ids
    /// removed so dependent caches can be purged.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<String> {
        let candidates: Vec<String> = {
            let sessions = self.sessions.read();
            sessions
                .iter()
                .filter(|(_, slot)| {
                    let guard = slot.lock();
                    self.expiry.is_expired(guard.context.last_interaction, now)
                })
                .map(|(id, _)| id.clone())
                .collect()
        };
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(candidates.len());
        let mut sessions = self.sessions.write();
        for id in candidates {
            let Some(slot) = sessions.get(&id).cloned() else {
                continue;
            };
            // Re-check under the entry lock: a turn may have landed since.
            let mut guard = slot.lock();
            if self.expiry.is_expired(guard.context.last_interaction, now) {
                guard.evicted = true;
                drop(guard);
                sessions.remove(&id);
                removed.push(id);
            }
        }

        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), remaining = sessions.len(), "expired sessions swept");
        }
        removed
    }

    fn slot_or_insert(
        &self,
        session_id: &str,
        seed: &SessionSeed,
        now: DateTime<Utc>,
    ) -> (SlotRef, bool) {
        if let Some(slot) = self.sessions.read().get(session_id) {
            return (slot.clone(), false);
        }

        let mut sessions = self.sessions.write();
        if let Some(slot) = sessions.get(session_id) {
            return (slot.clone(), false);
        }
        let slot = Arc::new(Mutex::new(Slot {
            context: SessionContext::new(session_id, seed.clone(), now),
            evicted: false,
        }));
        sessions.insert(session_id.to_owned(), slot.clone());
        (slot, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cg_domain::language::Language;
    use cg_domain::topic::Topic;

    fn store() -> SessionStore {
        SessionStore::new(&SessionsConfig::default())
    }

    #[test]
    fn resolve_creates_once() {
        let s = store();
        let (_, first) = s.resolve_or_create("a", SessionSeed::default());
        let (_, second) = s.resolve_or_create("a", SessionSeed::default());
        assert!(first);
        assert!(!second);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn seed_applies_only_on_creation() {
        let s = store();
        let seed = SessionSeed {
            language: Language::Spanish,
            sold_out: true,
            ..Default::default()
        };
        let (ctx, _) = s.resolve_or_create("a", seed);
        assert_eq!(ctx.language, Language::Spanish);
        assert!(ctx.seasonal.sold_out);

        let (ctx, _) = s.resolve_or_create("a", SessionSeed::default());
        assert_eq!(ctx.language, Language::Spanish);
    }

    #[test]
    fn apply_updates_snapshot() {
        let s = store();
        s.resolve_or_create("a", SessionSeed::default());
        let updated = s.apply(
            "a",
            ContextUpdate {
                topic: Some(Topic::Packages),
                ..Default::default()
            },
        );
        assert_eq!(updated.last_topic, Some(Topic::Packages));
        assert_eq!(s.snapshot("a").and_then(|c| c.last_topic), Some(Topic::Packages));
    }

    #[test]
    fn sweep_removes_only_expired() {
        let s = store();
        let t0 = Utc::now();
        s.resolve_or_create_at("old", SessionSeed::default(), t0);
        s.resolve_or_create_at("fresh", SessionSeed::default(), t0 + Duration::minutes(25));

        let removed = s.sweep_expired(t0 + Duration::minutes(31));
        assert_eq!(removed, vec!["old".to_string()]);
        assert!(s.snapshot("old").is_none());
        assert!(s.snapshot("fresh").is_some());
    }

    #[test]
    fn activity_defers_expiry() {
        let s = store();
        let t0 = Utc::now();
        s.resolve_or_create_at("a", SessionSeed::default(), t0);
        s.apply_at("a", ContextUpdate::default(), t0 + Duration::minutes(20));
        assert!(s.sweep_expired(t0 + Duration::minutes(40)).is_empty());
    }

    #[test]
    fn apply_after_removal_starts_fresh() {
        let s = store();
        s.apply(
            "a",
            ContextUpdate {
                topic: Some(Topic::Dining),
                ..Default::default()
            },
        );
        assert!(s.remove("a"));
        assert!(!s.remove("a"));
        assert!(s.apply_existing("a", ContextUpdate::default()).is_none());

        let ctx = s.apply("a", ContextUpdate::default());
        assert_eq!(ctx.last_topic, None);
    }

    #[test]
    fn recreated_session_keeps_the_store_seed() {
        let s = store().with_seed(SessionSeed {
            sold_out: true,
            ..Default::default()
        });
        s.resolve_or_create("a", SessionSeed::default());
        assert!(s.remove("a"));

        let ctx = s.apply("a", ContextUpdate::default());
        assert!(ctx.seasonal.sold_out);
    }

    #[test]
    fn swept_session_is_recreated_from_the_given_seed() {
        let s = store();
        let t0 = Utc::now();
        let seed = SessionSeed {
            sold_out: true,
            season: Season::Winter,
            ..Default::default()
        };
        s.resolve_or_create_at("a", seed.clone(), t0);
        let later = t0 + Duration::minutes(31);
        assert_eq!(s.sweep_expired(later), vec!["a".to_string()]);

        let ctx = s.apply_seeded_at("a", &seed, ContextUpdate::default(), later);
        assert!(ctx.seasonal.sold_out);
        assert_eq!(ctx.seasonal.season, Season::Winter);
    }

    #[test]
    fn list_orders_by_recent_activity() {
        let s = store();
        let t0 = Utc::now();
        s.resolve_or_create_at("a", SessionSeed::default(), t0);
        s.resolve_or_create_at("b", SessionSeed::default(), t0 + Duration::seconds(5));
        let ids: Vec<String> = s.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
