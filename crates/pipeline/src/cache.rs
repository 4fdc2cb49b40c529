//! Response cache keyed by session, normalized message and language.
//!
//! Entries are sharded so writers for different keys rarely share a lock.
//! Expired entries are invisible to readers and removed lazily on read or
//! by the periodic sweep.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use cg_domain::config::CacheConfig;
use cg_domain::language::Language;
use cg_domain::topic::Topic;
use cg_sessions::ExpiryPolicy;

use crate::text;

const SHARDS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub session_id: String,
    pub normalized: String,
    pub language: Language,
}

impl CacheKey {
    pub fn new(session_id: &str, message: &str, language: Language) -> Self {
        Self {
            session_id: session_id.to_owned(),
            normalized: text::normalize_message(message),
            language,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub text: String,
    pub topic: Option<Topic>,
}

struct Entry {
    value: CachedResponse,
    stored_at: DateTime<Utc>,
}

pub struct ResponseCache {
    shards: Vec<RwLock<HashMap<CacheKey, Entry>>>,
    expiry: ExpiryPolicy,
    enabled: bool,
}

impl ResponseCache {
    pub fn new(expiry: ExpiryPolicy, enabled: bool) -> Self {
        Self {
            shards: (0..SHARDS).map(|_| RwLock::new(HashMap::new())).collect(),
            expiry,
            enabled,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            ExpiryPolicy::new(std::time::Duration::from_secs(config.ttl_secs)),
            config.enabled,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn shard(&self, key: &CacheKey) -> &RwLock<HashMap<CacheKey, Entry>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARDS]
    }

    pub fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<CachedResponse> {
        if !self.enabled {
            return None;
        }
        let shard = self.shard(key);
        {
            let map = shard.read();
            match map.get(key) {
                None => return None,
                Some(entry) if !self.expiry.is_expired(entry.stored_at, now) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }
        // Re-check under the write lock: a concurrent `set` may have
        // refreshed the entry since the read above.
        let mut map = shard.write();
        if map
            .get(key)
            .is_some_and(|e| self.expiry.is_expired(e.stored_at, now))
        {
            map.remove(key);
        }
        None
    }

    pub fn set(&self, key: CacheKey, value: CachedResponse) {
        self.set_at(key, value, Utc::now());
    }

    pub fn set_at(&self, key: CacheKey, value: CachedResponse, now: DateTime<Utc>) {
        if !self.enabled {
            return;
        }
        self.shard(&key).write().insert(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    /// Remove every entry strictly past its TTL. Returns how many went.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut map = shard.write();
                let before = map.len();
                map.retain(|_, e| !self.expiry.is_expired(e.stored_at, now));
                before - map.len()
            })
            .sum()
    }

    /// Drop all entries belonging to `session_id`.
    pub fn remove_session(&self, session_id: &str) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut map = shard.write();
                let before = map.len();
                map.retain(|k, _| k.session_id != session_id);
                before - map.len()
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
