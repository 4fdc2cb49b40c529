//! Idle expiry for sessions.
//!
//! A session expires once it has been idle for strictly longer than the
//! configured TTL. The same rule governs cached answers, which share the
//! session's lifetime.

use chrono::{DateTime, Duration, Utc};

use cg_domain::config::SessionsConfig;

#[derive(Debug, Clone, Copy)]
pub struct ExpiryPolicy {
    ttl: Duration,
}

impl ExpiryPolicy {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    pub fn from_config(config: &SessionsConfig) -> Self {
        Self::new(std::time::Duration::from_secs(config.ttl_secs))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_expired(&self, last_activity: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(last_activity) > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expires_strictly_after_ttl() {
        let policy = ExpiryPolicy::new(std::time::Duration::from_secs(1800));
        let last = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

        assert!(!policy.is_expired(last, last + Duration::minutes(29)));
        assert!(!policy.is_expired(last, last + Duration::minutes(30)));
        assert!(policy.is_expired(last, last + Duration::minutes(30) + Duration::seconds(1)));
    }
}
