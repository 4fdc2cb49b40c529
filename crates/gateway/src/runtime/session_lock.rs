//! Per-session turn serialization.
//!
//! A turn reads a session snapshot, runs the pipeline and applies one
//! context update. Two turns for the same session must not interleave, so
//! each session id maps to a `Semaphore(1)`; a second message waits until
//! the first turn finishes. Different sessions never contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub struct SessionLockMap {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionLockMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `session_id`.
    ///
    /// The permit releases the lock on drop; hold it for the whole turn.
    pub async fn acquire(&self, session_id: &str) -> Result<OwnedSemaphorePermit, SessionBusy> {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        if let Ok(permit) = sem.clone().try_acquire_owned() {
            return Ok(permit);
        }

        tracing::debug!(session_id, "turn queued behind an in-flight turn");
        sem.acquire_owned().await.map_err(|_| SessionBusy)
    }

    /// Number of tracked sessions (for monitoring).
    pub fn session_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Drop locks nobody holds or waits on. Returns how many were removed.
    ///
    /// Holders and waiters keep their own `Arc` to the semaphore, so a
    /// strong count of one means only the map still references it.
    pub fn prune_idle(&self) -> usize {
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|_, sem| Arc::strong_count(sem) > 1);
        before - locks.len()
    }
}

/// The lock's semaphore was closed while waiting.
#[derive(Debug)]
pub struct SessionBusy;

impl std::fmt::Display for SessionBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session is busy: another turn is in progress")
    }
}

impl std::error::Error for SessionBusy {}
