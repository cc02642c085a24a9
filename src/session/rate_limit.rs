//! Sliding-window submission ledger
//!
//! Each session keeps the epoch-millisecond timestamps of its recent
//! successful submissions in session storage. Every check evicts entries
//! older than the window before counting, so the ledger prunes itself and
//! never needs a background sweep.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use super::storage::SessionStorage;
use crate::clock::Clock;

/// One hour, in milliseconds
pub const RATE_LIMIT_WINDOW_MS: u64 = 3_600_000;

const LEDGER_KEY_PREFIX: &str = "error_reporting_rate_limit";

/// Advisory per-session quota. Client-side hint only, not a security boundary.
pub struct RateLimiter {
    storage: Arc<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    window_ms: u64,
    /// Serializes check → persist → record per session
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RateLimiter {
    pub fn new(storage: Arc<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            window_ms: RATE_LIMIT_WINDOW_MS,
            locks: DashMap::new(),
        }
    }

    /// Whether another submission fits in the quota.
    ///
    /// Evicts stale entries and writes the trimmed ledger back as a side effect.
    pub fn check(&self, session_id: &str, quota_per_hour: u32) -> bool {
        let entries = self.trimmed(session_id);
        let allowed = entries.len() < quota_per_hour as usize;
        debug!(
            session_id,
            counted = entries.len(),
            quota = quota_per_hour,
            allowed,
            "Rate limit check"
        );
        allowed
    }

    /// Record a successful submission at the current time
    pub fn record(&self, session_id: &str) {
        let mut entries = self.trimmed(session_id);
        entries.push(self.clock.now_ms());
        self.store(session_id, &entries);
    }

    /// Time until enough counted submissions leave the window for one more
    /// to fit under `quota_per_hour`. Zero when one already fits.
    pub fn retry_after_ms(&self, session_id: &str, quota_per_hour: u32) -> u64 {
        let now = self.clock.now_ms();
        let mut entries = self.trimmed(session_id);
        entries.sort_unstable();
        entries
            .len()
            .checked_sub(quota_per_hour as usize)
            .and_then(|idx| entries.get(idx))
            .map(|ts| (ts + self.window_ms).saturating_sub(now))
            .unwrap_or(0)
    }

    /// Number of submissions currently counted for the session
    pub fn counted(&self, session_id: &str) -> usize {
        self.trimmed(session_id).len()
    }

    /// Hold this guard across check, persist and record so concurrent
    /// submissions for one session see each other's ledger writes.
    pub async fn lock_session(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    fn trimmed(&self, session_id: &str) -> Vec<u64> {
        let cutoff = self.clock.now_ms().saturating_sub(self.window_ms);
        let mut entries = self.load(session_id);
        let before = entries.len();
        entries.retain(|&ts| ts > cutoff);
        if entries.len() != before {
            self.store(session_id, &entries);
        }
        entries
    }

    fn load(&self, session_id: &str) -> Vec<u64> {
        let Some(raw) = self.storage.get(&ledger_key(session_id)) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(session_id, "Discarding unreadable rate limit ledger: {}", e);
                Vec::new()
            }
        }
    }

    fn store(&self, session_id: &str, entries: &[u64]) {
        match serde_json::to_string(entries) {
            Ok(raw) => self.storage.set(&ledger_key(session_id), raw),
            Err(e) => warn!(session_id, "Failed to encode rate limit ledger: {}", e),
        }
    }
}

fn ledger_key(session_id: &str) -> String {
    format!("{}:{}", LEDGER_KEY_PREFIX, session_id)
}
