use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::error::AppResult;
use super::scorebat::{normalize_matches, MatchSource};
use super::types::Match;

// ── Snapshot ──────────────────────────────────────────────────────────────────

struct Snapshot {
    records: Vec<Match>,
    fetched_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Snapshot>,
    /// Outcome of the most recent refresh, kept so waiters can share it.
    last_outcome: Option<AppResult<()>>,
    /// Number of finished refreshes. Only changes together with the two
    /// fields above, under the same lock.
    completed: u64,
}

impl CacheState {
    fn fresh_records(&self, ttl: Duration) -> Option<Vec<Match>> {
        self.snapshot
            .as_ref()
            .filter(|s| s.is_fresh(ttl))
            .map(|s| s.records.clone())
    }
}

// ── MatchCache ────────────────────────────────────────────────────────────────

/// Time-bounded cache over a [`MatchSource`].
///
/// `refresh_gate` is held for the whole fetch + normalize, so at most one
/// upstream call is in flight. `state` is only locked briefly to read or swap
/// the snapshot. Callers that queued behind a refresh receive that refresh's
/// result instead of issuing their own.
pub struct MatchCache {
    source: Arc<dyn MatchSource>,
    ttl: Duration,
    state: Mutex<CacheState>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl MatchCache {
    pub fn new(source: Arc<dyn MatchSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(CacheState::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an owned copy of the current records, refreshing when the
    /// snapshot is missing or expired.
    pub async fn get(&self) -> AppResult<Vec<Match>> {
        let completed_on_arrival = {
            let state = self.lock_state();
            if let Some(records) = state.fresh_records(self.ttl) {
                return Ok(records);
            }
            state.completed
        };

        let _gate = self.refresh_gate.lock().await;

        {
            let state = self.lock_state();
            if let Some(records) = state.fresh_records(self.ttl) {
                return Ok(records);
            }
            // A refresh finished while we were queued and it failed: share it.
            if state.completed != completed_on_arrival {
                if let Some(Err(err)) = &state.last_outcome {
                    return Err(err.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Must be called with `refresh_gate` held.
    async fn refresh(&self) -> AppResult<Vec<Match>> {
        debug!("refreshing match cache");
        let result = self.source.fetch().await;

        let mut state = self.lock_state();
        state.completed += 1;

        match result {
            Ok(mut records) => {
                normalize_matches(&mut records);
                info!(count = records.len(), "loaded matches from upstream");
                if let Some(first) = records.first() {
                    debug!(title = %first.title, videos = first.videos.len(), "newest match");
                }

                let copy = records.clone();
                state.snapshot = Some(Snapshot {
                    records,
                    fetched_at: Instant::now(),
                });
                state.last_outcome = Some(Ok(()));
                Ok(copy)
            }
            Err(err) => {
                state.last_outcome = Some(Err(err.clone()));
                Err(err)
            }
        }
    }
}
