//! Ranked leaderboard service
//!
//! Each fetch races the authoritative scorer against a deadline:
//!
//! ```text
//! INIT ─► RACE ─┬─► AUTHORITATIVE_WON ─────────────► RESPONSE_SENT
//!               └─► FALLBACK_ON_TIMEOUT ─► RESPONSE_SENT
//!                                            └─► BACKGROUND_RECONCILE ─► CACHE_UPDATED
//! ```
//!
//! The scorer runs in its own task and is never cancelled. When it misses
//! the deadline the caller gets the raw-totals fallback, and a detached task
//! waits for the scorer and overwrites the cached fallback if it eventually
//! succeeds. Nothing is ever surfaced to the caller as an error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use super::aggregator::LeaderboardAggregator;
use super::cache::LeaderboardCache;
use super::error::{LeaderboardError, Result};
use super::models::{
    LeaderboardEntry, LeaderboardQuery, LeaderboardQueryKey, QueryScope, ScoredRow, TimePeriod,
    UserId,
};
use super::providers::{
    AuthoritativeScorer, GroupDirectory, PointBreakdownStore, ProfileStore, RawPointStore,
};
use super::ranking::{entries_from_scored, rank_entries};
use crate::config::LeaderboardSettings;

type ScorerOutcome = std::result::Result<anyhow::Result<Vec<ScoredRow>>, JoinError>;

/// Single-assignment "race resolved" cell, one per invocation.
///
/// Whoever claims it first owns the authoritative write for that invocation.
#[derive(Debug, Clone, Default)]
pub struct RaceGuard(Arc<AtomicBool>);

impl RaceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the resolution. Returns false if it was already claimed.
    pub fn resolve(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn is_resolved(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Everything the service reads from
#[derive(Clone)]
pub struct Collaborators {
    pub scorer: Arc<dyn AuthoritativeScorer>,
    pub groups: Arc<dyn GroupDirectory>,
    pub raw_points: Arc<dyn RawPointStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub breakdowns: Arc<dyn PointBreakdownStore>,
}

impl Collaborators {
    /// Use one backend for every collaborator
    pub fn from_shared<T>(backend: Arc<T>) -> Self
    where
        T: AuthoritativeScorer
            + GroupDirectory
            + RawPointStore
            + ProfileStore
            + PointBreakdownStore
            + 'static,
    {
        Self {
            scorer: backend.clone(),
            groups: backend.clone(),
            raw_points: backend.clone(),
            profiles: backend.clone(),
            breakdowns: backend,
        }
    }
}

/// Serves ranked leaderboards with a deadline-bounded hedged read
#[derive(Clone)]
pub struct RankedLeaderboardService {
    scorer: Arc<dyn AuthoritativeScorer>,
    groups: Arc<dyn GroupDirectory>,
    profiles: Arc<dyn ProfileStore>,
    breakdowns: Arc<dyn PointBreakdownStore>,
    aggregator: LeaderboardAggregator,
    cache: LeaderboardCache,
    deadline: Duration,
}

impl RankedLeaderboardService {
    pub fn new(collaborators: Collaborators, settings: &LeaderboardSettings) -> Self {
        Self {
            aggregator: LeaderboardAggregator::new(
                collaborators.raw_points,
                collaborators.profiles.clone(),
            ),
            scorer: collaborators.scorer,
            groups: collaborators.groups,
            profiles: collaborators.profiles,
            breakdowns: collaborators.breakdowns,
            cache: LeaderboardCache::new(settings.cache_ttl()),
            deadline: settings.deadline(),
        }
    }

    pub fn cache(&self) -> &LeaderboardCache {
        &self.cache
    }

    /// Drop cached results for a viewer, e.g. after they log new activity
    pub fn invalidate(&self, viewer_id: &str) {
        let dropped = self.cache.invalidate_viewer(viewer_id);
        debug!(viewer_id, dropped, "Leaderboard cache invalidated");
    }

    /// Ranked entries for `query`. Never fails; worst case is `[]`.
    pub async fn get_leaderboard(&self, query: &LeaderboardQuery) -> Vec<LeaderboardEntry> {
        let Some(key) = query.key() else {
            debug!("{}", LeaderboardError::MissingViewer);
            return Vec::new();
        };

        if let Some(entries) = self.cache.get(&key) {
            debug!(viewer_id = %key.viewer_id, entries = entries.len(), "Leaderboard cache hit");
            return entries;
        }

        match self.fetch(key, query.period).await {
            Ok(entries) => entries,
            Err(e @ LeaderboardError::NoGroupFound(_)) => {
                debug!("{e}");
                Vec::new()
            }
            Err(e) => {
                warn!("Leaderboard unavailable: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch(
        &self,
        key: LeaderboardQueryKey,
        period: TimePeriod,
    ) -> Result<Vec<LeaderboardEntry>> {
        // The scorer only knows the viewer's current group
        if let QueryScope::Group(group_id) = &key.scope {
            let entries = self.aggregator.build(group_id, key.limit).await?;
            self.cache.insert(key, entries.clone());
            return Ok(entries);
        }

        let group = self
            .groups
            .current_group(&key.viewer_id)
            .await
            .unwrap_or_else(|e| {
                warn!(viewer_id = %key.viewer_id, "Group lookup failed: {e:#}");
                None
            });
        let Some(group_id) = group else {
            return Err(LeaderboardError::NoGroupFound(key.viewer_id));
        };

        self.race(key, period, group_id).await
    }

    async fn race(
        &self,
        key: LeaderboardQueryKey,
        period: TimePeriod,
        group_id: String,
    ) -> Result<Vec<LeaderboardEntry>> {
        let guard = RaceGuard::new();
        let scorer = self.scorer.clone();
        let viewer_id = key.viewer_id.clone();
        let limit = key.limit;
        let mut scoring: JoinHandle<anyhow::Result<Vec<ScoredRow>>> =
            tokio::spawn(async move { scorer.compute(&viewer_id, period, limit).await });

        match tokio::time::timeout(self.deadline, &mut scoring).await {
            Ok(outcome) => match scored_rows(outcome) {
                Ok(rows) => {
                    let entries = self.enrich_scored(rows, limit).await;
                    guard.resolve();
                    debug!(
                        viewer_id = %key.viewer_id,
                        entries = entries.len(),
                        "Authoritative leaderboard won the race"
                    );
                    self.cache.insert(key, entries.clone());
                    Ok(entries)
                }
                Err(e) => {
                    warn!(viewer_id = %key.viewer_id, "{e}; serving raw totals");
                    let entries = self.aggregator.build(&group_id, limit).await?;
                    self.cache.insert(key, entries.clone());
                    Ok(entries)
                }
            },
            Err(_) => {
                warn!(
                    viewer_id = %key.viewer_id,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Authoritative scorer missed the deadline; serving raw totals"
                );
                let fallback = self.aggregator.build(&group_id, limit).await;
                if let Ok(entries) = &fallback {
                    self.cache.insert(key.clone(), entries.clone());
                }
                // Spawned after the fallback write so the late result lands last
                self.spawn_reconcile(key, scoring, guard);
                fallback
            }
        }
    }

    /// Wait for a late scorer and replace the cached fallback with its result
    fn spawn_reconcile(
        &self,
        key: LeaderboardQueryKey,
        scoring: JoinHandle<anyhow::Result<Vec<ScoredRow>>>,
        guard: RaceGuard,
    ) {
        let service = self.clone();
        tokio::spawn(async move {
            let rows = match scored_rows(scoring.await) {
                Ok(rows) => rows,
                Err(e) => {
                    debug!(viewer_id = %key.viewer_id, "Keeping fallback: {e}");
                    return;
                }
            };
            if !guard.resolve() {
                debug!(viewer_id = %key.viewer_id, "Race already resolved; dropping late result");
                return;
            }

            let entries = service.enrich_scored(rows, key.limit).await;
            info!(
                viewer_id = %key.viewer_id,
                entries = entries.len(),
                "Late authoritative leaderboard replaced cached fallback"
            );
            service.cache.insert(key, entries);
        });
    }

    /// Attach profiles, point breakdowns, and badges, then rank
    async fn enrich_scored(&self, rows: Vec<ScoredRow>, limit: usize) -> Vec<LeaderboardEntry> {
        let user_ids: Vec<UserId> = rows.iter().map(|r| r.user_id.clone()).collect();
        let (profiles, breakdowns) = futures::join!(
            self.profiles.query(&user_ids),
            self.breakdowns.query(&user_ids)
        );
        let profiles = profiles.unwrap_or_else(|e| {
            warn!("Profile lookup failed: {e:#}");
            HashMap::new()
        });
        let breakdowns = breakdowns.unwrap_or_else(|e| {
            warn!("Point breakdown lookup failed: {e:#}");
            HashMap::new()
        });
        rank_entries(entries_from_scored(rows, &profiles, &breakdowns), limit)
    }
}

/// Non-empty scorer rows, or why there are none
fn scored_rows(outcome: ScorerOutcome) -> Result<Vec<ScoredRow>> {
    match outcome {
        Ok(Ok(rows)) if rows.is_empty() => Err(LeaderboardError::AuthoritativeUnavailable(
            "no rows returned".to_string(),
        )),
        Ok(Ok(rows)) => Ok(rows),
        Ok(Err(e)) => Err(LeaderboardError::AuthoritativeUnavailable(format!("{e:#}"))),
        Err(e) => Err(LeaderboardError::AuthoritativeUnavailable(format!(
            "scorer task failed: {e}"
        ))),
    }
}
