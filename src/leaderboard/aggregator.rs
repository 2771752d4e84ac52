//! Fallback leaderboard built straight from raw point totals

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error::{LeaderboardError, Result};
use super::models::{LeaderboardEntry, UserId};
use super::providers::{ProfileStore, RawPointStore};
use super::ranking::{entries_from_raw, rank_entries};

/// Builds partial leaderboard entries from the raw point store
#[derive(Clone)]
pub struct LeaderboardAggregator {
    raw: Arc<dyn RawPointStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl LeaderboardAggregator {
    pub fn new(raw: Arc<dyn RawPointStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { raw, profiles }
    }

    /// Ranked, partial entries for `group_id`
    pub async fn build(&self, group_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let rows = self
            .raw
            .query(group_id)
            .await
            .map_err(LeaderboardError::FallbackUnavailable)?;
        debug!(group_id, rows = rows.len(), "Raw point totals loaded");

        let user_ids: Vec<UserId> = rows.iter().map(|r| r.user_id.clone()).collect();
        let profiles = if user_ids.is_empty() {
            HashMap::new()
        } else {
            self.profiles.query(&user_ids).await.unwrap_or_else(|e| {
                warn!(group_id, "Profile lookup failed: {e:#}");
                HashMap::new()
            })
        };

        Ok(rank_entries(entries_from_raw(rows, &profiles), limit))
    }
}
