//! Collaborator traits the leaderboard reads from

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::models::{
    GroupId, PointComponents, Profile, RawUserPoints, ScoredRow, TimePeriod, UserId,
};

/// Precomputed aggregate scorer. Accurate but slow and not always available.
///
/// Scoped to the viewer's current group; there is no group override.
/// Must tolerate redundant calls.
#[async_trait]
pub trait AuthoritativeScorer: Send + Sync {
    async fn compute(
        &self,
        viewer_id: &str,
        period: TimePeriod,
        limit: usize,
    ) -> Result<Vec<ScoredRow>>;
}

/// Looks up which group a viewer belongs to
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Most recently joined group, if any
    async fn current_group(&self, viewer_id: &str) -> Result<Option<GroupId>>;
}

/// Raw per-user point totals, the source of truth for the fallback path
#[async_trait]
pub trait RawPointStore: Send + Sync {
    async fn query(&self, group_id: &str) -> Result<Vec<RawUserPoints>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn query(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Profile>>;
}

/// Point component breakdown, only used to enrich authoritative rows
#[async_trait]
pub trait PointBreakdownStore: Send + Sync {
    async fn query(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, PointComponents>>;
}
