//! Leaderboard data types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::progression::Badge;

pub type UserId = String;
pub type GroupId = String;

/// Default number of entries returned
pub const DEFAULT_LIMIT: usize = 100;

/// Time window the authoritative scorer aggregates over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    #[default]
    Overall,
    Week,
    Month,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overall" | "all" => Some(Self::Overall),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    /// Number of days covered, `None` for all time
    pub fn days(&self) -> Option<u32> {
        match self {
            Self::Overall => None,
            Self::Week => Some(7),
            Self::Month => Some(30),
        }
    }
}

/// A leaderboard request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub viewer_id: Option<UserId>,
    pub limit: usize,
    pub period: TimePeriod,
    /// Explicit group or challenge. Bypasses the authoritative scorer.
    pub group_id: Option<GroupId>,
}

impl LeaderboardQuery {
    pub fn for_viewer(viewer_id: impl Into<UserId>) -> Self {
        Self {
            viewer_id: Some(viewer_id.into()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_period(mut self, period: TimePeriod) -> Self {
        self.period = period;
        self
    }

    pub fn with_group(mut self, group_id: impl Into<GroupId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Cache key, `None` without a viewer
    pub fn key(&self) -> Option<LeaderboardQueryKey> {
        let viewer_id = self.viewer_id.clone()?;
        let scope = match &self.group_id {
            Some(group) => QueryScope::Group(group.clone()),
            None => QueryScope::Period(self.period),
        };
        Some(LeaderboardQueryKey {
            viewer_id,
            limit: self.limit,
            scope,
        })
    }
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            viewer_id: None,
            limit: DEFAULT_LIMIT,
            period: TimePeriod::default(),
            group_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryScope {
    Period(TimePeriod),
    Group(GroupId),
}

/// Identifies one cached leaderboard result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaderboardQueryKey {
    pub viewer_id: UserId,
    pub limit: usize,
    pub scope: QueryScope,
}

/// Whether an entry came from the authoritative scorer or the raw fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCompleteness {
    Full,
    Partial,
}

/// Point breakdown; all zero when unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointComponents {
    pub performance: u64,
    pub recovery: u64,
    pub synergy: u64,
}

impl PointComponents {
    pub fn total(&self) -> u64 {
        self.performance + self.recovery + self.synergy
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub streak_days: Option<u32>,
    pub last_activity_date: Option<NaiveDate>,
    pub active_days: Option<u32>,
}

/// One ranked row as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub avatar: Option<String>,
    pub total_points: u64,
    pub point_components: PointComponents,
    pub activity_stats: ActivityStats,
    pub badges: Vec<Badge>,
    /// 1-based, contiguous
    pub rank: u32,
    pub data_completeness: DataCompleteness,
}

/// Row produced by the authoritative scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRow {
    pub user_id: UserId,
    pub total_points: u64,
    /// Upstream rank. Never trusted; ranks are reassigned after sorting.
    pub rank: Option<u32>,
    pub activity: ActivityStats,
}

/// Raw per-user totals used by the fallback path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUserPoints {
    pub user_id: UserId,
    pub points: u64,
    pub streak_days: u32,
    pub last_activity_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub avatar: Option<String>,
}
