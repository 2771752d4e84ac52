//! Group leaderboard with a hedged read
//!
//! Two ways to compute the same ranking:
//!
//! - **Authoritative**: [`AuthoritativeScorer`], a precomputed aggregate with
//!   point breakdowns. Accurate, slow, sometimes unavailable.
//! - **Fallback**: [`LeaderboardAggregator`] over raw per-user totals. Always
//!   available, marked [`DataCompleteness::Partial`].
//!
//! [`RankedLeaderboardService`] races the first against a deadline, falls
//! back to the second, and quietly corrects its cache when a late
//! authoritative result arrives.
//!
//! # Usage
//!
//! ```ignore
//! let service = RankedLeaderboardService::new(collaborators, &config.leaderboard);
//! let entries = service
//!     .get_leaderboard(&LeaderboardQuery::for_viewer("u1").with_period(TimePeriod::Week))
//!     .await;
//! ```

mod aggregator;
mod cache;
mod error;
mod models;
mod providers;
mod ranking;
mod service;

pub use aggregator::LeaderboardAggregator;
pub use cache::LeaderboardCache;
pub use error::LeaderboardError;
pub use models::{
    ActivityStats, DataCompleteness, GroupId, LeaderboardEntry, LeaderboardQuery,
    LeaderboardQueryKey, PointComponents, Profile, QueryScope, RawUserPoints, ScoredRow,
    TimePeriod, UserId, DEFAULT_LIMIT,
};
pub use providers::{
    AuthoritativeScorer, GroupDirectory, PointBreakdownStore, ProfileStore, RawPointStore,
};
pub use ranking::{compare_entries, rank_entries};
pub use service::{Collaborators, RaceGuard, RankedLeaderboardService};
