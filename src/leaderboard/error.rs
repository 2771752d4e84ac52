//! Leaderboard failure taxonomy
//!
//! None of these ever reach a caller of
//! [`RankedLeaderboardService::get_leaderboard`](super::RankedLeaderboardService::get_leaderboard);
//! they are logged and turned into an empty or fallback result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// No viewer id on the query
    #[error("no viewer id supplied")]
    MissingViewer,

    /// The viewer has no group membership
    #[error("no group found for viewer {0}")]
    NoGroupFound(String),

    /// Scorer errored, returned nothing, or missed the deadline
    #[error("authoritative scorer unavailable: {0}")]
    AuthoritativeUnavailable(String),

    /// The raw point store could not be read
    #[error("raw point store unavailable: {0:#}")]
    FallbackUnavailable(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
