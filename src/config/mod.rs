//! Configuration loading and management

mod database;
mod io;
mod leaderboard;

pub use database::DatabaseSettings;
pub use leaderboard::LeaderboardSettings;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Leaderboard race and cache timing
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,

    /// Database location
    #[serde(default)]
    pub database: DatabaseSettings,
}
