//! Leaderboard timing settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Leaderboard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    /// How long to wait for the authoritative scorer before serving the
    /// raw-totals fallback (milliseconds)
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// How long a cached leaderboard stays fresh (seconds)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Entries returned when the caller gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_deadline_ms() -> u64 {
    2000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_limit() -> usize {
    crate::leaderboard::DEFAULT_LIMIT
}

impl LeaderboardSettings {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            default_limit: default_limit(),
        }
    }
}
