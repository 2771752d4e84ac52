//! CLI command implementations

pub mod init;
pub mod leaderboard;
pub mod progress;
pub mod record;
