//! Database location settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to `~/.streakboard/streakboard.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
}
