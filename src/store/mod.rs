//! Points database for streakboard
//!
//! Records scored activity, group memberships, and profiles in a SQLite
//! database (`~/.streakboard/streakboard.db`) and serves them to the
//! leaderboard through its collaborator traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  record   ┌──────────────────────────────┐
//! │ PointsRecorder  │──────────►│ point_events  (ledger)       │──► AuthoritativeScorer
//! └─────────────────┘           │ user_totals   (raw totals)   │──► RawPointStore
//!                               │ group_members / profiles     │──► GroupDirectory, ProfileStore
//!                               └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let store = PointsStore::new()?;
//! store.recorder().record_points(&record)?;
//! let service = RankedLeaderboardService::new(store.collaborators(), &config.leaderboard);
//! ```

mod db;
mod queries;
mod recorder;
mod time_bucket;

pub use db::PointsDb;
pub use queries::SqliteLeaderboard;
pub use recorder::{PointEventRecord, PointsRecorder};
pub use time_bucket::{cutoff_day, day_bucket, parse_day};

use std::sync::Arc;

use anyhow::Result;

use crate::leaderboard::Collaborators;

/// Entry point to the points database
#[derive(Clone)]
pub struct PointsStore {
    db: PointsDb,
    scoring: PointsDb,
}

impl PointsStore {
    /// Open the database at the default location
    pub fn new() -> Result<Self> {
        Self::from_db(PointsDb::open_default()?)
    }

    /// Open the database at a custom path
    pub fn with_path(path: &std::path::Path) -> Result<Self> {
        Self::from_db(PointsDb::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_db(PointsDb::open_in_memory()?)
    }

    fn from_db(db: PointsDb) -> Result<Self> {
        let scoring = db.reader()?;
        Ok(Self { db, scoring })
    }

    /// Get a recorder for writing activity
    pub fn recorder(&self) -> PointsRecorder {
        PointsRecorder::new(self.db.clone())
    }

    /// Get the leaderboard read side
    pub fn leaderboard(&self) -> SqliteLeaderboard {
        SqliteLeaderboard::new(self.db.clone(), self.scoring.clone())
    }

    /// Every leaderboard collaborator, backed by this database
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::from_shared(Arc::new(self.leaderboard()))
    }

    /// Delete all recorded points
    pub fn reset_points(&self) -> Result<()> {
        self.db.reset_points()
    }
}
