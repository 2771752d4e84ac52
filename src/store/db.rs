//! SQLite database connection and schema management
//!
//! Manages the `~/.streakboard/streakboard.db` database with automatic schema migration.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::Config;

/// Shared database handle
#[derive(Clone)]
pub struct PointsDb {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl PointsDb {
    /// Open or create the database at the default location (~/.streakboard/streakboard.db)
    pub fn open_default() -> Result<Self> {
        let db_path = Config::global_config_dir().join("streakboard.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create db dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open db: {}", path.display()))?;

        // WAL so the CLI can read while a recorder writes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// A second, query-only connection for long aggregate reads.
    ///
    /// WAL lets it read while the primary connection serves the cheap
    /// queries. In-memory databases cannot be reopened, so they share the
    /// primary connection.
    pub fn reader(&self) -> Result<Self> {
        let Some(path) = &self.path else {
            return Ok(self.clone());
        };
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open db reader: {}", path.display()))?;
        conn.pragma_update(None, "query_only", "ON")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.clone()),
        })
    }

    /// Lock the connection
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: active day counter on the raw totals
        if version < 2 {
            let has_active_days: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('user_totals') WHERE name = 'active_days'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_active_days {
                conn.execute_batch(
                    "ALTER TABLE user_totals ADD COLUMN active_days INTEGER NOT NULL DEFAULT 0;",
                )?;
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Delete all recorded activity. Profiles and memberships are kept.
    pub fn reset_points(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
            DELETE FROM point_events;
            DELETE FROM user_totals;
            "#,
        )?;
        Ok(())
    }
}

/// SQL schema
const SCHEMA_SQL: &str = r#"
-- Display data, shared by every leaderboard path
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    avatar TEXT
);

-- Group memberships; the latest join is the user's current group
CREATE TABLE IF NOT EXISTS group_members (
    group_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    joined_at INTEGER NOT NULL,
    PRIMARY KEY (group_id, user_id)
);
CREATE INDEX IF NOT EXISTS idx_member_user ON group_members(user_id, joined_at);

-- Point ledger (append-only, one row per scored activity)
CREATE TABLE IF NOT EXISTS point_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    group_id TEXT NOT NULL,
    performance INTEGER NOT NULL DEFAULT 0,
    recovery INTEGER NOT NULL DEFAULT 0,
    synergy INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    day_bucket TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_event_group_day ON point_events(group_id, day_bucket);
CREATE INDEX IF NOT EXISTS idx_event_user ON point_events(user_id);

-- Raw per-user totals, maintained on every recorded event
CREATE TABLE IF NOT EXISTS user_totals (
    group_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    streak_days INTEGER NOT NULL DEFAULT 0,
    last_activity_day TEXT,
    last_updated INTEGER NOT NULL,
    PRIMARY KEY (group_id, user_id)
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;
