//! Writes activity into the database
//!
//! Every point event is appended to the ledger and folded into the raw
//! per-user totals on the same connection.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use super::db::PointsDb;
use super::time_bucket::day_bucket;

/// One scored activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEventRecord {
    pub user_id: String,
    pub group_id: String,
    pub performance: u32,
    pub recovery: u32,
    pub synergy: u32,
    /// Streak length after this activity, as tracked by the activity log
    pub streak_days: u32,
    /// Unix milliseconds
    pub created_at: i64,
}

impl PointEventRecord {
    pub fn points(&self) -> i64 {
        i64::from(self.performance) + i64::from(self.recovery) + i64::from(self.synergy)
    }
}

#[derive(Clone)]
pub struct PointsRecorder {
    db: PointsDb,
}

impl PointsRecorder {
    pub fn new(db: PointsDb) -> Self {
        Self { db }
    }

    /// Record a scored activity
    pub fn record_points(&self, record: &PointEventRecord) -> Result<()> {
        let day = day_bucket(record.created_at);
        let now = Utc::now().timestamp_millis();

        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO point_events
               (user_id, group_id, performance, recovery, synergy, created_at, day_bucket)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            rusqlite::params![
                record.user_id, record.group_id, record.performance, record.recovery,
                record.synergy, record.created_at, day,
            ],
        )?;
        Self::update_user_totals(&conn, record, &day, now)?;
        Ok(())
    }

    fn update_user_totals(conn: &Connection, record: &PointEventRecord, day: &str, now: i64) -> Result<()> {
        conn.execute(
            r#"INSERT INTO user_totals (group_id, user_id, points, streak_days, last_activity_day, active_days, last_updated)
               VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
               ON CONFLICT(group_id, user_id) DO UPDATE SET
                   points = points + ?3,
                   active_days = active_days + (CASE WHEN last_activity_day IS NULL OR last_activity_day < ?5 THEN 1 ELSE 0 END),
                   streak_days = CASE WHEN last_activity_day IS NULL OR last_activity_day <= ?5 THEN ?4 ELSE streak_days END,
                   last_activity_day = MAX(COALESCE(last_activity_day, ?5), ?5),
                   last_updated = ?6"#,
            rusqlite::params![record.group_id, record.user_id, record.points(), record.streak_days, day, now],
        )?;
        Ok(())
    }

    /// Add `user_id` to `group_id`. Re-joining moves the group to the front.
    pub fn join_group(&self, user_id: &str, group_id: &str, joined_at: i64) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(group_id, user_id) DO UPDATE SET joined_at = ?3"#,
            (group_id, user_id, joined_at),
        )?;
        Ok(())
    }

    pub fn upsert_profile(&self, user_id: &str, display_name: &str, avatar: Option<&str>) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO profiles (user_id, display_name, avatar) VALUES (?1, ?2, ?3)
               ON CONFLICT(user_id) DO UPDATE SET display_name = ?2, avatar = ?3"#,
            (user_id, display_name, avatar),
        )?;
        Ok(())
    }
}
