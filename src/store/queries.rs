//! Leaderboard collaborators backed by the points database
//!
//! The authoritative scorer aggregates the point ledger on every call; the raw
//! point store reads the incrementally maintained totals. The aggregate runs on
//! its own reader connection and every trait call runs on the blocking pool, so
//! a slow aggregate never stalls the fallback reads.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params_from_iter, Connection};

use super::db::PointsDb;
use super::time_bucket::{cutoff_day, parse_day};
use crate::leaderboard::{
    ActivityStats, AuthoritativeScorer, GroupDirectory, GroupId, PointBreakdownStore,
    PointComponents, Profile, ProfileStore, RawPointStore, RawUserPoints, ScoredRow, TimePeriod,
    UserId,
};

/// SQLite implementation of every leaderboard collaborator
#[derive(Clone)]
pub struct SqliteLeaderboard {
    db: PointsDb,
    scoring: PointsDb,
}

impl SqliteLeaderboard {
    /// `scoring` serves the ledger aggregate; `db` serves everything else
    pub fn new(db: PointsDb, scoring: PointsDb) -> Self {
        Self { db, scoring }
    }

    /// Run a synchronous query on the blocking pool
    async fn blocking<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteLeaderboard) -> Result<T> + Send + 'static,
    {
        let board = self.clone();
        tokio::task::spawn_blocking(move || query(&board))
            .await
            .context("Leaderboard query task failed")?
    }

    fn current_group_of(conn: &Connection, user_id: &str) -> Result<Option<GroupId>> {
        let mut stmt = conn.prepare(
            "SELECT group_id FROM group_members WHERE user_id = ? ORDER BY joined_at DESC, rowid DESC LIMIT 1",
        )?;
        let mut rows = stmt.query_map([user_id], |row| row.get::<_, String>(0))?;
        let group = rows.next().transpose()?;
        Ok(group)
    }

    /// Aggregate the ledger for the viewer's current group
    pub fn score(&self, viewer_id: &str, period: TimePeriod, limit: usize) -> Result<Vec<ScoredRow>> {
        let conn = self.scoring.conn();
        let Some(group_id) = Self::current_group_of(&conn, viewer_id)? else {
            return Ok(Vec::new());
        };
        let cutoff = period
            .days()
            .map(|days| cutoff_day(days, Utc::now().timestamp_millis()))
            .unwrap_or_default();

        let mut stmt = conn.prepare(
            r#"SELECT e.user_id,
                      SUM(e.performance + e.recovery + e.synergy) AS total,
                      COUNT(DISTINCT e.day_bucket),
                      MAX(e.day_bucket),
                      MAX(t.streak_days)
               FROM point_events e
               LEFT JOIN user_totals t ON t.group_id = e.group_id AND t.user_id = e.user_id
               WHERE e.group_id = ?1 AND e.day_bucket >= ?2
               GROUP BY e.user_id
               ORDER BY total DESC, MAX(e.day_bucket) ASC, e.user_id ASC
               LIMIT ?3"#,
        )?;
        let rows = stmt.query_map(
            rusqlite::params![group_id, cutoff, limit as i64],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<u32>>(4)?,
                ))
            },
        )?;

        let mut scored = Vec::new();
        for (index, row) in rows.enumerate() {
            let (user_id, total, active_days, last_day, streak_days) = row?;
            scored.push(ScoredRow {
                user_id,
                total_points: total.max(0) as u64,
                rank: Some(index as u32 + 1),
                activity: ActivityStats {
                    streak_days,
                    last_activity_date: last_day.as_deref().and_then(parse_day),
                    active_days: Some(active_days),
                },
            });
        }
        Ok(scored)
    }

    /// Raw totals for every member with points in `group_id`
    pub fn raw_totals(&self, group_id: &str) -> Result<Vec<RawUserPoints>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT user_id, points, streak_days, last_activity_day FROM user_totals WHERE group_id = ?",
        )?;
        let rows = stmt.query_map([group_id], |row| {
            Ok(RawUserPoints {
                user_id: row.get(0)?,
                points: row.get::<_, i64>(1)?.max(0) as u64,
                streak_days: row.get(2)?,
                last_activity_date: row
                    .get::<_, Option<String>>(3)?
                    .as_deref()
                    .and_then(parse_day),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read totals for group {group_id}"))
    }

    pub fn profiles(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Profile>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let conn = self.db.conn();
        let sql = format!(
            "SELECT user_id, display_name, avatar FROM profiles WHERE user_id IN ({})",
            placeholders(user_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(user_ids), |row| {
            Ok((
                row.get::<_, String>(0)?,
                Profile {
                    display_name: row.get(1)?,
                    avatar: row.get(2)?,
                },
            ))
        })?;
        Ok(rows.collect::<rusqlite::Result<HashMap<_, _>>>()?)
    }

    /// Lifetime point components per user
    pub fn breakdowns(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, PointComponents>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let conn = self.db.conn();
        let sql = format!(
            "SELECT user_id, SUM(performance), SUM(recovery), SUM(synergy) FROM point_events WHERE user_id IN ({}) GROUP BY user_id",
            placeholders(user_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(user_ids), |row| {
            Ok((
                row.get::<_, String>(0)?,
                PointComponents {
                    performance: row.get::<_, i64>(1)?.max(0) as u64,
                    recovery: row.get::<_, i64>(2)?.max(0) as u64,
                    synergy: row.get::<_, i64>(3)?.max(0) as u64,
                },
            ))
        })?;
        Ok(rows.collect::<rusqlite::Result<HashMap<_, _>>>()?)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[async_trait]
impl AuthoritativeScorer for SqliteLeaderboard {
    async fn compute(
        &self,
        viewer_id: &str,
        period: TimePeriod,
        limit: usize,
    ) -> Result<Vec<ScoredRow>> {
        let viewer_id = viewer_id.to_string();
        self.blocking(move |board| board.score(&viewer_id, period, limit))
            .await
    }
}

#[async_trait]
impl GroupDirectory for SqliteLeaderboard {
    async fn current_group(&self, viewer_id: &str) -> Result<Option<GroupId>> {
        let viewer_id = viewer_id.to_string();
        self.blocking(move |board| {
            let conn = board.db.conn();
            Self::current_group_of(&conn, &viewer_id)
        })
        .await
    }
}

#[async_trait]
impl RawPointStore for SqliteLeaderboard {
    async fn query(&self, group_id: &str) -> Result<Vec<RawUserPoints>> {
        let group_id = group_id.to_string();
        self.blocking(move |board| board.raw_totals(&group_id)).await
    }
}

#[async_trait]
impl ProfileStore for SqliteLeaderboard {
    async fn query(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Profile>> {
        let user_ids = user_ids.to_vec();
        self.blocking(move |board| board.profiles(&user_ids)).await
    }
}

#[async_trait]
impl PointBreakdownStore for SqliteLeaderboard {
    async fn query(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, PointComponents>> {
        let user_ids = user_ids.to_vec();
        self.blocking(move |board| board.breakdowns(&user_ids)).await
    }
}
