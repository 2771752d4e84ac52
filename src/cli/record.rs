//! Commands that write activity into the points database

use anyhow::Result;
use chrono::Utc;

use streakboard::store::{PointEventRecord, PointsStore};

/// Point components for one recorded activity
pub struct PointArgs {
    pub performance: u32,
    pub recovery: u32,
    pub synergy: u32,
    pub streak: u32,
}

pub fn record_command(store: &PointsStore, user: &str, group: &str, args: PointArgs) -> Result<()> {
    let record = PointEventRecord {
        user_id: user.to_string(),
        group_id: group.to_string(),
        performance: args.performance,
        recovery: args.recovery,
        synergy: args.synergy,
        streak_days: args.streak,
        created_at: Utc::now().timestamp_millis(),
    };
    store.recorder().record_points(&record)?;
    println!("Recorded {} points for {} in {}", record.points(), user, group);
    Ok(())
}

pub fn join_command(store: &PointsStore, user: &str, group: &str) -> Result<()> {
    store
        .recorder()
        .join_group(user, group, Utc::now().timestamp_millis())?;
    println!("{} joined {}", user, group);
    Ok(())
}

pub fn profile_command(
    store: &PointsStore,
    user: &str,
    display_name: &str,
    avatar: Option<&str>,
) -> Result<()> {
    store.recorder().upsert_profile(user, display_name, avatar)?;
    println!("Updated profile for {}", user);
    Ok(())
}
