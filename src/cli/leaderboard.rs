//! Leaderboard command implementation

use anyhow::Result;

use streakboard::config::Config;
use streakboard::leaderboard::{
    DataCompleteness, LeaderboardQuery, RankedLeaderboardService, TimePeriod,
};
use streakboard::store::PointsStore;

pub struct LeaderboardArgs {
    pub viewer: Option<String>,
    pub limit: Option<usize>,
    pub period: TimePeriod,
    pub group: Option<String>,
    pub json: bool,
}

/// Print the ranked leaderboard for a viewer
pub async fn leaderboard_command(
    config: &Config,
    store: &PointsStore,
    args: LeaderboardArgs,
) -> Result<()> {
    let service = RankedLeaderboardService::new(store.collaborators(), &config.leaderboard);
    let query = LeaderboardQuery {
        viewer_id: args.viewer,
        limit: args.limit.unwrap_or(config.leaderboard.default_limit),
        period: args.period,
        group_id: args.group,
    };

    let entries = service.get_leaderboard(&query).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No leaderboard entries.");
        return Ok(());
    }

    let partial = entries
        .iter()
        .any(|e| e.data_completeness == DataCompleteness::Partial);
    println!(
        "Leaderboard ({}, {} entries{}):\n",
        query.group_id.as_deref().unwrap_or(query.period.as_str()),
        entries.len(),
        if partial { ", raw totals" } else { "" }
    );

    for entry in &entries {
        println!(
            "  #{:<3} {:<24} {:>8} pts",
            entry.rank, entry.display_name, entry.total_points
        );
        if entry.data_completeness == DataCompleteness::Full {
            let c = entry.point_components;
            println!(
                "       performance {} / recovery {} / synergy {}",
                c.performance, c.recovery, c.synergy
            );
        }
        if let Some(days) = entry.activity_stats.streak_days.filter(|d| *d > 0) {
            println!("       streak {} days", days);
        }
    }

    Ok(())
}
