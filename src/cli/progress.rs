//! Level and streak commands

use anyhow::Result;

use streakboard::progression::{
    current_milestone, new_milestone, next_milestone, progress_to_next_milestone,
    streak_rewards, streak_xp_multiplier, user_level_info,
};

/// Show level state for an XP total
pub fn level_command(xp: i64, json: bool) -> Result<()> {
    let info = user_level_info(xp);
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Level {} ({} XP)", info.level, info.total_xp);
    println!(
        "  {}% to level {} ({} XP to go, next at {})",
        info.progress_percent,
        info.level + 1,
        info.xp_to_next,
        info.next_level_xp
    );
    Ok(())
}

/// Show milestone state for a streak, and what a move from `previous` unlocks
pub fn streak_command(days: u32, previous: Option<u32>, json: bool) -> Result<()> {
    let unlocked = previous.and_then(|prev| new_milestone(prev, days));

    if json {
        let value = serde_json::json!({
            "days": days,
            "xpBonus": streak_xp_multiplier(i64::from(days)),
            "current": current_milestone(days),
            "next": next_milestone(days),
            "progressPercent": progress_to_next_milestone(days),
            "rewards": streak_rewards(days),
            "unlocked": unlocked,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Streak: {} days (+{} XP bonus)", days, streak_xp_multiplier(i64::from(days)));
    match current_milestone(days) {
        Some(m) => println!("  Current milestone: {} days [{}]", m.days, m.badge),
        None => println!("  No milestone yet"),
    }
    match next_milestone(days) {
        Some(m) => println!(
            "  Next: {} days ({}% there, +{} XP)",
            m.days,
            progress_to_next_milestone(days),
            m.xp_reward
        ),
        None => println!("  All milestones reached"),
    }
    if let Some(m) = unlocked {
        println!("  Unlocked: {} (+{} XP)", m.title_key, m.xp_reward);
    }
    Ok(())
}
