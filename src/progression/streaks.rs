//! Streak milestone tracking
//!
//! Streak lengths are mapped onto a fixed, ascending catalog of milestones.
//! Every function here is total over non-negative streak lengths.

use chrono::NaiveDate;
use serde::Serialize;

use super::levels::percent;

/// A fixed streak-length threshold that grants a one-time reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakMilestone {
    pub days: u32,
    pub title_key: &'static str,
    pub xp_reward: u32,
    pub badge: &'static str,
    pub color_gradient: &'static str,
}

/// All streak milestones (must be sorted by days)
pub static STREAK_MILESTONES: &[StreakMilestone] = &[
    StreakMilestone {
        days: 3,
        title_key: "streak.milestone.spark",
        xp_reward: 25,
        badge: "spark",
        color_gradient: "from-amber-300 to-orange-400",
    },
    StreakMilestone {
        days: 7,
        title_key: "streak.milestone.week",
        xp_reward: 50,
        badge: "flame",
        color_gradient: "from-orange-400 to-red-500",
    },
    StreakMilestone {
        days: 14,
        title_key: "streak.milestone.fortnight",
        xp_reward: 100,
        badge: "blaze",
        color_gradient: "from-red-500 to-rose-600",
    },
    StreakMilestone {
        days: 30,
        title_key: "streak.milestone.month",
        xp_reward: 250,
        badge: "inferno",
        color_gradient: "from-rose-500 to-fuchsia-600",
    },
    StreakMilestone {
        days: 50,
        title_key: "streak.milestone.fifty",
        xp_reward: 500,
        badge: "comet",
        color_gradient: "from-fuchsia-500 to-violet-600",
    },
    StreakMilestone {
        days: 100,
        title_key: "streak.milestone.century",
        xp_reward: 1000,
        badge: "supernova",
        color_gradient: "from-violet-500 to-indigo-600",
    },
    StreakMilestone {
        days: 365,
        title_key: "streak.milestone.year",
        xp_reward: 5000,
        badge: "eternal",
        color_gradient: "from-indigo-500 to-sky-400",
    },
];

/// Milestones already reached at `streak` (a prefix of the catalog)
pub fn streak_rewards(streak: u32) -> &'static [StreakMilestone] {
    let reached = STREAK_MILESTONES.partition_point(|m| m.days <= streak);
    &STREAK_MILESTONES[..reached]
}

/// Highest milestone reached at `streak`
pub fn current_milestone(streak: u32) -> Option<&'static StreakMilestone> {
    streak_rewards(streak).last()
}

/// Next milestone to reach, `None` once the catalog is exhausted
pub fn next_milestone(streak: u32) -> Option<&'static StreakMilestone> {
    STREAK_MILESTONES.iter().find(|m| m.days > streak)
}

/// Percentage of the way from the last milestone to the next one
pub fn progress_to_next_milestone(streak: u32) -> u8 {
    let Some(next) = next_milestone(streak) else {
        return 100;
    };
    let prev_days = current_milestone(streak).map_or(0, |m| m.days);
    percent(
        u64::from(streak - prev_days),
        u64::from(next.days - prev_days),
    )
}

/// First milestone crossed when a streak moves from `prev` to `curr`.
///
/// Only one milestone is reported per update even if several thresholds
/// lie in `(prev, curr]`; see [`crossed_milestones`] for all of them.
pub fn new_milestone(prev: u32, curr: u32) -> Option<&'static StreakMilestone> {
    crossed_milestones(prev, curr).first()
}

/// Every milestone whose threshold lies in `(prev, curr]`
pub fn crossed_milestones(prev: u32, curr: u32) -> &'static [StreakMilestone] {
    if curr <= prev {
        return &[];
    }
    let start = STREAK_MILESTONES.partition_point(|m| m.days <= prev);
    let end = STREAK_MILESTONES.partition_point(|m| m.days <= curr);
    &STREAK_MILESTONES[start..end]
}

/// Per-user streak state, owned by the activity log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak_days: u32,
    pub last_activity_date: Option<NaiveDate>,
}

impl StreakState {
    /// Check if the streak is still active (activity today or yesterday)
    pub fn is_active(&self, today: NaiveDate) -> bool {
        let Some(last) = self.last_activity_date else {
            return false;
        };
        let days_since = (today - last).num_days();
        (0..=1).contains(&days_since) && self.current_streak_days > 0
    }

    /// Streak length as seen on `today`: zero once the streak has lapsed
    pub fn effective_days(&self, today: NaiveDate) -> u32 {
        if self.is_active(today) {
            self.current_streak_days
        } else {
            0
        }
    }
}
