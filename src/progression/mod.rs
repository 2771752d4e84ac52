//! Progression math: XP, Levels, Streak milestones, and Badges
//!
//! Everything in this module is pure. Level and streak state are derived
//! from totals owned by the activity log and are never stored.

mod badges;
mod levels;
mod streaks;

pub use badges::{badges_for, Badge};
pub use levels::{
    calculate_level, habit_xp, level_up, streak_xp_multiplier, user_level_info, xp_for_level,
    HabitXpParams, LevelUp, ProgressionState, UserLevelInfo, DEFAULT_HABIT_BASE_XP,
    MAX_STREAK_BONUS,
};
pub use streaks::{
    crossed_milestones, current_milestone, new_milestone, next_milestone,
    progress_to_next_milestone, streak_rewards, StreakMilestone, StreakState, STREAK_MILESTONES,
};
