//! XP and Level system
//!
//! Levels follow a quadratic curve: level `L` begins at `100 * (L - 1)^2` XP.

use serde::Serialize;

/// XP scale of the level curve
const XP_PER_LEVEL_UNIT: u64 = 100;

/// Cap on the per-day streak bonus
pub const MAX_STREAK_BONUS: u32 = 50;

/// Base XP for completing a habit when no explicit base is given
pub const DEFAULT_HABIT_BASE_XP: u32 = 10;

/// Calculate the level for a given XP total (levels start at 1)
pub fn calculate_level(total_xp: i64) -> u32 {
    let xp = total_xp.max(0) as u64;
    let level = (xp / XP_PER_LEVEL_UNIT).isqrt() + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Minimum XP at which `level` begins
pub fn xp_for_level(level: u32) -> u64 {
    if level < 2 {
        return 0;
    }
    let steps = u64::from(level - 1);
    XP_PER_LEVEL_UNIT.saturating_mul(steps.saturating_mul(steps))
}

/// Derived level state for an XP total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLevelInfo {
    pub level: u32,
    pub total_xp: u64,
    /// XP at which the current level began
    pub current_level_xp: u64,
    /// XP at which the next level begins
    pub next_level_xp: u64,
    /// 0 - 100
    pub progress_percent: u8,
    pub xp_to_next: u64,
}

impl UserLevelInfo {
    pub fn new(total_xp: i64) -> Self {
        let level = calculate_level(total_xp);
        let total_xp = total_xp.max(0) as u64;
        let current_level_xp = xp_for_level(level);
        let next_level_xp = xp_for_level(level.saturating_add(1));

        Self {
            level,
            total_xp,
            current_level_xp,
            next_level_xp,
            progress_percent: percent(
                total_xp - current_level_xp,
                next_level_xp - current_level_xp,
            ),
            xp_to_next: next_level_xp.saturating_sub(total_xp),
        }
    }
}

/// Convenience wrapper around [`UserLevelInfo::new`]
pub fn user_level_info(total_xp: i64) -> UserLevelInfo {
    UserLevelInfo::new(total_xp)
}

/// Rounded percentage `num / den`, 100 when `den` is zero
pub(crate) fn percent(num: u64, den: u64) -> u8 {
    if den == 0 {
        return 100;
    }
    let num = num.min(den) as u128;
    let den = den as u128;
    // round half up
    ((200 * num + den) / (2 * den)) as u8
}

/// Bonus XP for a streak: one point per day, capped
pub fn streak_xp_multiplier(streak_days: i64) -> u32 {
    streak_days.clamp(0, i64::from(MAX_STREAK_BONUS)) as u32
}

/// Inputs for a single habit completion. Every bonus is optional and additive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HabitXpParams {
    pub base_xp: Option<u32>,
    pub streak_bonus: Option<u32>,
    pub difficulty_bonus: Option<u32>,
    pub first_completion_bonus: Option<u32>,
    pub perfect_day_bonus: Option<u32>,
}

/// XP earned for a habit completion
pub fn habit_xp(params: &HabitXpParams) -> u32 {
    [
        params.streak_bonus,
        params.difficulty_bonus,
        params.first_completion_bonus,
        params.perfect_day_bonus,
    ]
    .into_iter()
    .flatten()
    .fold(params.base_xp.unwrap_or(DEFAULT_HABIT_BASE_XP), u32::saturating_add)
}

/// A level up caused by an XP award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

/// Detect a level change between two XP totals
pub fn level_up(old_xp: i64, new_xp: i64) -> Option<LevelUp> {
    let old_level = calculate_level(old_xp);
    let new_level = calculate_level(new_xp);
    (new_level > old_level).then_some(LevelUp {
        old_level,
        new_level,
    })
}

/// Earned XP for one user. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressionState {
    pub total_xp: u64,
}

impl ProgressionState {
    pub fn new(total_xp: u64) -> Self {
        Self { total_xp }
    }

    pub fn level_info(&self) -> UserLevelInfo {
        UserLevelInfo::new(i64::try_from(self.total_xp).unwrap_or(i64::MAX))
    }

    /// Add XP and report a level up if one happened
    pub fn award(&mut self, amount: u32) -> Option<LevelUp> {
        let old = self.level_info().level;
        self.total_xp = self.total_xp.saturating_add(u64::from(amount));
        let new = self.level_info().level;
        (new > old).then_some(LevelUp {
            old_level: old,
            new_level: new,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_award() {
        let mut state = ProgressionState::new(90);
        assert_eq!(
            state.award(15),
            Some(LevelUp {
                old_level: 1,
                new_level: 2
            })
        );
        assert_eq!(state.award(10), None);
        assert_eq!(state.total_xp, 115);
        assert_eq!(state.level_info().level, 2);
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(calculate_level(-500), 1);
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(99), 1);
        assert_eq!(calculate_level(100), 2);
        assert_eq!(calculate_level(399), 2);
        assert_eq!(calculate_level(400), 3);
        assert_eq!(calculate_level(10_000), 11);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = calculate_level(0);
        for xp in (0..50_000).step_by(7) {
            let level = calculate_level(xp);
            assert!(level >= 1);
            assert!(level >= previous, "level dropped at {xp} XP");
            previous = level;
        }
    }

    #[test]
    fn test_boundaries_round_trip() {
        assert_eq!(xp_for_level(0), 0);
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100);
        assert_eq!(xp_for_level(5), 1600);
        for level in 1..=200 {
            let xp = xp_for_level(level) as i64;
            assert_eq!(calculate_level(xp), level);
            if xp > 0 {
                assert_eq!(calculate_level(xp - 1), level - 1);
            }
        }
    }

    #[test]
    fn test_level_info_at_zero() {
        let info = user_level_info(0);
        assert_eq!(
            info,
            UserLevelInfo {
                level: 1,
                total_xp: 0,
                current_level_xp: 0,
                next_level_xp: 100,
                progress_percent: 0,
                xp_to_next: 100,
            }
        );
    }

    #[test]
    fn test_level_info_progress() {
        let info = user_level_info(150);
        assert_eq!(info.level, 2);
        assert_eq!(info.current_level_xp, 100);
        assert_eq!(info.next_level_xp, 400);
        assert_eq!(info.progress_percent, 17); // 50/300
        assert_eq!(info.xp_to_next, 250);
    }

    #[test]
    fn test_percent_zero_denominator() {
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
    }

    #[test]
    fn test_streak_multiplier_is_capped() {
        assert_eq!(streak_xp_multiplier(-3), 0);
        assert_eq!(streak_xp_multiplier(0), 0);
        assert_eq!(streak_xp_multiplier(12), 12);
        assert_eq!(streak_xp_multiplier(50), 50);
        assert_eq!(streak_xp_multiplier(10_000), 50);
    }

    #[test]
    fn test_habit_xp() {
        let params = HabitXpParams {
            base_xp: Some(15),
            streak_bonus: Some(25),
            first_completion_bonus: Some(5),
            perfect_day_bonus: Some(20),
            ..Default::default()
        };
        assert_eq!(habit_xp(&params), 65);
        assert_eq!(habit_xp(&HabitXpParams::default()), DEFAULT_HABIT_BASE_XP);
    }

    #[test]
    fn test_level_up_detection() {
        assert_eq!(level_up(50, 90), None);
        assert_eq!(
            level_up(90, 450),
            Some(LevelUp {
                old_level: 1,
                new_level: 3
            })
        );
        assert_eq!(level_up(450, 90), None);
    }
}
