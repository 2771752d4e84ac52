//! Badges shown next to a leaderboard entry

use serde::Serialize;

use super::levels::calculate_level;
use super::streaks::current_milestone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Badge {
    /// Level reached with the user's points
    Level { level: u32 },
    /// Highest streak milestone held
    Streak { days: u32, badge: &'static str },
}

/// Badges for a user with `total_points` and an optional streak length.
///
/// Points double as XP for the level badge.
pub fn badges_for(total_points: u64, streak_days: Option<u32>) -> Vec<Badge> {
    let xp = i64::try_from(total_points).unwrap_or(i64::MAX);
    let mut badges = vec![Badge::Level {
        level: calculate_level(xp),
    }];
    if let Some(milestone) = streak_days.and_then(current_milestone) {
        badges.push(Badge::Streak {
            days: milestone.days,
            badge: milestone.badge,
        });
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_badge_only() {
        assert_eq!(badges_for(0, None), vec![Badge::Level { level: 1 }]);
        assert_eq!(badges_for(450, Some(2)), vec![Badge::Level { level: 3 }]);
    }

    #[test]
    fn test_streak_badge() {
        assert_eq!(
            badges_for(100, Some(9)),
            vec![
                Badge::Level { level: 2 },
                Badge::Streak {
                    days: 7,
                    badge: "flame"
                }
            ]
        );
    }
}
