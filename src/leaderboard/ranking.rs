//! Entry construction and ranking shared by both leaderboard paths

use std::cmp::Ordering;
use std::collections::HashMap;

use super::models::{
    ActivityStats, DataCompleteness, LeaderboardEntry, PointComponents, Profile, RawUserPoints,
    ScoredRow, UserId,
};
use crate::progression::badges_for;

/// Order by points (desc), then earlier last activity, then user id.
/// Entries without a last activity date sort after those with one.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| {
            match (
                a.activity_stats.last_activity_date,
                b.activity_stats.last_activity_date,
            ) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        })
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort, keep the first `limit`, and assign dense ranks 1..N.
///
/// Any rank already present is overwritten.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(compare_entries);
    entries.truncate(limit);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
    entries
}

fn profile_parts(user_id: &str, profiles: &HashMap<UserId, Profile>) -> (String, Option<String>) {
    match profiles.get(user_id) {
        Some(profile) => (profile.display_name.clone(), profile.avatar.clone()),
        None => (user_id.to_string(), None),
    }
}

/// Build full entries from authoritative rows
pub fn entries_from_scored(
    rows: Vec<ScoredRow>,
    profiles: &HashMap<UserId, Profile>,
    breakdowns: &HashMap<UserId, PointComponents>,
) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .map(|row| {
            let (display_name, avatar) = profile_parts(&row.user_id, profiles);
            let point_components = breakdowns.get(&row.user_id).copied().unwrap_or_default();
            LeaderboardEntry {
                badges: badges_for(row.total_points, row.activity.streak_days),
                display_name,
                avatar,
                total_points: row.total_points,
                point_components,
                activity_stats: row.activity,
                rank: 0,
                data_completeness: DataCompleteness::Full,
                user_id: row.user_id,
            }
        })
        .collect()
}

/// Build partial entries from raw totals. Point components stay zero.
pub fn entries_from_raw(
    rows: Vec<RawUserPoints>,
    profiles: &HashMap<UserId, Profile>,
) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .map(|row| {
            let (display_name, avatar) = profile_parts(&row.user_id, profiles);
            LeaderboardEntry {
                badges: badges_for(row.points, Some(row.streak_days)),
                display_name,
                avatar,
                total_points: row.points,
                point_components: PointComponents::default(),
                activity_stats: ActivityStats {
                    streak_days: Some(row.streak_days),
                    last_activity_date: row.last_activity_date,
                    active_days: None,
                },
                rank: 0,
                data_completeness: DataCompleteness::Partial,
                user_id: row.user_id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(user: &str, points: u64, last: Option<(i32, u32, u32)>) -> RawUserPoints {
        RawUserPoints {
            user_id: user.to_string(),
            points,
            streak_days: 0,
            last_activity_date: last.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    fn ids(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.user_id.as_str()).collect()
    }

    #[test]
    fn test_dense_ranks_after_sort() {
        let rows = vec![
            raw("c", 10, None),
            raw("a", 30, None),
            raw("b", 20, None),
            raw("d", 20, None),
        ];
        let ranked = rank_entries(entries_from_raw(rows, &HashMap::new()), 10);

        assert_eq!(ids(&ranked), vec!["a", "b", "d", "c"]);
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_tie_break_prefers_earlier_activity() {
        let rows = vec![
            raw("a", 50, None),
            raw("b", 50, Some((2026, 5, 2))),
            raw("c", 50, Some((2026, 5, 1))),
        ];
        let ranked = rank_entries(entries_from_raw(rows, &HashMap::new()), 10);
        assert_eq!(ids(&ranked), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_limit_applies_after_sort() {
        let rows = vec![raw("a", 1, None), raw("b", 3, None), raw("c", 2, None)];
        let ranked = rank_entries(entries_from_raw(rows, &HashMap::new()), 2);
        assert_eq!(ids(&ranked), vec!["b", "c"]);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_upstream_rank_is_ignored() {
        let rows = vec![
            ScoredRow {
                user_id: "a".into(),
                total_points: 5,
                rank: Some(1),
                activity: ActivityStats::default(),
            },
            ScoredRow {
                user_id: "b".into(),
                total_points: 9,
                rank: Some(1),
                activity: ActivityStats::default(),
            },
        ];
        let mut breakdowns = HashMap::new();
        breakdowns.insert(
            "b".to_string(),
            PointComponents {
                performance: 4,
                recovery: 3,
                synergy: 2,
            },
        );
        let ranked = rank_entries(entries_from_scored(rows, &HashMap::new(), &breakdowns), 10);

        assert_eq!(ids(&ranked), vec!["b", "a"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[0].point_components.total(), 9);
        assert_eq!(ranked[1].point_components, PointComponents::default());
        assert!(ranked
            .iter()
            .all(|e| e.data_completeness == DataCompleteness::Full));
    }

    #[test]
    fn test_missing_profile_uses_user_id() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "a".to_string(),
            Profile {
                display_name: "Ada".into(),
                avatar: Some("ada.png".into()),
            },
        );
        let entries = entries_from_raw(vec![raw("a", 1, None), raw("b", 1, None)], &profiles);
        assert_eq!(entries[0].display_name, "Ada");
        assert_eq!(entries[0].avatar.as_deref(), Some("ada.png"));
        assert_eq!(entries[1].display_name, "b");
        assert_eq!(entries[1].data_completeness, DataCompleteness::Partial);
    }
}
