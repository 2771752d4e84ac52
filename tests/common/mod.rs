//! Shared test collaborators for leaderboard tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use streakboard::config::LeaderboardSettings;
use streakboard::leaderboard::{
    ActivityStats, AuthoritativeScorer, Collaborators, GroupDirectory, GroupId,
    PointBreakdownStore, PointComponents, Profile, ProfileStore, RankedLeaderboardService,
    RawPointStore, RawUserPoints, ScoredRow, TimePeriod, UserId,
};

/// What the scorer does once its delay has passed
#[derive(Clone)]
pub enum ScorerBehavior {
    Rows(Vec<ScoredRow>),
    Fail,
}

pub struct MockScorer {
    pub delay: Duration,
    pub behavior: Mutex<ScorerBehavior>,
    pub calls: AtomicUsize,
}

impl MockScorer {
    pub fn new(delay_ms: u64, behavior: ScorerBehavior) -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(delay_ms),
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthoritativeScorer for MockScorer {
    async fn compute(
        &self,
        _viewer_id: &str,
        _period: TimePeriod,
        limit: usize,
    ) -> Result<Vec<ScoredRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            ScorerBehavior::Rows(rows) => Ok(rows.into_iter().take(limit).collect()),
            ScorerBehavior::Fail => Err(anyhow!("aggregate service unavailable")),
        }
    }
}

pub struct MockGroups {
    pub memberships: HashMap<UserId, GroupId>,
    pub calls: AtomicUsize,
}

impl MockGroups {
    pub fn new(memberships: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            memberships: memberships
                .iter()
                .map(|(u, g)| (u.to_string(), g.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupDirectory for MockGroups {
    async fn current_group(&self, viewer_id: &str) -> Result<Option<GroupId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.memberships.get(viewer_id).cloned())
    }
}

pub struct MockRawPoints {
    pub groups: HashMap<GroupId, Vec<RawUserPoints>>,
    pub fail: bool,
    pub queried: Mutex<Vec<GroupId>>,
}

impl MockRawPoints {
    pub fn new(groups: Vec<(&str, Vec<RawUserPoints>)>) -> Arc<Self> {
        Arc::new(Self {
            groups: groups
                .into_iter()
                .map(|(g, rows)| (g.to_string(), rows))
                .collect(),
            fail: false,
            queried: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            groups: HashMap::new(),
            fail: true,
            queried: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.queried.lock().unwrap().len()
    }

    pub fn queried_groups(&self) -> Vec<GroupId> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl RawPointStore for MockRawPoints {
    async fn query(&self, group_id: &str) -> Result<Vec<RawUserPoints>> {
        self.queried.lock().unwrap().push(group_id.to_string());
        if self.fail {
            return Err(anyhow!("raw store offline"));
        }
        Ok(self.groups.get(group_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MockProfiles {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ProfileStore for MockProfiles {
    async fn query(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, Profile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(user_ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    Profile {
                        display_name: id.to_uppercase(),
                        avatar: None,
                    },
                )
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MockBreakdowns {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PointBreakdownStore for MockBreakdowns {
    async fn query(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, PointComponents>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(user_ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    PointComponents {
                        performance: 1,
                        recovery: 1,
                        synergy: 1,
                    },
                )
            })
            .collect())
    }
}

pub fn scored(user: &str, points: u64) -> ScoredRow {
    ScoredRow {
        user_id: user.to_string(),
        total_points: points,
        rank: Some(1),
        activity: ActivityStats {
            streak_days: Some(8),
            last_activity_date: None,
            active_days: Some(3),
        },
    }
}

pub fn raw(user: &str, points: u64) -> RawUserPoints {
    RawUserPoints {
        user_id: user.to_string(),
        points,
        streak_days: 2,
        last_activity_date: None,
    }
}

/// A service plus handles on every mock it reads from
pub struct Harness {
    pub service: RankedLeaderboardService,
    pub scorer: Arc<MockScorer>,
    pub groups: Arc<MockGroups>,
    pub raw_points: Arc<MockRawPoints>,
    pub profiles: Arc<MockProfiles>,
    pub breakdowns: Arc<MockBreakdowns>,
}

impl Harness {
    pub fn new(scorer: Arc<MockScorer>, groups: Arc<MockGroups>, raw_points: Arc<MockRawPoints>) -> Self {
        let profiles = Arc::new(MockProfiles::default());
        let breakdowns = Arc::new(MockBreakdowns::default());
        let collaborators = Collaborators {
            scorer: scorer.clone(),
            groups: groups.clone(),
            raw_points: raw_points.clone(),
            profiles: profiles.clone(),
            breakdowns: breakdowns.clone(),
        };
        let service = RankedLeaderboardService::new(collaborators, &LeaderboardSettings::default());
        Self {
            service,
            scorer,
            groups,
            raw_points,
            profiles,
            breakdowns,
        }
    }

    /// Total calls made to any collaborator
    pub fn total_calls(&self) -> usize {
        self.scorer.calls()
            + self.groups.calls()
            + self.raw_points.calls()
            + self.profiles.calls.load(Ordering::SeqCst)
            + self.breakdowns.calls.load(Ordering::SeqCst)
    }
}
