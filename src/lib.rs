//! streakboard - progression math and consistent group leaderboards
//!
//! Two halves:
//!
//! 1. **Progression**: pure functions turning XP into levels and streak
//!    lengths into milestones and rewards.
//!
//! 2. **Leaderboard**: a ranked group leaderboard that races a slow,
//!    authoritative aggregate against a fast raw-totals fallback, answers
//!    with whichever settles first, and corrects its cache in the
//!    background when the slow path finishes late.
//!
//! The [`store`] module provides a SQLite-backed implementation of every
//! leaderboard collaborator.

pub mod config;
pub mod leaderboard;
pub mod progression;
pub mod store;
