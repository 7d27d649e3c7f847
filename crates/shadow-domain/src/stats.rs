//! Board-wide time statistics derived from pomodoro records.
//!
//! Nothing here is persisted; the numbers are recomputed from stored records
//! every time they are needed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::board::BoardData;
use crate::pomodoro::{format_duration, PomodoroRecord, WORK_TIME};
use crate::quest::QuestId;

/// Average assumed per quest before any completed quest has recorded time.
pub const DEFAULT_AVERAGE_TIME: u64 = WORK_TIME as u64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Seconds recorded across every quest on the board
    pub total_time_spent: u64,
    pub total_time_display: String,
    /// Seconds per quest used for the projection
    pub average_time_per_quest: f64,
    pub completed_with_time: usize,
    pub incomplete_quests: usize,
    /// Absent when nothing remains to be done
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl TimeStats {
    /// Computes totals and a completion projection.
    ///
    /// Quests without a record count as zero. The average is taken over
    /// completed quests with positive recorded time, falling back to
    /// `default_average` when there are none.
    pub fn compute(
        board: &BoardData,
        records: &BTreeMap<QuestId, PomodoroRecord>,
        now: DateTime<Utc>,
        default_average: u64,
    ) -> Self {
        let recorded = |id: &QuestId| records.get(id).map(|r| r.total_time).unwrap_or(0);

        let total_time_spent: u64 = board.quests.keys().map(recorded).sum();

        let completed = board.completed_quest_ids();
        let completed_times: Vec<u64> = completed
            .iter()
            .filter(|id| board.quests.contains_key(*id))
            .map(recorded)
            .filter(|time| *time > 0)
            .collect();

        let average_time_per_quest = if completed_times.is_empty() {
            default_average as f64
        } else {
            completed_times.iter().sum::<u64>() as f64 / completed_times.len() as f64
        };

        let incomplete_quests = board
            .quests
            .keys()
            .filter(|id| !completed.contains(*id))
            .count();

        let remaining = incomplete_quests as f64 * average_time_per_quest;
        let estimated_completion = if remaining > 0.0 {
            Some(now + Duration::milliseconds((remaining * 1000.0).round() as i64))
        } else {
            None
        };

        Self {
            total_time_spent,
            total_time_display: format_duration(total_time_spent),
            average_time_per_quest,
            completed_with_time: completed_times.len(),
            incomplete_quests,
            estimated_completion,
        }
    }
}
