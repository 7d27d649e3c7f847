use crate::pomodoro_store::PomodoroStore;
use chrono::{DateTime, Utc};
use shadow_domain::{BoardData, TimeStats};

/// Read every quest's timer record and compute board statistics
pub async fn collect_time_stats(
    timers: &PomodoroStore,
    board: &BoardData,
    now: DateTime<Utc>,
    default_average: u64,
) -> TimeStats {
    let records = timers.load_all(board.quests.keys()).await;
    TimeStats::compute(board, &records, now, default_average)
}
