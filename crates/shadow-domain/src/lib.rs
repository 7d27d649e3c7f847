pub mod board;
pub mod column;
pub mod commands;
pub mod field_update;
pub mod operations;
pub mod pomodoro;
pub mod quest;
pub mod rank;
pub mod reorder;
pub mod stats;

pub use board::{BoardData, BoardId, IntegrityIssue, DEFAULT_BOARD_TITLE};
pub use column::{Column, ColumnId, BACKLOG_COLUMN_ID, COMPLETED_COLUMN_ID};
pub use field_update::FieldUpdate;
pub use operations::ShadowOperations;
pub use pomodoro::{
    format_clock, format_duration, PomodoroDurations, PomodoroRecord, PomodoroStatus,
    PomodoroTimer, TickOutcome, BREAK_TIME, WORK_TIME,
};
pub use quest::{Quest, QuestForm, QuestId, QuestUpdate};
pub use rank::{PointsRange, Rank, POINTS_STEP};
pub use reorder::{apply_drop, DropOutcome, DropResult, Location};
pub use stats::{TimeStats, DEFAULT_AVERAGE_TIME};
