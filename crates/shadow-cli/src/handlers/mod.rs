pub mod board;
pub mod pomodoro;
pub mod quest;
pub mod stats;
