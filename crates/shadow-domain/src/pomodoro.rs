//! Per-quest pomodoro countdown.
//!
//! ```text
//! idle --start--> running --pause--> paused --resume--> running
//! running --(zero)--> break --(zero)--> idle
//! any --reset--> idle
//! ```
//!
//! Only `PomodoroRecord` is persisted; the countdown itself lives in memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shadow_core::{ShadowError, ShadowResult};
use std::fmt;

pub const WORK_TIME: u32 = 25 * 60;
pub const BREAK_TIME: u32 = 5 * 60;

/// Accumulated effort for one quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroRecord {
    /// Seconds of focused work
    #[serde(default)]
    pub total_time: u64,
    #[serde(default)]
    pub sessions: u32,
    #[serde(default)]
    pub muted: bool,
    /// Unix millis of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session: Option<i64>,
}

impl PomodoroRecord {
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_session = Some(now.timestamp_millis());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroDurations {
    pub work_secs: u32,
    pub break_secs: u32,
}

impl Default for PomodoroDurations {
    fn default() -> Self {
        Self {
            work_secs: WORK_TIME,
            break_secs: BREAK_TIME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroStatus {
    Idle,
    Running,
    Paused,
    Break,
}

impl PomodoroStatus {
    pub fn label(self) -> &'static str {
        match self {
            PomodoroStatus::Idle => "Ready",
            PomodoroStatus::Running => "Focus",
            PomodoroStatus::Paused => "Paused",
            PomodoroStatus::Break => "Break",
        }
    }
}

impl fmt::Display for PomodoroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not counting (idle or paused)
    Idle,
    Counting,
    WorkCompleted,
    BreakCompleted,
}

impl TickOutcome {
    /// Whether the persisted record changed on this tick.
    pub fn record_changed(self, status_before: PomodoroStatus) -> bool {
        match self {
            TickOutcome::WorkCompleted => true,
            TickOutcome::Counting => status_before == PomodoroStatus::Running,
            TickOutcome::Idle | TickOutcome::BreakCompleted => false,
        }
    }
}

type CompletionCallback = Box<dyn FnMut(&PomodoroRecord) + Send>;

pub struct PomodoroTimer {
    status: PomodoroStatus,
    time_left: u32,
    durations: PomodoroDurations,
    record: PomodoroRecord,
    /// Seconds already added to `total_time` during the current work session
    credited: u32,
    on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for PomodoroTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PomodoroTimer")
            .field("status", &self.status)
            .field("time_left", &self.time_left)
            .field("durations", &self.durations)
            .field("record", &self.record)
            .field("credited", &self.credited)
            .finish()
    }
}

impl PomodoroTimer {
    pub fn new(record: PomodoroRecord, durations: PomodoroDurations) -> Self {
        Self {
            status: PomodoroStatus::Idle,
            time_left: durations.work_secs,
            durations,
            record,
            credited: 0,
            on_complete: None,
        }
    }

    /// Called with the updated record whenever a work session completes.
    pub fn set_on_complete(&mut self, callback: impl FnMut(&PomodoroRecord) + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn status(&self) -> PomodoroStatus {
        self.status
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn record(&self) -> &PomodoroRecord {
        &self.record
    }

    pub fn into_record(self) -> PomodoroRecord {
        self.record
    }

    pub fn is_muted(&self) -> bool {
        self.record.muted
    }

    pub fn start(&mut self) -> ShadowResult<()> {
        self.transition(PomodoroStatus::Idle, PomodoroStatus::Running, "start")
    }

    pub fn pause(&mut self) -> ShadowResult<()> {
        self.transition(PomodoroStatus::Running, PomodoroStatus::Paused, "pause")
    }

    pub fn resume(&mut self) -> ShadowResult<()> {
        self.transition(PomodoroStatus::Paused, PomodoroStatus::Running, "resume")
    }

    /// Back to idle with a full work period. Seconds already credited stay in
    /// the record.
    pub fn reset(&mut self) {
        self.status = PomodoroStatus::Idle;
        self.time_left = self.durations.work_secs;
        self.credited = 0;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.record.muted = !self.record.muted;
        self.record.muted
    }

    fn transition(
        &mut self,
        from: PomodoroStatus,
        to: PomodoroStatus,
        action: &str,
    ) -> ShadowResult<()> {
        if self.status != from {
            return Err(ShadowError::Validation(format!(
                "Cannot {} a timer that is {}",
                action,
                self.status.label().to_lowercase()
            )));
        }
        self.status = to;
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// While running each second adds one to `total_time`. When the work
    /// period runs out the session count goes up and the total is topped up
    /// so the session contributes exactly the work duration.
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            PomodoroStatus::Idle | PomodoroStatus::Paused => TickOutcome::Idle,
            PomodoroStatus::Running => {
                if self.time_left <= 1 {
                    let remainder = self.durations.work_secs.saturating_sub(self.credited);
                    self.record.total_time += u64::from(remainder);
                    self.record.sessions += 1;
                    self.credited = 0;
                    self.time_left = self.durations.break_secs;
                    self.status = PomodoroStatus::Break;
                    if let Some(callback) = self.on_complete.as_mut() {
                        callback(&self.record);
                    }
                    TickOutcome::WorkCompleted
                } else {
                    self.record.total_time += 1;
                    self.credited += 1;
                    self.time_left -= 1;
                    TickOutcome::Counting
                }
            }
            PomodoroStatus::Break => {
                if self.time_left <= 1 {
                    self.time_left = self.durations.work_secs;
                    self.status = PomodoroStatus::Idle;
                    TickOutcome::BreakCompleted
                } else {
                    self.time_left -= 1;
                    TickOutcome::Counting
                }
            }
        }
    }

    /// Share of the current period already elapsed, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        let period = match self.status {
            PomodoroStatus::Break => self.durations.break_secs,
            _ => self.durations.work_secs,
        };
        if period == 0 {
            return 100.0;
        }
        100.0 - (f64::from(self.time_left) / f64::from(period)) * 100.0
    }
}

/// `MM:SS` countdown display.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `Xh Ym` when at least an hour, otherwise `Ym`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
