use crate::cli::{PomodoroAction, PomodoroRunArgs};
use crate::context::CliContext;
use crate::output;
use chrono::Utc;
use serde::Serialize;
use shadow_domain::{
    format_clock, format_duration, PomodoroRecord, PomodoroStatus, PomodoroTimer, QuestId,
    TickOutcome,
};
use std::io::Write;
use std::time::Duration;

#[derive(Serialize)]
struct TimerView<'a> {
    quest_id: &'a QuestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<PomodoroStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycles: Option<u32>,
    total_display: String,
    record: &'a PomodoroRecord,
}

impl<'a> TimerView<'a> {
    fn stored(quest_id: &'a QuestId, record: &'a PomodoroRecord) -> Self {
        Self {
            quest_id,
            status: None,
            time_left: None,
            cycles: None,
            total_display: format_duration(record.total_time),
            record,
        }
    }
}

pub async fn handle(ctx: &mut CliContext, action: PomodoroAction) -> anyhow::Result<()> {
    match action {
        PomodoroAction::Status { quest } => {
            let quest_id = ctx.existing_quest(&quest)?;
            let record = ctx.timers.load(&quest_id).await;
            output::output_success(TimerView::stored(&quest_id, &record));
        }
        PomodoroAction::Mute { quest } => {
            let quest_id = ctx.existing_quest(&quest)?;
            let mut record = ctx.timers.load(&quest_id).await;
            record.muted = !record.muted;
            ctx.timers.save(&quest_id, &mut record, Utc::now()).await;
            output::output_success(TimerView::stored(&quest_id, &record));
        }
        PomodoroAction::Run(args) => run(ctx, args).await?,
    }
    Ok(())
}

/// Count down in real time, persisting the record on every change.
///
/// A finished break starts the next work period until `--cycles` is
/// reached. Ctrl-C pauses the timer and saves before exiting.
async fn run(ctx: &mut CliContext, args: PomodoroRunArgs) -> anyhow::Result<()> {
    let quest_id = ctx.existing_quest(&args.quest)?;
    let record = ctx.timers.load(&quest_id).await;
    let mut timer = PomodoroTimer::new(record, ctx.durations());

    let label = quest_id.to_string();
    timer.set_on_complete(move |record| {
        tracing::info!(
            "Work session {} completed for quest {} ({} recorded)",
            record.sessions,
            label,
            format_duration(record.total_time)
        );
        if !record.muted {
            ring_bell();
        }
    });

    timer.start()?;
    tracing::debug!(
        "Started timer for quest {} at {}",
        quest_id,
        format_clock(timer.time_left())
    );

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
    // The first tick of a tokio interval fires immediately
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut cycles = 0u32;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let before = timer.status();
                let outcome = timer.tick();
                if outcome.record_changed(before) {
                    persist(ctx, &quest_id, &timer).await;
                }
                if outcome == TickOutcome::BreakCompleted {
                    cycles += 1;
                    if args.cycles.is_some_and(|limit| cycles >= limit) {
                        break;
                    }
                    timer.start()?;
                }
            }
            _ = &mut ctrl_c => {
                if timer.status() == PomodoroStatus::Running {
                    timer.pause()?;
                }
                persist(ctx, &quest_id, &timer).await;
                tracing::info!("Timer for quest {} interrupted", quest_id);
                break;
            }
        }
    }

    output::output_success(TimerView {
        quest_id: &quest_id,
        status: Some(timer.status()),
        time_left: Some(format_clock(timer.time_left())),
        cycles: Some(cycles),
        total_display: format_duration(timer.record().total_time),
        record: timer.record(),
    });
    Ok(())
}

async fn persist(ctx: &CliContext, quest_id: &QuestId, timer: &PomodoroTimer) {
    let mut record = timer.record().clone();
    ctx.timers.save(quest_id, &mut record, Utc::now()).await;
}

/// Terminal bell on stderr; stdout carries only JSON
fn ring_bell() {
    let mut stderr = std::io::stderr();
    let _ = stderr.write_all(b"\x07");
    let _ = stderr.flush();
}
