use crate::cli::StatsArgs;
use crate::context::CliContext;
use crate::output;
use chrono::Utc;
use shadow_domain::ShadowOperations;
use shadow_persistence::collect_time_stats;
use std::time::Duration;

pub async fn handle(ctx: &mut CliContext, args: StatsArgs) -> anyhow::Result<()> {
    if !args.watch {
        report(ctx).await;
        return Ok(());
    }

    let refresh = Duration::from_secs(ctx.config.effective_stats_refresh_secs());
    let mut interval = tokio::time::interval(refresh);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                ctx.refresh().await?;
                report(ctx).await;
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}

async fn report(ctx: &CliContext) {
    let stats = collect_time_stats(
        &ctx.timers,
        ctx.board.board(),
        Utc::now(),
        ctx.config.effective_default_average_secs(),
    )
    .await;
    output::output_success(&stats);
}
