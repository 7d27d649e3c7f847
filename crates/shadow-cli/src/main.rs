mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{BoardAction, Cli, Commands};
use context::CliContext;
use shadow_domain::ShadowOperations;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("SHADOW_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::output_error(&e.to_string());
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let board_id = match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "shadow", &mut std::io::stdout());
            return Ok(());
        }
        // Always a fresh board, whatever SHADOW_BOARD says
        Commands::Board(board_cmd) if matches!(board_cmd.action, BoardAction::New) => None,
        _ => cli.board.clone(),
    };

    let mut ctx = CliContext::load(cli.file, board_id).await?;
    output::set_board_id(ctx.board.board_id().as_str());

    match cli.command {
        Commands::Board(board_cmd) => {
            handlers::board::handle(&mut ctx, board_cmd.action).await?;
        }
        Commands::Quest(quest_cmd) => {
            handlers::quest::handle(&mut ctx, quest_cmd.action).await?;
        }
        Commands::Pomodoro(pomodoro_cmd) => {
            handlers::pomodoro::handle(&mut ctx, pomodoro_cmd.action).await?;
        }
        Commands::Stats(args) => {
            handlers::stats::handle(&mut ctx, args).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
