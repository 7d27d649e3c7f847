use clap::{Args, Parser, Subcommand};
use shadow_domain::Rank;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shadow")]
#[command(about = "A quest board with per-quest pomodoro timers", long_about = None)]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
)]
pub struct Cli {
    /// Path to the storage file (or set SHADOW_FILE env var)
    #[arg(long, global = true, value_name = "FILE", env = "SHADOW_FILE")]
    pub file: Option<PathBuf>,

    /// Board id (or set SHADOW_BOARD env var); a new board is created when omitted
    #[arg(long, global = true, value_name = "BOARD_ID", env = "SHADOW_BOARD")]
    pub board: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Quest operations
    Quest(QuestCommand),
    /// Per-quest focus timer
    Pomodoro(PomodoroCommand),
    /// Time spent and projected completion
    Stats(StatsArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board
    New,
    /// Show the board with its columns and quests
    Show,
    /// Get or set the board title
    Title {
        #[arg(long)]
        set: Option<String>,
    },
}

// Quest commands
#[derive(Args)]
pub struct QuestCommand {
    #[command(subcommand)]
    pub action: QuestAction,
}

#[derive(Subcommand)]
pub enum QuestAction {
    /// Create a quest at the end of a column
    Create(QuestCreateArgs),
    /// Edit a quest
    Update(QuestUpdateArgs),
    /// Delete a quest
    Delete {
        #[arg(long)]
        id: String,
        /// Also remove the quest's timer record
        #[arg(long)]
        purge_timer: bool,
    },
    /// Move a quest to a column, optionally at a position
    Move {
        #[arg(long)]
        id: String,
        /// Destination column id
        #[arg(long)]
        to: String,
        /// Position in the destination column (defaults to the end)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Show or hide the quest's timer
    ToggleTimer {
        #[arg(long)]
        id: String,
    },
    /// Get a specific quest
    Get {
        #[arg(long)]
        id: String,
    },
    /// List quests in board order
    List {
        #[arg(long)]
        column: Option<String>,
    },
}

#[derive(Args)]
pub struct QuestCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// S, A, B, C, D or E
    #[arg(long)]
    pub rank: Option<Rank>,
    /// Snapped to steps of 5 within the rank's range
    #[arg(long)]
    pub points: Option<u32>,
    #[arg(long, default_value = "column-1")]
    pub column: String,
}

#[derive(Args)]
pub struct QuestUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub rank: Option<Rank>,
    #[arg(long)]
    pub points: Option<u32>,
}

// Pomodoro commands
#[derive(Args)]
pub struct PomodoroCommand {
    #[command(subcommand)]
    pub action: PomodoroAction,
}

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Show a quest's recorded time and sessions
    Status {
        #[arg(long)]
        quest: String,
    },
    /// Toggle the completion bell
    Mute {
        #[arg(long)]
        quest: String,
    },
    /// Run the countdown until interrupted
    Run(PomodoroRunArgs),
}

#[derive(Args)]
pub struct PomodoroRunArgs {
    #[arg(long)]
    pub quest: String,
    /// Milliseconds per timer second
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,
    /// Stop after this many work and break cycles
    #[arg(long)]
    pub cycles: Option<u32>,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Recompute on the configured refresh interval until interrupted
    #[arg(long)]
    pub watch: bool,
}
