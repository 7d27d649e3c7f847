use shadow_core::ShadowResult;
use std::collections::BTreeMap;

use crate::{BoardData, Column, ColumnId, Quest, QuestId};

pub mod quest_commands;

pub use quest_commands::*;

/// Trait for board mutations
/// Commands represent intent and are executed against the latest in-memory board
pub trait Command: Send + Sync {
    /// Execute this command, mutating the board
    fn execute(&self, context: &mut CommandContext) -> ShadowResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

/// Mutable view of one board handed to commands
pub struct CommandContext<'a> {
    pub quests: &'a mut BTreeMap<QuestId, Quest>,
    pub columns: &'a mut BTreeMap<ColumnId, Column>,
    pub column_order: &'a mut Vec<ColumnId>,
}

impl<'a> CommandContext<'a> {
    pub fn new(board: &'a mut BoardData) -> Self {
        Self {
            quests: &mut board.quests,
            columns: &mut board.columns,
            column_order: &mut board.column_order,
        }
    }
}
