use super::{Command, CommandContext};
use crate::reorder::{apply_drop, DropResult};
use crate::{ColumnId, QuestForm, QuestId, QuestUpdate};
use shadow_core::ShadowResult;

/// Create a quest at the end of a column
pub struct CreateQuest {
    pub quest_id: QuestId,
    /// No target column means nothing is created
    pub column_id: Option<ColumnId>,
    pub form: QuestForm,
}

impl CreateQuest {
    pub fn new(column_id: Option<ColumnId>, form: QuestForm) -> Self {
        Self {
            quest_id: QuestId::generate(),
            column_id,
            form,
        }
    }
}

impl Command for CreateQuest {
    fn execute(&self, context: &mut CommandContext) -> ShadowResult<()> {
        let Some(column_id) = &self.column_id else {
            return Ok(());
        };
        if let Some(column) = context.columns.get_mut(column_id) {
            column.quest_ids.push(self.quest_id.clone());
            let quest = self.form.clone().into_quest(self.quest_id.clone());
            context.quests.insert(self.quest_id.clone(), quest);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create quest: '{}'", self.form.content)
    }
}

/// Edit content, description, rank or points; column membership is untouched
pub struct UpdateQuest {
    pub quest_id: QuestId,
    pub updates: QuestUpdate,
}

impl Command for UpdateQuest {
    fn execute(&self, context: &mut CommandContext) -> ShadowResult<()> {
        if let Some(quest) = context.quests.get_mut(&self.quest_id) {
            quest.update(self.updates.clone());
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Update quest {}", self.quest_id)
    }
}

/// Remove a quest from the map and from every column
pub struct DeleteQuest {
    pub quest_id: QuestId,
}

impl Command for DeleteQuest {
    fn execute(&self, context: &mut CommandContext) -> ShadowResult<()> {
        context.quests.remove(&self.quest_id);
        for column in context.columns.values_mut() {
            column.quest_ids.retain(|id| id != &self.quest_id);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete quest {}", self.quest_id)
    }
}

/// Flip whether the quest's timer is shown
pub struct TogglePomodoro {
    pub quest_id: QuestId,
}

impl Command for TogglePomodoro {
    fn execute(&self, context: &mut CommandContext) -> ShadowResult<()> {
        if let Some(quest) = context.quests.get_mut(&self.quest_id) {
            quest.toggle_pomodoro();
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Toggle timer for quest {}", self.quest_id)
    }
}

/// Apply a finished drag gesture
pub struct MoveQuest {
    pub drop: DropResult,
}

impl Command for MoveQuest {
    fn execute(&self, context: &mut CommandContext) -> ShadowResult<()> {
        apply_drop(context.columns, &self.drop)?;
        Ok(())
    }

    fn description(&self) -> String {
        match &self.drop.destination {
            Some(destination) => format!(
                "Move quest {} to {}[{}]",
                self.drop.draggable_id, destination.column_id, destination.index
            ),
            None => format!("Drop quest {} outside the board", self.drop.draggable_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::Location;
    use crate::{BoardData, FieldUpdate, Rank};

    fn run(board: &mut BoardData, command: &dyn Command) {
        let mut ctx = CommandContext::new(board);
        command.execute(&mut ctx).unwrap();
    }

    fn create(board: &mut BoardData, column: &str, title: &str) -> QuestId {
        let cmd = CreateQuest::new(
            Some(ColumnId::new(column)),
            QuestForm::new(title.to_string()),
        );
        let id = cmd.quest_id.clone();
        run(board, &cmd);
        id
    }

    #[test]
    fn test_create_appends_to_column() {
        let mut board = BoardData::empty();
        let first = create(&mut board, "column-1", "First");
        let second = create(&mut board, "column-1", "Second");

        let column = board.column(&ColumnId::backlog()).unwrap();
        assert_eq!(column.quest_ids, vec![first.clone(), second]);
        let quest = board.quest(&first).unwrap();
        assert_eq!(quest.rank, Rank::E);
        assert_eq!(quest.points, 15);
        assert!(!quest.show_pomodoro);
    }

    #[test]
    fn test_create_without_column_is_noop() {
        let mut board = BoardData::empty();
        let before = board.clone();
        run(
            &mut board,
            &CreateQuest::new(None, QuestForm::new("Lost".to_string())),
        );
        run(
            &mut board,
            &CreateQuest::new(
                Some(ColumnId::new("column-99")),
                QuestForm::new("Lost".to_string()),
            ),
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_update_keeps_column_membership() {
        let mut board = BoardData::empty();
        let id = create(&mut board, "column-2", "Scout");
        run(
            &mut board,
            &UpdateQuest {
                quest_id: id.clone(),
                updates: QuestUpdate {
                    content: Some("Scout the ruins".to_string()),
                    description: FieldUpdate::Set("North side".to_string()),
                    rank: Some(Rank::C),
                    points: None,
                },
            },
        );
        let quest = board.quest(&id).unwrap();
        assert_eq!(quest.content, "Scout the ruins");
        assert_eq!(quest.points, 60);
        assert_eq!(board.locate(&id), Some((ColumnId::new("column-2"), 0)));
    }

    #[test]
    fn test_delete_removes_everywhere() {
        let mut board = BoardData::empty();
        let keep = create(&mut board, "column-4", "Keep");
        let gone = create(&mut board, "column-4", "Gone");
        // Corrupt data: the same id listed twice
        board
            .columns
            .get_mut(&ColumnId::new("column-2"))
            .unwrap()
            .quest_ids
            .push(gone.clone());

        run(&mut board, &DeleteQuest { quest_id: gone.clone() });

        assert!(board.quest(&gone).is_none());
        assert_eq!(board.completed_quest_ids(), &[keep]);
        assert!(board.column(&ColumnId::new("column-2")).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_harmless() {
        let mut board = BoardData::empty();
        create(&mut board, "column-1", "Stay");
        let before = board.clone();
        run(&mut board, &DeleteQuest { quest_id: QuestId::new("quest-missing") });
        assert_eq!(board, before);
    }

    #[test]
    fn test_toggle_pomodoro() {
        let mut board = BoardData::empty();
        let id = create(&mut board, "column-1", "Focus");
        run(&mut board, &TogglePomodoro { quest_id: id.clone() });
        assert!(board.quest(&id).unwrap().show_pomodoro);
        run(&mut board, &TogglePomodoro { quest_id: id.clone() });
        assert!(!board.quest(&id).unwrap().show_pomodoro);
    }

    #[test]
    fn test_move_quest_leaves_record_untouched() {
        let mut board = BoardData::empty();
        let id = create(&mut board, "column-1", "Travel");
        let record = board.quest(&id).cloned();

        run(
            &mut board,
            &MoveQuest {
                drop: DropResult {
                    draggable_id: id.clone(),
                    source: Location::new(ColumnId::backlog(), 0),
                    destination: Some(Location::new(ColumnId::completed(), 0)),
                },
            },
        );

        assert_eq!(board.quest(&id).cloned(), record);
        assert_eq!(board.locate(&id), Some((ColumnId::completed(), 0)));
    }
}
