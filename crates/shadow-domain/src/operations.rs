use crate::{BoardData, BoardId, ColumnId, DropOutcome, Quest, QuestForm, QuestId, QuestUpdate};
use shadow_core::ShadowResult;

/// Board mutations every front end exposes.
/// Adding a method here forces each implementation to add it.
pub trait ShadowOperations {
    fn board_id(&self) -> &BoardId;
    fn board(&self) -> &BoardData;

    // Quest operations
    /// Returns `None` when there is no usable target column.
    fn create_quest(
        &mut self,
        column_id: Option<ColumnId>,
        form: QuestForm,
    ) -> ShadowResult<Option<Quest>>;
    fn get_quest(&self, id: &QuestId) -> ShadowResult<Option<Quest>>;
    fn list_quests(&self, column_id: Option<&ColumnId>) -> ShadowResult<Vec<Quest>>;
    fn update_quest(&mut self, id: &QuestId, updates: QuestUpdate) -> ShadowResult<Quest>;
    fn delete_quest(&mut self, id: &QuestId) -> ShadowResult<()>;
    fn toggle_pomodoro(&mut self, id: &QuestId) -> ShadowResult<Quest>;

    // Drag and drop
    fn move_quest(
        &mut self,
        id: &QuestId,
        column_id: ColumnId,
        index: Option<usize>,
    ) -> ShadowResult<DropOutcome>;
}
