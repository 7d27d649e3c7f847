use crate::keys::StorageKeys;
use crate::serialization::JsonSerializer;
use crate::title_store::TitleStore;
use crate::traits::{KeyValueStore, Serializer};
use chrono::Utc;
use shadow_core::{ShadowError, ShadowResult};
use shadow_domain::commands::{
    Command, CommandContext, CreateQuest, DeleteQuest, MoveQuest, TogglePomodoro, UpdateQuest,
};
use shadow_domain::{
    BoardData, BoardId, ColumnId, DropOutcome, DropResult, Location, Quest, QuestForm, QuestId,
    QuestUpdate, ShadowOperations, DEFAULT_BOARD_TITLE,
};
use std::sync::Arc;

/// Callback invoked with the new board after every save
pub type BoardObserver = Box<dyn FnMut(&BoardData) + Send>;

/// Sole writer of one board's quests, columns and column order.
///
/// Commands run against a copy of the in-memory board which replaces it on
/// success, so a failed command leaves nothing half-applied. `save` writes
/// the board and its updated timestamp and then notifies observers.
pub struct BoardStore {
    store: Arc<dyn KeyValueStore>,
    board_id: BoardId,
    data: BoardData,
    dirty: bool,
    observers: Vec<BoardObserver>,
}

impl BoardStore {
    /// Load a board; absent or unreadable data gives the empty board.
    pub async fn open(store: Arc<dyn KeyValueStore>, board_id: BoardId) -> Self {
        let key = StorageKeys::board_data(&board_id);
        let data = match store.get(&key).await {
            Ok(Some(raw)) => match Serializer::<BoardData>::deserialize(&JsonSerializer, &raw) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Failed to parse board {}: {}", board_id, e);
                    BoardData::empty()
                }
            },
            Ok(None) => BoardData::empty(),
            Err(e) => {
                tracing::warn!("Failed to read board {}: {}", board_id, e);
                BoardData::empty()
            }
        };

        tracing::debug!(
            "Opened board {} with {} quests",
            board_id,
            data.quests.len()
        );

        Self {
            store,
            board_id,
            data,
            dirty: false,
            observers: Vec::new(),
        }
    }

    /// Create a board under a fresh id with the default title.
    pub async fn create(store: Arc<dyn KeyValueStore>) -> Self {
        let board_id = BoardId::generate();
        TitleStore::new(store.clone())
            .save(&board_id, DEFAULT_BOARD_TITLE)
            .await;

        let mut board = Self::open(store, board_id).await;
        board.dirty = true;
        board.save().await;

        tracing::info!("Created board {}", board.board_id);
        board
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&BoardData) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Run a command as a whole-state replacement of the board
    pub fn execute(&mut self, command: Box<dyn Command>) -> ShadowResult<()> {
        tracing::debug!("Executing: {}", command.description());

        let mut next = self.data.clone();
        let mut ctx = CommandContext::new(&mut next);
        command.execute(&mut ctx)?;

        if next != self.data {
            self.data = next;
            self.dirty = true;
        }
        Ok(())
    }

    /// Execute and persist in one step
    pub async fn apply(&mut self, command: Box<dyn Command>) -> ShadowResult<()> {
        self.execute(command)?;
        self.save().await;
        Ok(())
    }

    /// Persist pending changes. Failures are logged, never raised.
    ///
    /// Returns whether the board reached storage.
    pub async fn save(&mut self) -> bool {
        if !self.dirty {
            return true;
        }

        let written = match JsonSerializer.serialize(&self.data) {
            Ok(json) => self.write(&json).await,
            Err(e) => {
                tracing::warn!("Failed to serialize board {}: {}", self.board_id, e);
                false
            }
        };
        if written {
            self.dirty = false;
        }

        for observer in self.observers.iter_mut() {
            observer(&self.data);
        }
        written
    }

    async fn write(&self, json: &str) -> bool {
        if let Err(e) = self
            .store
            .set(&StorageKeys::board_data(&self.board_id), json)
            .await
        {
            tracing::warn!("Failed to save board {}: {}", self.board_id, e);
            return false;
        }

        let updated = Utc::now().timestamp_millis().to_string();
        if let Err(e) = self
            .store
            .set(&StorageKeys::board_updated(&self.board_id), &updated)
            .await
        {
            tracing::warn!("Failed to stamp board {}: {}", self.board_id, e);
        }

        tracing::debug!("Saved board {} ({} bytes)", self.board_id, json.len());
        true
    }

    fn require_quest(&self, id: &QuestId) -> ShadowResult<&Quest> {
        self.data
            .quest(id)
            .ok_or_else(|| ShadowError::NotFound(format!("Quest not found: {}", id)))
    }

    fn require_column(&self, id: &ColumnId) -> ShadowResult<()> {
        if self.data.column(id).is_none() {
            return Err(ShadowError::NotFound(format!("Column not found: {}", id)));
        }
        Ok(())
    }
}

impl ShadowOperations for BoardStore {
    fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    fn board(&self) -> &BoardData {
        &self.data
    }

    fn create_quest(
        &mut self,
        column_id: Option<ColumnId>,
        form: QuestForm,
    ) -> ShadowResult<Option<Quest>> {
        if form.content.trim().is_empty() {
            return Err(ShadowError::Validation("Quest title is required".into()));
        }
        if let Some(column_id) = &column_id {
            self.require_column(column_id)?;
        }

        let cmd = CreateQuest::new(column_id, form);
        let quest_id = cmd.quest_id.clone();
        self.execute(Box::new(cmd))?;
        Ok(self.data.quest(&quest_id).cloned())
    }

    fn get_quest(&self, id: &QuestId) -> ShadowResult<Option<Quest>> {
        Ok(self.data.quest(id).cloned())
    }

    fn list_quests(&self, column_id: Option<&ColumnId>) -> ShadowResult<Vec<Quest>> {
        match column_id {
            Some(column_id) => {
                self.require_column(column_id)?;
                Ok(self
                    .data
                    .quests_in(column_id)
                    .into_iter()
                    .cloned()
                    .collect())
            }
            None => Ok(self
                .data
                .ordered_columns()
                .flat_map(|column| self.data.quests_in(&column.id))
                .cloned()
                .collect()),
        }
    }

    fn update_quest(&mut self, id: &QuestId, updates: QuestUpdate) -> ShadowResult<Quest> {
        self.require_quest(id)?;
        if matches!(&updates.content, Some(content) if content.trim().is_empty()) {
            return Err(ShadowError::Validation("Quest title cannot be blank".into()));
        }
        let cmd = UpdateQuest {
            quest_id: id.clone(),
            updates,
        };
        self.execute(Box::new(cmd))?;
        self.require_quest(id).cloned()
    }

    fn delete_quest(&mut self, id: &QuestId) -> ShadowResult<()> {
        self.require_quest(id)?;
        self.execute(Box::new(DeleteQuest {
            quest_id: id.clone(),
        }))
    }

    fn toggle_pomodoro(&mut self, id: &QuestId) -> ShadowResult<Quest> {
        self.require_quest(id)?;
        self.execute(Box::new(TogglePomodoro {
            quest_id: id.clone(),
        }))?;
        self.require_quest(id).cloned()
    }

    fn move_quest(
        &mut self,
        id: &QuestId,
        column_id: ColumnId,
        index: Option<usize>,
    ) -> ShadowResult<DropOutcome> {
        self.require_quest(id)?;
        self.require_column(&column_id)?;
        let (source_column, source_index) = self.data.locate(id).ok_or_else(|| {
            ShadowError::Validation(format!("Quest {} is not in any column", id))
        })?;

        // Default to the end of the target lane
        let index = index.unwrap_or_else(|| {
            let len = self.data.column(&column_id).map_or(0, |c| c.len());
            if source_column == column_id {
                len.saturating_sub(1)
            } else {
                len
            }
        });

        let drop = DropResult {
            draggable_id: id.clone(),
            source: Location::new(source_column, source_index),
            destination: Some(Location::new(column_id, index)),
        };
        let same_column =
            drop.destination.as_ref().map(|d| &d.column_id) == Some(&drop.source.column_id);

        // Index clamping can turn a drop into a no-op, so judge by the result
        let before = self.data.clone();
        self.execute(Box::new(MoveQuest { drop }))?;
        Ok(if self.data == before {
            DropOutcome::Ignored
        } else if same_column {
            DropOutcome::Reordered
        } else {
            DropOutcome::Moved
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::traits::MockKeyValueStore;
    use parking_lot::Mutex;
    use shadow_domain::Rank;

    fn memory() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    async fn open(store: &Arc<MemoryStore>, id: &str) -> BoardStore {
        BoardStore::open(store.clone(), BoardId::new(id)).await
    }

    #[tokio::test]
    async fn test_open_absent_board_is_empty() {
        let store = memory();
        let board = open(&store, "b1").await;
        assert!(board.board().quests.is_empty());
        assert_eq!(board.board().column_order.len(), 4);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_open_unparsable_board_is_empty() {
        let store = memory();
        store.set("shadow-board-b1", "not json").await.unwrap();
        let board = open(&store, "b1").await;
        assert_eq!(board.board(), &BoardData::empty());
    }

    #[tokio::test]
    async fn test_create_writes_default_title() {
        let store = memory();
        let board = BoardStore::create(store.clone()).await;
        let id = board.board_id().clone();

        assert_eq!(
            store.get(&StorageKeys::board_title(&id)).await.unwrap().as_deref(),
            Some(DEFAULT_BOARD_TITLE)
        );
        assert!(store.get(&StorageKeys::board_updated(&id)).await.unwrap().is_some());
        assert!(store.get(&StorageKeys::board_data(&id)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_mutations_persist_and_notify() {
        let store = memory();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut board = open(&store, "b1").await;
        let sink = seen.clone();
        board.subscribe(move |data| sink.lock().push(data.quests.len()));

        let quest = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("Clear the gate".into()))
            .unwrap()
            .unwrap();
        assert!(board.is_dirty());
        assert!(board.save().await);
        assert!(!board.is_dirty());
        assert_eq!(*seen.lock(), vec![1]);

        let reopened = open(&store, "b1").await;
        assert_eq!(reopened.get_quest(&quest.id).unwrap(), Some(quest));
        assert!(store.get("shadow-board-updated-b1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_without_column_is_noop() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        let created = board
            .create_quest(None, QuestForm::new("Nowhere".into()))
            .unwrap();
        assert!(created.is_none());
        assert!(!board.is_dirty());
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        assert!(matches!(
            board.create_quest(Some(ColumnId::backlog()), QuestForm::new("   ".into())),
            Err(ShadowError::Validation(_))
        ));
        assert!(matches!(
            board.create_quest(Some(ColumnId::new("column-9")), QuestForm::new("x".into())),
            Err(ShadowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_quest_is_not_found() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        let ghost = QuestId::new("ghost");
        assert!(matches!(board.delete_quest(&ghost), Err(ShadowError::NotFound(_))));
        assert!(matches!(board.toggle_pomodoro(&ghost), Err(ShadowError::NotFound(_))));
        assert!(matches!(
            board.move_quest(&ghost, ColumnId::completed(), None),
            Err(ShadowError::NotFound(_))
        ));
        assert!(board.get_quest(&ghost).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_toggle() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        let quest = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("Scout".into()))
            .unwrap()
            .unwrap();

        let updated = board
            .update_quest(
                &quest.id,
                QuestUpdate {
                    rank: Some(Rank::S),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.points, 300);

        let toggled = board.toggle_pomodoro(&quest.id).unwrap();
        assert!(toggled.show_pomodoro);
        assert_eq!(
            board.board().locate(&quest.id),
            Some((ColumnId::backlog(), 0))
        );
    }

    #[tokio::test]
    async fn test_move_quest_defaults_to_end() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        let a = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("a".into()))
            .unwrap()
            .unwrap();
        let b = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("b".into()))
            .unwrap()
            .unwrap();

        let outcome = board.move_quest(&a.id, ColumnId::backlog(), None).unwrap();
        assert_eq!(outcome, DropOutcome::Reordered);
        assert_eq!(
            board.board().column(&ColumnId::backlog()).unwrap().quest_ids,
            vec![b.id.clone(), a.id.clone()]
        );

        let outcome = board.move_quest(&a.id, ColumnId::backlog(), None).unwrap();
        assert_eq!(outcome, DropOutcome::Ignored);

        let outcome = board.move_quest(&b.id, ColumnId::completed(), Some(7)).unwrap();
        assert_eq!(outcome, DropOutcome::Moved);
        assert_eq!(board.board().completed_quest_ids(), &[b.id]);
        assert!(board.board().check_integrity().is_empty());
    }

    #[tokio::test]
    async fn test_move_past_end_of_own_column_is_ignored() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        let a = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("a".into()))
            .unwrap()
            .unwrap();
        let b = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("b".into()))
            .unwrap()
            .unwrap();
        assert!(board.save().await);

        let outcome = board.move_quest(&b.id, ColumnId::backlog(), Some(9)).unwrap();
        assert_eq!(outcome, DropOutcome::Ignored);
        assert!(!board.is_dirty());
        assert_eq!(
            board.board().column(&ColumnId::backlog()).unwrap().quest_ids,
            vec![a.id, b.id]
        );
    }

    #[tokio::test]
    async fn test_timer_save_keeps_board_saved_by_another_store() {
        use crate::store::JsonFileStore;
        use crate::PomodoroStore;
        use shadow_domain::PomodoroRecord;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("shadow.json");

        // Opened first, as a long-running timer would be
        let timer_file: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(&file_path).await.unwrap());
        let board_file: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(&file_path).await.unwrap());

        let mut board = BoardStore::open(board_file, BoardId::new("b1")).await;
        let quest = board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("Hold".into()))
            .unwrap()
            .unwrap();
        assert!(board.save().await);

        let mut record = PomodoroRecord {
            total_time: 60,
            ..Default::default()
        };
        assert!(
            PomodoroStore::new(timer_file)
                .save(&QuestId::new("q1"), &mut record, Utc::now())
                .await
        );

        let reopened: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(&file_path).await.unwrap());
        let board = BoardStore::open(reopened.clone(), BoardId::new("b1")).await;
        assert!(board.board().quest(&quest.id).is_some());
        assert_eq!(
            PomodoroStore::new(reopened)
                .load(&QuestId::new("q1"))
                .await
                .total_time,
            60
        );
    }

    #[tokio::test]
    async fn test_delete_removes_everywhere() {
        let store = memory();
        let mut board = open(&store, "b1").await;
        let quest = board
            .create_quest(Some(ColumnId::new("column-3")), QuestForm::new("Review".into()))
            .unwrap()
            .unwrap();
        board.delete_quest(&quest.id).unwrap();
        assert!(board.board().quests.is_empty());
        assert_eq!(board.board().placed_quest_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_is_swallowed() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set()
            .returning(|_, _| Err(ShadowError::Storage("disk full".into())));

        let mut board = BoardStore::open(Arc::new(mock), BoardId::new("b1")).await;
        board
            .create_quest(Some(ColumnId::backlog()), QuestForm::new("Keep me".into()))
            .unwrap();

        assert!(!board.save().await);
        assert!(board.is_dirty());
        assert_eq!(board.board().quests.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_read_yields_empty_board() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(ShadowError::Storage("unavailable".into())));

        let board = BoardStore::open(Arc::new(mock), BoardId::new("b1")).await;
        assert_eq!(board.board(), &BoardData::empty());
    }
}
