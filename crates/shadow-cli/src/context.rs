use shadow_core::{AppConfig, ShadowError, ShadowResult};
use shadow_domain::{BoardId, PomodoroDurations, QuestId, ShadowOperations};
use shadow_persistence::{BoardStore, JsonFileStore, KeyValueStore, PomodoroStore, TitleStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs: settings, the open board and its side stores
pub struct CliContext {
    pub config: AppConfig,
    pub path: PathBuf,
    pub board: BoardStore,
    pub titles: TitleStore,
    pub timers: PomodoroStore,
}

impl CliContext {
    /// Open the storage file and the requested board, creating one when no
    /// board id is given.
    pub async fn load(file: Option<PathBuf>, board_id: Option<String>) -> ShadowResult<Self> {
        let config = AppConfig::load();
        let path = file.unwrap_or_else(|| config.effective_storage_file());
        tracing::debug!("Using storage file {}", path.display());

        let store = Self::open_store(&path).await?;
        let titles = TitleStore::new(store.clone());
        let timers = PomodoroStore::new(store.clone());

        let board = match board_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => BoardStore::open(store, BoardId::new(id.trim())).await,
            None => BoardStore::create(store).await,
        };

        Ok(Self {
            config,
            path,
            board,
            titles,
            timers,
        })
    }

    async fn open_store(path: &Path) -> ShadowResult<Arc<dyn KeyValueStore>> {
        Ok(Arc::new(JsonFileStore::open(path).await?))
    }

    /// Re-read the storage file to pick up writes from other processes
    pub async fn refresh(&mut self) -> ShadowResult<()> {
        let store = Self::open_store(&self.path).await?;
        let board_id = self.board.board_id().clone();
        self.titles = TitleStore::new(store.clone());
        self.timers = PomodoroStore::new(store.clone());
        self.board = BoardStore::open(store, board_id).await;
        Ok(())
    }

    pub fn durations(&self) -> PomodoroDurations {
        PomodoroDurations {
            work_secs: self.config.effective_work_secs(),
            break_secs: self.config.effective_break_secs(),
        }
    }

    /// Resolve a quest id, failing when the board has no such quest
    pub fn existing_quest(&self, id: &str) -> ShadowResult<QuestId> {
        let quest_id = QuestId::new(id);
        if self.board.board().quest(&quest_id).is_none() {
            return Err(ShadowError::NotFound(format!("Quest not found: {}", id)));
        }
        Ok(quest_id)
    }

    /// Persist the board. A failed write is logged and the command still
    /// reports its result.
    pub async fn save(&mut self) {
        self.board.save().await;
    }
}
