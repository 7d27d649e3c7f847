use crate::keys::StorageKeys;
use crate::traits::KeyValueStore;
use shadow_domain::{BoardId, DEFAULT_BOARD_TITLE};
use std::sync::Arc;

/// Board titles, stored as plain strings apart from board data
#[derive(Clone)]
pub struct TitleStore {
    store: Arc<dyn KeyValueStore>,
}

impl TitleStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, board_id: &BoardId) -> String {
        match self.store.get(&StorageKeys::board_title(board_id)).await {
            Ok(Some(title)) => title,
            Ok(None) => DEFAULT_BOARD_TITLE.to_string(),
            Err(e) => {
                tracing::warn!("Failed to read title of board {}: {}", board_id, e);
                DEFAULT_BOARD_TITLE.to_string()
            }
        }
    }

    /// Store a trimmed title. Blank titles are ignored.
    ///
    /// Returns whether a new title was written.
    pub async fn save(&self, board_id: &BoardId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self
            .store
            .set(&StorageKeys::board_title(board_id), title)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save title of board {}: {}", board_id, e);
                false
            }
        }
    }
}
