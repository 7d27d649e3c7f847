use shadow_domain::{BoardId, QuestId};

/// Key layout shared by every store.
pub struct StorageKeys;

impl StorageKeys {
    pub fn board_title(board_id: &BoardId) -> String {
        format!("shadow-board-title-{}", board_id)
    }

    pub fn board_data(board_id: &BoardId) -> String {
        format!("shadow-board-{}", board_id)
    }

    pub fn board_updated(board_id: &BoardId) -> String {
        format!("shadow-board-updated-{}", board_id)
    }

    pub fn pomodoro(quest_id: &QuestId) -> String {
        format!("pomodoro-{}", quest_id)
    }
}
