use crate::keys::StorageKeys;
use crate::serialization::JsonSerializer;
use crate::traits::{KeyValueStore, Serializer};
use chrono::{DateTime, Utc};
use shadow_domain::{PomodoroRecord, QuestId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Timer records keyed by quest id, independent of board data.
///
/// Reads fall back to a fresh record and writes are logged on failure.
#[derive(Clone)]
pub struct PomodoroStore {
    store: Arc<dyn KeyValueStore>,
}

impl PomodoroStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored record, or `None` when absent or unreadable
    pub async fn load_existing(&self, quest_id: &QuestId) -> Option<PomodoroRecord> {
        let raw = match self.store.get(&StorageKeys::pomodoro(quest_id)).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read timer of quest {}: {}", quest_id, e);
                return None;
            }
        };
        match Serializer::<PomodoroRecord>::deserialize(&JsonSerializer, &raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Failed to parse timer of quest {}: {}", quest_id, e);
                None
            }
        }
    }

    pub async fn load(&self, quest_id: &QuestId) -> PomodoroRecord {
        self.load_existing(quest_id).await.unwrap_or_default()
    }

    /// Records for the given quests; quests without one are skipped
    pub async fn load_all<'a>(
        &self,
        quest_ids: impl IntoIterator<Item = &'a QuestId>,
    ) -> BTreeMap<QuestId, PomodoroRecord> {
        let mut records = BTreeMap::new();
        for quest_id in quest_ids {
            if let Some(record) = self.load_existing(quest_id).await {
                records.insert(quest_id.clone(), record);
            }
        }
        records
    }

    /// Stamp `lastSession` and persist. Returns whether the write succeeded.
    pub async fn save(
        &self,
        quest_id: &QuestId,
        record: &mut PomodoroRecord,
        now: DateTime<Utc>,
    ) -> bool {
        record.touch(now);
        let json = match JsonSerializer.serialize(&*record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize timer of quest {}: {}", quest_id, e);
                return false;
            }
        };
        match self.store.set(&StorageKeys::pomodoro(quest_id), &json).await {
            Ok(()) => {
                tracing::debug!(
                    "Saved timer of quest {}: {}s over {} sessions",
                    quest_id,
                    record.total_time,
                    record.sessions
                );
                true
            }
            Err(e) => {
                tracing::warn!("Failed to save timer of quest {}: {}", quest_id, e);
                false
            }
        }
    }

    pub async fn remove(&self, quest_id: &QuestId) -> bool {
        match self.store.remove(&StorageKeys::pomodoro(quest_id)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to remove timer of quest {}: {}", quest_id, e);
                false
            }
        }
    }
}
