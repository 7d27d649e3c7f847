use serde::{Deserialize, Serialize};
use std::fmt;

use crate::quest::QuestId;

/// Column that counts as "done" for time statistics.
pub const COMPLETED_COLUMN_ID: &str = "column-4";

/// Column that new quests land in when no target is given.
pub const BACKLOG_COLUMN_ID: &str = "column-1";

const DEFAULT_COLUMNS: [(&str, &str); 4] = [
    ("column-1", "Quests"),
    ("column-2", "In Progress"),
    ("column-3", "Under Review"),
    (COMPLETED_COLUMN_ID, "Completed"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn completed() -> Self {
        Self::new(COMPLETED_COLUMN_ID)
    }

    pub fn backlog() -> Self {
        Self::new(BACKLOG_COLUMN_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An ordered lane of quest ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub quest_ids: Vec<QuestId>,
}

impl Column {
    pub fn new(id: ColumnId, title: String) -> Self {
        Self {
            id,
            title,
            quest_ids: Vec::new(),
        }
    }

    /// The fixed four-lane catalog every board starts with, in display order.
    pub fn default_catalog() -> Vec<Column> {
        DEFAULT_COLUMNS
            .iter()
            .map(|(id, title)| Column::new(ColumnId::new(*id), title.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.quest_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quest_ids.is_empty()
    }

    pub fn contains(&self, quest_id: &QuestId) -> bool {
        self.quest_ids.contains(quest_id)
    }

    pub fn position_of(&self, quest_id: &QuestId) -> Option<usize> {
        self.quest_ids.iter().position(|id| id == quest_id)
    }

    pub fn is_completed(&self) -> bool {
        self.id.as_str() == COMPLETED_COLUMN_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let columns = Column::default_catalog();
        let titles: Vec<_> = columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Quests", "In Progress", "Under Review", "Completed"]);
        assert!(columns.iter().all(|c| c.is_empty()));
        assert!(columns[3].is_completed());
        assert!(!columns[0].is_completed());
    }

    #[test]
    fn test_column_wire_format() {
        let mut column = Column::new(ColumnId::backlog(), "Quests".to_string());
        column.quest_ids.push(QuestId::new("quest-1"));

        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["id"], "column-1");
        assert_eq!(json["questIds"][0], "quest-1");
    }
}
