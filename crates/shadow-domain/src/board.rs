use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::column::{Column, ColumnId};
use crate::quest::{generate_id, Quest, QuestId};

/// Title given to freshly created boards.
pub const DEFAULT_BOARD_TITLE: &str = "New Gate";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(generate_id("board"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Everything persisted for one board: the quest map, the lanes, and lane order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    #[serde(default)]
    pub quests: BTreeMap<QuestId, Quest>,
    #[serde(default)]
    pub columns: BTreeMap<ColumnId, Column>,
    #[serde(default)]
    pub column_order: Vec<ColumnId>,
}

impl Default for BoardData {
    fn default() -> Self {
        Self::empty()
    }
}

/// A violation of "every quest id appears in exactly one column".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Quest exists in the map but in no column
    Unplaced { quest_id: QuestId },
    /// Column references an id missing from the quest map
    Dangling { column_id: ColumnId, quest_id: QuestId },
    /// Quest id appears more than once across columns
    Duplicated { quest_id: QuestId, count: usize },
    /// `column_order` names a column that does not exist
    UnknownColumn { column_id: ColumnId },
}

impl BoardData {
    pub fn empty() -> Self {
        let catalog = Column::default_catalog();
        let column_order = catalog.iter().map(|c| c.id.clone()).collect();
        let columns = catalog.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self {
            quests: BTreeMap::new(),
            columns,
            column_order,
        }
    }

    pub fn quest(&self, id: &QuestId) -> Option<&Quest> {
        self.quests.get(id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Columns in display order, skipping ids with no column behind them.
    pub fn ordered_columns(&self) -> impl Iterator<Item = &Column> {
        self.column_order.iter().filter_map(|id| self.columns.get(id))
    }

    /// Quests of a column in lane order. Ids without a quest are skipped.
    pub fn quests_in(&self, column_id: &ColumnId) -> Vec<&Quest> {
        self.columns
            .get(column_id)
            .map(|column| {
                column
                    .quest_ids
                    .iter()
                    .filter_map(|id| self.quests.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Column and index currently holding a quest.
    pub fn locate(&self, quest_id: &QuestId) -> Option<(ColumnId, usize)> {
        self.ordered_columns()
            .chain(
                self.columns
                    .values()
                    .filter(|c| !self.column_order.contains(&c.id)),
            )
            .find_map(|column| {
                column
                    .position_of(quest_id)
                    .map(|index| (column.id.clone(), index))
            })
    }

    pub fn placed_quest_count(&self) -> usize {
        self.columns.values().map(Column::len).sum()
    }

    pub fn completed_quest_ids(&self) -> &[QuestId] {
        self.columns
            .get(&ColumnId::completed())
            .map(|c| c.quest_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for column_id in &self.column_order {
            if !self.columns.contains_key(column_id) {
                issues.push(IntegrityIssue::UnknownColumn {
                    column_id: column_id.clone(),
                });
            }
        }

        let mut seen: BTreeMap<&QuestId, usize> = BTreeMap::new();
        for column in self.columns.values() {
            for quest_id in &column.quest_ids {
                *seen.entry(quest_id).or_default() += 1;
                if !self.quests.contains_key(quest_id) {
                    issues.push(IntegrityIssue::Dangling {
                        column_id: column.id.clone(),
                        quest_id: quest_id.clone(),
                    });
                }
            }
        }

        for (quest_id, count) in &seen {
            if *count > 1 {
                issues.push(IntegrityIssue::Duplicated {
                    quest_id: (*quest_id).clone(),
                    count: *count,
                });
            }
        }

        let placed: BTreeSet<&QuestId> = seen.keys().copied().collect();
        for quest_id in self.quests.keys() {
            if !placed.contains(quest_id) {
                issues.push(IntegrityIssue::Unplaced {
                    quest_id: quest_id.clone(),
                });
            }
        }

        issues
    }
}
