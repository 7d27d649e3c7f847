//! Drag-and-drop reordering of quest ids between columns.
//!
//! A drop only ever rearranges `quest_ids` sequences: the quest record itself
//! is untouched, since column membership is purely positional.

use serde::{Deserialize, Serialize};
use shadow_core::{ShadowError, ShadowResult};
use std::collections::BTreeMap;

use crate::column::{Column, ColumnId};
use crate::quest::QuestId;

/// A slot on the board: a column and an index within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "droppableId")]
    pub column_id: ColumnId,
    pub index: usize,
}

impl Location {
    pub fn new(column_id: ColumnId, index: usize) -> Self {
        Self { column_id, index }
    }
}

/// What a drag gesture reports when the quest is released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub draggable_id: QuestId,
    pub source: Location,
    /// `None` when released outside any column
    pub destination: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropOutcome {
    /// Dropped nowhere, or back onto its own slot
    Ignored,
    Reordered,
    Moved,
}

impl DropResult {
    pub fn is_noop(&self) -> bool {
        match &self.destination {
            None => true,
            Some(destination) => *destination == self.source,
        }
    }
}

/// Applies a drop to the column map.
///
/// The source slot must hold `draggable_id`, and both columns must exist;
/// otherwise nothing is changed. Destination indices past the end append.
pub fn apply_drop(
    columns: &mut BTreeMap<ColumnId, Column>,
    drop: &DropResult,
) -> ShadowResult<DropOutcome> {
    let destination = match &drop.destination {
        Some(destination) if !drop.is_noop() => destination,
        _ => return Ok(DropOutcome::Ignored),
    };

    let source_column = columns.get(&drop.source.column_id).ok_or_else(|| {
        ShadowError::NotFound(format!("Column not found: {}", drop.source.column_id))
    })?;
    if source_column.quest_ids.get(drop.source.index) != Some(&drop.draggable_id) {
        return Err(ShadowError::Validation(format!(
            "Quest {} is not at index {} of {}",
            drop.draggable_id, drop.source.index, drop.source.column_id
        )));
    }
    if !columns.contains_key(&destination.column_id) {
        return Err(ShadowError::NotFound(format!(
            "Column not found: {}",
            destination.column_id
        )));
    }

    if drop.source.column_id == destination.column_id {
        if let Some(column) = columns.get_mut(&destination.column_id) {
            let id = column.quest_ids.remove(drop.source.index);
            let index = destination.index.min(column.quest_ids.len());
            column.quest_ids.insert(index, id);
        }
        return Ok(DropOutcome::Reordered);
    }

    if let Some(source) = columns.get_mut(&drop.source.column_id) {
        source.quest_ids.remove(drop.source.index);
    }
    if let Some(target) = columns.get_mut(&destination.column_id) {
        let index = destination.index.min(target.quest_ids.len());
        target.quest_ids.insert(index, drop.draggable_id.clone());
    }
    Ok(DropOutcome::Moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(lanes: &[(&str, &[&str])]) -> BTreeMap<ColumnId, Column> {
        lanes
            .iter()
            .map(|(id, quests)| {
                let mut column = Column::new(ColumnId::new(*id), id.to_string());
                column.quest_ids = quests.iter().map(|q| QuestId::new(*q)).collect();
                (column.id.clone(), column)
            })
            .collect()
    }

    fn ids(columns: &BTreeMap<ColumnId, Column>, id: &str) -> Vec<String> {
        columns[&ColumnId::new(id)]
            .quest_ids
            .iter()
            .map(|q| q.to_string())
            .collect()
    }

    fn drop_of(id: &str, from: (&str, usize), to: Option<(&str, usize)>) -> DropResult {
        DropResult {
            draggable_id: QuestId::new(id),
            source: Location::new(ColumnId::new(from.0), from.1),
            destination: to.map(|(c, i)| Location::new(ColumnId::new(c), i)),
        }
    }

    #[test]
    fn test_missing_destination_is_ignored() {
        let mut cols = columns(&[("c1", &["a", "b"])]);
        let before = cols.clone();
        let outcome = apply_drop(&mut cols, &drop_of("a", ("c1", 0), None)).unwrap();
        assert_eq!(outcome, DropOutcome::Ignored);
        assert_eq!(cols, before);
    }

    #[test]
    fn test_same_slot_is_ignored() {
        let mut cols = columns(&[("c1", &["a", "b", "c"])]);
        let before = cols.clone();
        let outcome = apply_drop(&mut cols, &drop_of("b", ("c1", 1), Some(("c1", 1)))).unwrap();
        assert_eq!(outcome, DropOutcome::Ignored);
        assert_eq!(cols, before);
    }

    #[test]
    fn test_same_column_reorder() {
        let mut cols = columns(&[("c1", &["a", "b", "c", "d"])]);
        apply_drop(&mut cols, &drop_of("a", ("c1", 0), Some(("c1", 2)))).unwrap();
        assert_eq!(ids(&cols, "c1"), vec!["b", "c", "a", "d"]);

        apply_drop(&mut cols, &drop_of("d", ("c1", 3), Some(("c1", 0)))).unwrap();
        assert_eq!(ids(&cols, "c1"), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_cross_column_move() {
        let mut cols = columns(&[("c1", &["a", "b"]), ("c2", &["x", "y"])]);
        let outcome = apply_drop(&mut cols, &drop_of("b", ("c1", 1), Some(("c2", 1)))).unwrap();
        assert_eq!(outcome, DropOutcome::Moved);
        assert_eq!(ids(&cols, "c1"), vec!["a"]);
        assert_eq!(ids(&cols, "c2"), vec!["x", "b", "y"]);
    }

    #[test]
    fn test_destination_index_past_end_appends() {
        let mut cols = columns(&[("c1", &["a"]), ("c2", &["x"])]);
        apply_drop(&mut cols, &drop_of("a", ("c1", 0), Some(("c2", 42)))).unwrap();
        assert_eq!(ids(&cols, "c2"), vec!["x", "a"]);
        assert!(ids(&cols, "c1").is_empty());
    }

    #[test]
    fn test_stale_source_index_is_rejected() {
        let mut cols = columns(&[("c1", &["a", "b"]), ("c2", &[])]);
        let before = cols.clone();
        let result = apply_drop(&mut cols, &drop_of("a", ("c1", 1), Some(("c2", 0))));
        assert!(matches!(result, Err(ShadowError::Validation(_))));
        assert_eq!(cols, before);
    }

    #[test]
    fn test_unknown_columns_are_rejected() {
        let mut cols = columns(&[("c1", &["a"])]);
        assert!(matches!(
            apply_drop(&mut cols, &drop_of("a", ("nope", 0), Some(("c1", 0)))),
            Err(ShadowError::NotFound(_))
        ));
        assert!(matches!(
            apply_drop(&mut cols, &drop_of("a", ("c1", 0), Some(("nope", 0)))),
            Err(ShadowError::NotFound(_))
        ));
        assert_eq!(ids(&cols, "c1"), vec!["a"]);
    }

    #[test]
    fn test_drop_result_reads_gesture_payload() {
        let json = r#"{
            "draggableId": "quest-1",
            "source": {"droppableId": "column-1", "index": 0},
            "destination": {"droppableId": "column-2", "index": 3}
        }"#;
        let parsed: DropResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.source.column_id, ColumnId::backlog());
        assert_eq!(parsed.destination.unwrap().index, 3);
    }
}
