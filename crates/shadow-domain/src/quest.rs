use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::field_update::FieldUpdate;
use crate::rank::Rank;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(String);

impl QuestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Millisecond timestamp plus a random suffix, so rapid creates never collide.
    pub fn generate() -> Self {
        Self(generate_id("quest"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

pub(crate) fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), &suffix[..8])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: QuestId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub rank: Rank,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub show_pomodoro: bool,
}

/// Partial edit of an existing quest.
#[derive(Debug, Clone, Default)]
pub struct QuestUpdate {
    pub content: Option<String>,
    pub description: FieldUpdate<String>,
    pub rank: Option<Rank>,
    pub points: Option<u32>,
}

impl Quest {
    /// Applies an edit. Points are only re-bounded when the rank actually
    /// changes; a bare points edit is stored as given.
    pub fn update(&mut self, updates: QuestUpdate) {
        if let Some(content) = updates.content {
            self.content = content;
        }
        updates.description.apply_to(&mut self.description);

        match updates.rank {
            Some(rank) if rank != self.rank => {
                let range = rank.points_range();
                self.rank = rank;
                self.points = updates
                    .points
                    .map(|points| range.clamp(points))
                    .unwrap_or(range.default);
            }
            _ => {
                if let Some(points) = updates.points {
                    self.points = points;
                }
            }
        }
    }

    pub fn toggle_pomodoro(&mut self) -> bool {
        self.show_pomodoro = !self.show_pomodoro;
        self.show_pomodoro
    }
}

/// Input collected when creating a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestForm {
    pub content: String,
    pub description: Option<String>,
    rank: Rank,
    points: u32,
}

impl Default for QuestForm {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl QuestForm {
    pub fn new(content: String) -> Self {
        let rank = Rank::default();
        Self {
            content,
            description: None,
            rank,
            points: rank.points_range().default,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Switching rank always resets points to that rank's default.
    pub fn change_rank(&mut self, rank: Rank) {
        self.rank = rank;
        self.points = rank.points_range().default;
    }

    /// Slider input: snapped to the step and bounded by the active rank.
    pub fn slide_points(&mut self, points: u32) {
        self.points = self.rank.points_range().snap(points);
    }

    pub fn into_quest(self, id: QuestId) -> Quest {
        Quest {
            id,
            content: self.content,
            description: self.description,
            rank: self.rank,
            points: self.points,
            show_pomodoro: false,
        }
    }
}
