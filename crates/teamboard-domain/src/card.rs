use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamboard_core::{TeamboardError, TeamboardResult};
use uuid::Uuid;

use crate::{board::BoardId, column::Column};

pub type CardId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub title: String,
    pub column: Column,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a card. Absent fields are left untouched; `None`
/// fields never serialize, so a patch on the wire only carries what
/// actually changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
}

impl CardPatch {
    pub fn move_to(column: Column) -> Self {
        Self {
            title: None,
            column: Some(column),
        }
    }

    pub fn retitle(title: String) -> Self {
        Self {
            title: Some(title),
            column: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.column.is_none()
    }
}

impl Card {
    pub fn new(board_id: BoardId, title: String, column: Column) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            column,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn move_to_column(&mut self, column: Column) {
        self.column = column;
        self.updated_at = Utc::now();
    }

    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(column) = patch.column {
            self.column = column;
        }
        self.updated_at = Utc::now();
    }

    /// Trims the raw title and rejects titles that are empty afterwards.
    /// The trimmed form is what gets stored.
    pub fn validate_title(raw: &str) -> TeamboardResult<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamboardError::Validation(
                "Card title must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}
