use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamboard_core::{TeamboardError, TeamboardResult};
use uuid::Uuid;

use crate::card::CardId;

pub type BoardId = Uuid;

/// The per-team aggregate. `card_refs` is the display-order index over the
/// team's cards; card membership itself is owned by the card records via
/// their `board_id` back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub card_refs: Vec<CardId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            card_refs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn append_card_ref(&mut self, card_id: CardId) {
        self.card_refs.push(card_id);
        self.updated_at = Utc::now();
    }

    /// Removes every occurrence of the id. An absent id is a no-op, not an
    /// error, so a retried delete stays harmless. Returns whether anything
    /// was removed.
    pub fn remove_card_ref(&mut self, card_id: CardId) -> bool {
        let before = self.card_refs.len();
        self.card_refs.retain(|id| *id != card_id);
        let removed = self.card_refs.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn contains_card(&self, card_id: CardId) -> bool {
        self.card_refs.contains(&card_id)
    }

    pub fn card_position(&self, card_id: CardId) -> Option<usize> {
        self.card_refs.iter().position(|id| *id == card_id)
    }

    /// Trims the team name and rejects names that are empty afterwards.
    pub fn validate_name(raw: &str) -> TeamboardResult<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamboardError::Validation(
                "Team name must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}
