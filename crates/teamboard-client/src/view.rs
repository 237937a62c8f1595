use std::collections::HashMap;
use std::sync::Arc;

use teamboard_core::TeamboardResult;
use teamboard_domain::{Card, CardId, Column};
use uuid::Uuid;

use crate::gateway::CardGateway;
use crate::resolver::{nearest_marker, DropMarker};

/// Reconciliation state of a card's most recent move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    Idle,
    OptimisticallyMoved,
    Confirmed,
    RolledBack,
}

/// A pointer release over a column: the dragged card, the column dropped
/// on, where the pointer was, and that column's markers top to bottom.
#[derive(Debug, Clone)]
pub struct DropEvent {
    pub card_id: CardId,
    pub column: Column,
    pub pointer_y: f32,
    pub markers: Vec<DropMarker>,
}

/// What the local half of a drop decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Nothing changed: the drop resolved onto the dragged card's own slot,
    /// the card is unknown locally, or its previous move is still in flight.
    Ignored,
    /// Respliced within the card's current column; the server keeps no
    /// within-column order, so no call follows.
    Reordered,
    /// The card changed column locally; the move must be confirmed against
    /// the server.
    Moved { from: Column, to: Column },
}

struct PendingMove {
    snapshot: Vec<Card>,
}

/// Local board state for one team: a flat card list the columns filter,
/// updated optimistically and reconciled with the server per operation.
pub struct BoardView {
    team_name: String,
    gateway: Arc<dyn CardGateway>,
    cards: Vec<Card>,
    move_states: HashMap<CardId, MoveState>,
    pending: HashMap<CardId, PendingMove>,
}

impl BoardView {
    pub fn new(team_name: impl Into<String>, gateway: Arc<dyn CardGateway>) -> Self {
        Self {
            team_name: team_name.into(),
            gateway,
            cards: Vec::new(),
            move_states: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards of one column, in display order.
    pub fn cards_in(&self, column: Column) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.column == column).collect()
    }

    pub fn move_state(&self, id: CardId) -> MoveState {
        self.move_states
            .get(&id)
            .copied()
            .unwrap_or(MoveState::Idle)
    }

    /// Fetch the team's cards and replace local state. Also drops any
    /// in-flight bookkeeping: the server is the truth being loaded.
    pub async fn load(&mut self) -> TeamboardResult<()> {
        let gateway = self.gateway.clone();
        let team_name = self.team_name.clone();
        let cards = gateway.fetch_cards(&team_name).await?;
        self.cards = cards;
        self.move_states.clear();
        self.pending.clear();
        Ok(())
    }

    /// The synchronous half of a drop: resolve the insertion point and
    /// resplice the local list before any network activity. For a
    /// cross-column result the pre-splice snapshot is kept until
    /// [`complete_move`](Self::complete_move) settles the attempt.
    pub fn begin_drop(&mut self, event: &DropEvent) -> DropAction {
        // An unconfirmed move means this card's server state is unknown;
        // drops of it are ignored until the move resolves. Other cards are
        // unaffected.
        if self.move_state(event.card_id) == MoveState::OptimisticallyMoved {
            return DropAction::Ignored;
        }

        let Some(marker) = nearest_marker(event.pointer_y, &event.markers) else {
            return DropAction::Ignored;
        };
        if marker.before == Some(event.card_id) {
            // Dropped straight back onto its own slot.
            return DropAction::Ignored;
        }

        let Some(position) = self.cards.iter().position(|c| c.id == event.card_id) else {
            return DropAction::Ignored;
        };

        let snapshot = self.cards.clone();
        let mut card = self.cards.remove(position);
        let from = card.column;
        card.column = event.column;

        match marker.before {
            Some(before_id) => {
                if let Some(index) = self.cards.iter().position(|c| c.id == before_id) {
                    self.cards.insert(index, card);
                } else {
                    // The marker's card is gone from local state; land at the end.
                    self.cards.push(card);
                }
            }
            None => self.cards.push(card),
        }

        if from == event.column {
            return DropAction::Reordered;
        }

        self.pending.insert(event.card_id, PendingMove { snapshot });
        self.move_states
            .insert(event.card_id, MoveState::OptimisticallyMoved);
        DropAction::Moved {
            from,
            to: event.column,
        }
    }

    /// Settle an optimistic move with the server's answer. On failure the
    /// pre-splice snapshot is restored verbatim and the error passed on.
    pub fn complete_move(
        &mut self,
        card_id: CardId,
        result: TeamboardResult<Card>,
    ) -> TeamboardResult<Card> {
        let pending = self.pending.remove(&card_id);
        match result {
            Ok(card) => {
                self.move_states.insert(card_id, MoveState::Confirmed);
                Ok(card)
            }
            Err(err) => {
                tracing::warn!("Move of card {} failed, restoring previous order: {}", card_id, err);
                if let Some(pending) = pending {
                    self.cards = pending.snapshot;
                }
                self.move_states.insert(card_id, MoveState::RolledBack);
                Err(err)
            }
        }
    }

    /// Full drop cycle: resplice locally, then confirm a cross-column move
    /// with the server. An error means the move was rolled back.
    pub async fn drop_card(&mut self, event: DropEvent) -> TeamboardResult<DropAction> {
        let action = self.begin_drop(&event);
        if let DropAction::Moved { to, .. } = action {
            let gateway = self.gateway.clone();
            let result = gateway.move_card(event.card_id, to).await;
            self.complete_move(event.card_id, result)?;
        }
        Ok(action)
    }

    /// Optimistic create: a placeholder enters the list immediately and is
    /// swapped in place for the server's card on success, or removed again
    /// on failure.
    pub async fn add_card(&mut self, title: &str, column: Column) -> TeamboardResult<Card> {
        let title = Card::validate_title(title)?;

        // The placeholder's board id is unknowable here; the server's card
        // replaces the whole record anyway.
        let placeholder = Card::new(Uuid::nil(), title.clone(), column);
        let placeholder_id = placeholder.id;
        self.cards.push(placeholder);

        let gateway = self.gateway.clone();
        let team_name = self.team_name.clone();
        match gateway.create_card(&team_name, &title, column).await {
            Ok(card) => {
                if let Some(slot) = self.cards.iter_mut().find(|c| c.id == placeholder_id) {
                    *slot = card.clone();
                }
                Ok(card)
            }
            Err(err) => {
                self.cards.retain(|c| c.id != placeholder_id);
                Err(err)
            }
        }
    }

    /// Request-first delete: local state changes only once the server
    /// confirms, so a failed delete leaves the board as it was.
    pub async fn delete_card(&mut self, id: CardId) -> TeamboardResult<()> {
        let gateway = self.gateway.clone();
        gateway.delete_card(id).await?;
        self.cards.retain(|c| c.id != id);
        Ok(())
    }
}
