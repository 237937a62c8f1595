use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use teamboard_core::{TeamboardError, TeamboardResult};
use teamboard_domain::{Board, Card, CardId, CardPatch, Column};
use teamboard_store::{BoardStore, CardStore};

/// Sequences every write that touches both aggregates. The card row is the
/// authoritative side; `card_refs` on the board is a display hint that is
/// allowed to lag when the second write of a pair fails.
pub struct Coordinator {
    boards: Arc<dyn BoardStore>,
    cards: Arc<dyn CardStore>,
    consistency_warnings: AtomicU64,
}

impl Coordinator {
    pub fn new(boards: Arc<dyn BoardStore>, cards: Arc<dyn CardStore>) -> Self {
        Self {
            boards,
            cards,
            consistency_warnings: AtomicU64::new(0),
        }
    }

    /// Number of times the second write of a two-write protocol failed and
    /// the operation carried on regardless.
    pub fn consistency_warnings(&self) -> u64 {
        self.consistency_warnings.load(Ordering::Relaxed)
    }

    fn record_consistency_warning(&self) {
        self.consistency_warnings.fetch_add(1, Ordering::Relaxed);
    }

    /// Find-or-create the board for a team. Returns the board and whether
    /// this call created it. Find and create are separate store round trips,
    /// so two concurrent signups for a fresh name can both end up creating.
    pub async fn ensure_team_board(&self, team_name: &str) -> TeamboardResult<(Board, bool)> {
        let name = Board::validate_name(team_name)?;
        if let Some(board) = self.boards.find_by_name(&name).await? {
            return Ok((board, false));
        }
        let board = self.boards.create(&name).await?;
        Ok((board, true))
    }

    /// Create a card under the named team's board. The card row is written
    /// first; if appending the reference to the board fails afterwards, the
    /// created card is still returned and the gap is logged. Listing falls
    /// back to `board_id` membership, so the card stays visible.
    pub async fn create_card(
        &self,
        team_name: &str,
        title: &str,
        column: Column,
    ) -> TeamboardResult<Card> {
        let board = self
            .boards
            .find_by_name(team_name)
            .await?
            .ok_or_else(|| TeamboardError::TeamNotFound(team_name.to_string()))?;

        let card = self.cards.create(title, column, board.id).await?;

        if let Err(err) = self.boards.append_card_ref(board.id, card.id).await {
            self.record_consistency_warning();
            tracing::warn!(
                "Card {} created but could not be appended to board {}: {}",
                card.id,
                board.id,
                err
            );
        }

        Ok(card)
    }

    /// Partial update of title and/or column. An empty patch is rejected.
    pub async fn update_card(&self, id: CardId, patch: CardPatch) -> TeamboardResult<Card> {
        if patch.is_empty() {
            return Err(TeamboardError::Validation("Nothing to update".to_string()));
        }
        self.cards.update(id, patch).await
    }

    /// Column-only move. `card_refs` stays untouched: order within a column
    /// is a client concern.
    pub async fn move_card(&self, id: CardId, column: Column) -> TeamboardResult<Card> {
        self.cards.update(id, CardPatch::move_to(column)).await
    }

    /// Delete a card: drop the board's reference first, then the row. A
    /// board that has vanished is logged and tolerated; any other failure
    /// aborts before the row delete, since deleting the row with the
    /// reference still in place would leave a dangling id on the board.
    pub async fn delete_card(&self, id: CardId) -> TeamboardResult<()> {
        let card = self
            .cards
            .get(id)
            .await?
            .ok_or_else(|| TeamboardError::NotFound(format!("Card {} not found", id)))?;

        match self.boards.remove_card_ref(card.board_id, id).await {
            Ok(_) => {}
            Err(TeamboardError::NotFound(_)) => {
                self.record_consistency_warning();
                tracing::warn!(
                    "Board {} not found while deleting card {}; deleting the card anyway",
                    card.board_id,
                    id
                );
            }
            Err(err) => return Err(err),
        }

        self.cards.delete(id).await
    }

    /// Cards of the named team. Membership comes from the card rows; display
    /// order follows `card_refs` where a card appears there, with
    /// unreferenced cards trailing in store order.
    pub async fn list_cards(&self, team_name: &str) -> TeamboardResult<Vec<Card>> {
        let board = self
            .boards
            .find_by_name(team_name)
            .await?
            .ok_or_else(|| TeamboardError::TeamNotFound(team_name.to_string()))?;

        let mut cards = self.cards.list_by_board(board.id).await?;
        cards.sort_by_key(|card| match board.card_position(card.id) {
            Some(rank) => (0, rank),
            None => (1, usize::MAX),
        });
        Ok(cards)
    }
}
