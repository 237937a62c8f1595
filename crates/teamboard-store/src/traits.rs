use async_trait::async_trait;
use teamboard_core::TeamboardResult;
use teamboard_domain::{Board, BoardId, Card, CardId, CardPatch, Column};

/// Storage contract for card records. A store owns validation of the card
/// row itself; sequencing writes across cards and boards belongs to the
/// coordinator sitting above both stores.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Creates a card. Fails `Validation` when the trimmed title is empty
    /// and `NotFound` when the board id does not resolve.
    async fn create(
        &self,
        title: &str,
        column: Column,
        board_id: BoardId,
    ) -> TeamboardResult<Card>;

    async fn get(&self, id: CardId) -> TeamboardResult<Option<Card>>;

    /// Applies a partial update. Fails `NotFound` for an unknown id. Patch
    /// titles are trimmed and validated like on create; a failed validation
    /// leaves the stored card unchanged.
    async fn update(&self, id: CardId, patch: CardPatch) -> TeamboardResult<Card>;

    /// Fails `NotFound` when the card is already absent.
    async fn delete(&self, id: CardId) -> TeamboardResult<()>;

    /// Every card whose `board_id` matches, in the store's natural
    /// (insertion) order. This is the authoritative membership query; the
    /// board's `card_refs` is only an ordering hint over it.
    async fn list_by_board(&self, board_id: BoardId) -> TeamboardResult<Vec<Card>>;
}

/// Storage contract for the per-team board aggregate.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Name lookup. Team names are soft-unique: the store answers with the
    /// first board carrying the name.
    async fn find_by_name(&self, name: &str) -> TeamboardResult<Option<Board>>;

    async fn get(&self, id: BoardId) -> TeamboardResult<Option<Board>>;

    /// Creates a board for a team name, or hands back the existing board
    /// when the name already resolves. Callers racing through a find-then-
    /// create sequence still go through this single entry point, so the
    /// backend is where name uniqueness gets enforced, if anywhere.
    async fn create(&self, name: &str) -> TeamboardResult<Board>;

    /// Appends the card id to the end of `card_refs`. Fails `NotFound`
    /// when the board is missing.
    async fn append_card_ref(&self, board_id: BoardId, card_id: CardId)
        -> TeamboardResult<Board>;

    /// Removes the card id from `card_refs` if present; an already-missing
    /// ref is a silent no-op. Fails `NotFound` only when the board itself
    /// is missing.
    async fn remove_card_ref(&self, board_id: BoardId, card_id: CardId)
        -> TeamboardResult<Board>;
}
