use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use teamboard_core::{TeamboardError, TeamboardResult};
use teamboard_domain::{Board, BoardId, Card, CardId, CardPatch, Column};

use crate::traits::{BoardStore, CardStore};

#[derive(Debug, Default)]
struct StoreData {
    boards: Vec<Board>,
    cards: Vec<Card>,
}

/// In-memory backend holding both aggregates behind one lock, the way a
/// single database instance hosts both collections. Clones share the same
/// underlying data, so one `MemoryStore` can serve as both the card store
/// and the board store handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn create(
        &self,
        title: &str,
        column: Column,
        board_id: BoardId,
    ) -> TeamboardResult<Card> {
        let title = Card::validate_title(title)?;
        let mut data = self.data.write();
        if !data.boards.iter().any(|b| b.id == board_id) {
            return Err(TeamboardError::NotFound(format!(
                "Board {} not found",
                board_id
            )));
        }
        let card = Card::new(board_id, title, column);
        data.cards.push(card.clone());
        Ok(card)
    }

    async fn get(&self, id: CardId) -> TeamboardResult<Option<Card>> {
        let data = self.data.read();
        Ok(data.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: CardId, patch: CardPatch) -> TeamboardResult<Card> {
        // Validate before touching the record so a bad patch never leaves a
        // half-applied card behind.
        let title = match patch.title {
            Some(raw) => Some(Card::validate_title(&raw)?),
            None => None,
        };
        let patch = CardPatch {
            title,
            column: patch.column,
        };

        let mut data = self.data.write();
        let card = data
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Card {} not found", id)))?;
        card.apply(patch);
        Ok(card.clone())
    }

    async fn delete(&self, id: CardId) -> TeamboardResult<()> {
        let mut data = self.data.write();
        let position = data
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Card {} not found", id)))?;
        data.cards.remove(position);
        Ok(())
    }

    async fn list_by_board(&self, board_id: BoardId) -> TeamboardResult<Vec<Card>> {
        let data = self.data.read();
        Ok(data
            .cards
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> TeamboardResult<Option<Board>> {
        let data = self.data.read();
        Ok(data.boards.iter().find(|b| b.name == name).cloned())
    }

    async fn get(&self, id: BoardId) -> TeamboardResult<Option<Board>> {
        let data = self.data.read();
        Ok(data.boards.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, name: &str) -> TeamboardResult<Board> {
        let name = Board::validate_name(name)?;
        let mut data = self.data.write();
        if let Some(existing) = data.boards.iter().find(|b| b.name == name) {
            return Ok(existing.clone());
        }
        let board = Board::new(name);
        data.boards.push(board.clone());
        Ok(board)
    }

    async fn append_card_ref(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> TeamboardResult<Board> {
        let mut data = self.data.write();
        let board = data
            .boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Board {} not found", board_id)))?;
        board.append_card_ref(card_id);
        Ok(board.clone())
    }

    async fn remove_card_ref(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> TeamboardResult<Board> {
        let mut data = self.data.write();
        let board = data
            .boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Board {} not found", board_id)))?;
        board.remove_card_ref(card_id);
        Ok(board.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_card_requires_existing_board() {
        let store = MemoryStore::new();
        let err = CardStore::create(&store, "task", Column::Todo, uuid::Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, TeamboardError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_card_trims_title_and_rejects_blank() {
        let store = MemoryStore::new();
        let board = BoardStore::create(&store, "Acme").await.unwrap();

        let card = CardStore::create(&store, "  fix login  ", Column::Todo, board.id)
            .await
            .unwrap();
        assert_eq!(card.title, "fix login");

        let err = CardStore::create(&store, "   ", Column::Todo, board.id)
            .await
            .unwrap_err();
        assert!(matches!(err, TeamboardError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_card_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(uuid::Uuid::new_v4(), CardPatch::move_to(Column::Done))
            .await
            .unwrap_err();
        assert!(matches!(err, TeamboardError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_patch_validation_leaves_card_unchanged() {
        let store = MemoryStore::new();
        let board = BoardStore::create(&store, "Acme").await.unwrap();
        let card = CardStore::create(&store, "task", Column::Todo, board.id)
            .await
            .unwrap();

        let err = store
            .update(card.id, CardPatch::retitle("   ".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, TeamboardError::Validation(_)));

        let stored = CardStore::get(&store, card.id).await.unwrap().unwrap();
        assert_eq!(stored, card);
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let store = MemoryStore::new();
        let board = BoardStore::create(&store, "Acme").await.unwrap();
        let card = CardStore::create(&store, "task", Column::Todo, board.id)
            .await
            .unwrap();

        store.delete(card.id).await.unwrap();
        let err = store.delete(card.id).await.unwrap_err();
        assert!(matches!(err, TeamboardError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_by_board_keeps_insertion_order() {
        let store = MemoryStore::new();
        let board = BoardStore::create(&store, "Acme").await.unwrap();
        let other = BoardStore::create(&store, "Globex").await.unwrap();

        let a = CardStore::create(&store, "a", Column::Todo, board.id)
            .await
            .unwrap();
        let _ = CardStore::create(&store, "elsewhere", Column::Todo, other.id)
            .await
            .unwrap();
        let b = CardStore::create(&store, "b", Column::Doing, board.id)
            .await
            .unwrap();

        let listed = store.list_by_board(board.id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_board_create_returns_existing_for_known_name() {
        let store = MemoryStore::new();
        let first = BoardStore::create(&store, "Acme").await.unwrap();
        let second = BoardStore::create(&store, "Acme").await.unwrap();
        assert_eq!(first.id, second.id);

        let found = store.find_by_name("Acme").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_card_ref_round_trip_and_tolerant_removal() {
        let store = MemoryStore::new();
        let board = BoardStore::create(&store, "Acme").await.unwrap();
        let card_id = uuid::Uuid::new_v4();

        let board = store.append_card_ref(board.id, card_id).await.unwrap();
        assert!(board.contains_card(card_id));

        let board = store.remove_card_ref(board.id, card_id).await.unwrap();
        assert!(!board.contains_card(card_id));

        // Removing again must stay a no-op rather than an error.
        let board = store.remove_card_ref(board.id, card_id).await.unwrap();
        assert!(board.card_refs.is_empty());
    }

    #[tokio::test]
    async fn test_append_card_ref_to_missing_board_fails() {
        let store = MemoryStore::new();
        let err = store
            .append_card_ref(uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, TeamboardError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_clones_share_underlying_data() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let board = BoardStore::create(&store, "Acme").await.unwrap();

        let seen = handle.find_by_name("Acme").await.unwrap().unwrap();
        assert_eq!(seen.id, board.id);
    }
}
