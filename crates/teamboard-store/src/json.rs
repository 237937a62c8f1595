use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamboard_core::{TeamboardError, TeamboardResult};
use teamboard_domain::{Board, BoardId, Card, CardId, CardPatch, Column};
use tokio::fs;
use tokio::sync::RwLock;

use crate::traits::{BoardStore, CardStore};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileEnvelope {
    version: u32,
    saved_at: DateTime<Utc>,
    boards: Vec<Board>,
    cards: Vec<Card>,
}

#[derive(Debug, Clone, Default)]
struct FileData {
    boards: Vec<Board>,
    cards: Vec<Card>,
}

/// JSON-file backend. The whole dataset is loaded once at open and the file
/// is rewritten after every mutation through a temp-file-then-rename, so a
/// crash mid-write never leaves a torn file behind. Mutations are staged on
/// a copy of the dataset and only replace the served data once the save
/// lands; a failed save leaves memory and disk on the same previous state.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<FileData>,
}

impl JsonFileStore {
    pub async fn open(path: impl AsRef<Path>) -> TeamboardResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if fs::try_exists(&path).await? {
            let bytes = fs::read(&path).await?;
            let envelope: FileEnvelope = serde_json::from_slice(&bytes)
                .map_err(|e| TeamboardError::Serialization(e.to_string()))?;
            if envelope.version != FORMAT_VERSION {
                return Err(TeamboardError::Serialization(format!(
                    "Unsupported format version: {}",
                    envelope.version
                )));
            }
            tracing::info!(
                "Loaded {} boards and {} cards from {}",
                envelope.boards.len(),
                envelope.cards.len(),
                path.display()
            );
            FileData {
                boards: envelope.boards,
                cards: envelope.cards,
            }
        } else {
            tracing::info!("No data file at {}, starting empty", path.display());
            FileData::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &FileData) -> TeamboardResult<()> {
        let envelope = FileEnvelope {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            boards: data.boards.clone(),
            cards: data.cards.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TeamboardError::Serialization(e.to_string()))?;
        write_atomic(&self.path, &bytes).await
    }

    /// Save the staged dataset, then swap it into the shared state. The
    /// served data is replaced only after the save succeeded, so a mutation
    /// whose save fails is never visible.
    async fn commit(&self, data: &mut FileData, staged: FileData) -> TeamboardResult<()> {
        self.persist(&staged).await?;
        *data = staged;
        Ok(())
    }
}

/// Write to a temp file in the same directory (same filesystem, so the
/// rename stays atomic), then rename over the target.
async fn write_atomic(path: &Path, data: &[u8]) -> TeamboardResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_file = tempfile::NamedTempFile::new_in(parent)?;
    let temp_path = temp_file.path().to_path_buf();

    fs::write(&temp_path, data).await?;
    fs::rename(&temp_path, path).await?;

    tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

#[async_trait]
impl CardStore for JsonFileStore {
    async fn create(
        &self,
        title: &str,
        column: Column,
        board_id: BoardId,
    ) -> TeamboardResult<Card> {
        let title = Card::validate_title(title)?;
        let mut data = self.data.write().await;
        if !data.boards.iter().any(|b| b.id == board_id) {
            return Err(TeamboardError::NotFound(format!(
                "Board {} not found",
                board_id
            )));
        }
        let card = Card::new(board_id, title, column);
        let mut staged = data.clone();
        staged.cards.push(card.clone());
        self.commit(&mut data, staged).await?;
        Ok(card)
    }

    async fn get(&self, id: CardId) -> TeamboardResult<Option<Card>> {
        let data = self.data.read().await;
        Ok(data.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: CardId, patch: CardPatch) -> TeamboardResult<Card> {
        let title = match patch.title {
            Some(raw) => Some(Card::validate_title(&raw)?),
            None => None,
        };
        let patch = CardPatch {
            title,
            column: patch.column,
        };

        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let card = staged
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Card {} not found", id)))?;
        card.apply(patch);
        let card = card.clone();
        self.commit(&mut data, staged).await?;
        Ok(card)
    }

    async fn delete(&self, id: CardId) -> TeamboardResult<()> {
        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let position = staged
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Card {} not found", id)))?;
        staged.cards.remove(position);
        self.commit(&mut data, staged).await
    }

    async fn list_by_board(&self, board_id: BoardId) -> TeamboardResult<Vec<Card>> {
        let data = self.data.read().await;
        Ok(data
            .cards
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BoardStore for JsonFileStore {
    async fn find_by_name(&self, name: &str) -> TeamboardResult<Option<Board>> {
        let data = self.data.read().await;
        Ok(data.boards.iter().find(|b| b.name == name).cloned())
    }

    async fn get(&self, id: BoardId) -> TeamboardResult<Option<Board>> {
        let data = self.data.read().await;
        Ok(data.boards.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, name: &str) -> TeamboardResult<Board> {
        let name = Board::validate_name(name)?;
        let mut data = self.data.write().await;
        if let Some(existing) = data.boards.iter().find(|b| b.name == name) {
            return Ok(existing.clone());
        }
        let board = Board::new(name);
        let mut staged = data.clone();
        staged.boards.push(board.clone());
        self.commit(&mut data, staged).await?;
        Ok(board)
    }

    async fn append_card_ref(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> TeamboardResult<Board> {
        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let board = staged
            .boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Board {} not found", board_id)))?;
        board.append_card_ref(card_id);
        let board = board.clone();
        self.commit(&mut data, staged).await?;
        Ok(board)
    }

    async fn remove_card_ref(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> TeamboardResult<Board> {
        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let board = staged
            .boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| TeamboardError::NotFound(format!("Board {} not found", board_id)))?;
        board.remove_card_ref(card_id);
        let board = board.clone();
        self.commit(&mut data, staged).await?;
        Ok(board)
    }
}
