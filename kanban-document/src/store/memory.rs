//! In-memory board store

use super::{BoardRef, BoardStore, StoredBoard};
use crate::error::{DocumentError, Result};
use crate::normalize::NormalizationReport;
use crate::types::{BoardDocument, BoardId, LogEntry};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Keeps boards in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    boards: RwLock<IndexMap<BoardId, (String, BoardDocument)>>,
    activity: RwLock<IndexMap<BoardId, Vec<LogEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of boards saved so far
    pub async fn len(&self) -> usize {
        self.boards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.boards.read().await.is_empty()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn save(&self, board: &BoardRef, document: &BoardDocument) -> Result<()> {
        self.boards
            .write()
            .await
            .insert(board.id.clone(), (board.name.clone(), document.clone()));
        Ok(())
    }

    async fn load(&self, id: &BoardId) -> Result<StoredBoard> {
        let boards = self.boards.read().await;
        let (name, document) = boards
            .get(id)
            .ok_or_else(|| DocumentError::BoardNotFound { id: id.to_string() })?;
        Ok(StoredBoard {
            board: BoardRef::new(id.clone(), name.as_str()),
            document: document.clone(),
            report: NormalizationReport::default(),
        })
    }

    async fn list(&self) -> Result<Vec<BoardRef>> {
        Ok(self
            .boards
            .read()
            .await
            .iter()
            .map(|(id, (name, _))| BoardRef::new(id.clone(), name.as_str()))
            .collect())
    }

    async fn append_activity(&self, id: &BoardId, entries: &[LogEntry]) -> Result<()> {
        self.activity
            .write()
            .await
            .entry(id.clone())
            .or_default()
            .extend_from_slice(entries);
        Ok(())
    }

    async fn read_activity(&self, id: &BoardId, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let activity = self.activity.read().await;
        let entries = activity.get(id).map(Vec::as_slice).unwrap_or_default();
        Ok(entries
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
