//! Persistence collaborators.
//!
//! The engine never touches storage itself. A [`BoardStore`] saves and loads
//! whole documents; last write wins.

mod file;
mod memory;

pub use file::{FileStore, StoreLock};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::normalize::NormalizationReport;
use crate::types::{BoardDocument, BoardId, LogEntry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity of a stored board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: BoardId,
    pub name: String,
}

impl BoardRef {
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A board as read back from a store
#[derive(Debug, Clone)]
pub struct StoredBoard {
    pub board: BoardRef,
    pub document: BoardDocument,
    /// Repairs made while reading the stored JSON
    pub report: NormalizationReport,
}

/// Saves and loads whole board documents
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Replace the stored document for `board`
    async fn save(&self, board: &BoardRef, document: &BoardDocument) -> Result<()>;

    /// Read a board back; `BoardNotFound` when nothing is stored under `id`
    async fn load(&self, id: &BoardId) -> Result<StoredBoard>;

    /// All stored boards
    async fn list(&self) -> Result<Vec<BoardRef>>;

    /// Append entries (oldest first) to a board's activity log
    async fn append_activity(&self, id: &BoardId, entries: &[LogEntry]) -> Result<()>;

    /// Read a board's activity log, newest first
    async fn read_activity(&self, id: &BoardId, limit: Option<usize>) -> Result<Vec<LogEntry>>;
}
