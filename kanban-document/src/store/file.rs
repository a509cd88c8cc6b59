//! JSON file store: one `<board id>.json` per board

use super::{BoardRef, BoardStore, StoredBoard};
use crate::error::{DocumentError, Result};
use crate::identity::RandomIds;
use crate::normalize::from_value;
use crate::types::{BoardDocument, BoardId, LogEntry};
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// On-disk envelope around a document
#[derive(Debug, Serialize, Deserialize)]
struct BoardFile {
    id: BoardId,
    #[serde(default)]
    name: String,
    data: Value,
}

/// Stores each board as a JSON file in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Store boards under `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Board ids become file names under the root, so they may not name
    /// anything outside it
    fn check_board_id(id: &BoardId) -> Result<()> {
        let raw = id.as_str();
        if raw.is_empty() || raw.contains(['/', '\\', '\0']) || raw.contains("..") {
            return Err(DocumentError::invalid_value(
                "board id",
                format!("{raw:?} is not a plain file name"),
            ));
        }
        Ok(())
    }

    /// Path to a board's JSON file
    pub fn board_path(&self, id: &BoardId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Path to a board's activity log (JSONL, oldest line first)
    pub fn activity_path(&self, id: &BoardId) -> PathBuf {
        self.root.join(format!("{id}.jsonl"))
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Try to acquire the store's exclusive lock (non-blocking)
    pub async fn lock(&self) -> Result<StoreLock> {
        fs::create_dir_all(&self.root).await?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.lock_path())?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(DocumentError::LockBusy),
        }
    }
}

#[async_trait]
impl BoardStore for FileStore {
    async fn save(&self, board: &BoardRef, document: &BoardDocument) -> Result<()> {
        Self::check_board_id(&board.id)?;
        let _lock = self.lock().await?;
        let envelope = BoardFile {
            id: board.id.clone(),
            name: board.name.clone(),
            data: serde_json::to_value(document)?,
        };
        let content = serde_json::to_string_pretty(&envelope)?;
        let path = self.board_path(&board.id);
        atomic_write(&path, content.as_bytes())
            .await
            .map_err(|e| DocumentError::storage(format!("{}: {e}", path.display())))?;

        info!(board = %board.id, path = %path.display(), "Saved board");
        Ok(())
    }

    async fn load(&self, id: &BoardId) -> Result<StoredBoard> {
        Self::check_board_id(id)?;
        let path = self.board_path(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocumentError::BoardNotFound { id: id.to_string() })
            }
            Err(e) => {
                return Err(DocumentError::storage(format!("{}: {e}", path.display())))
            }
        };

        let envelope: BoardFile = serde_json::from_str(&content)
            .map_err(|e| DocumentError::parse(format!("{}: {e}", path.display())))?;
        let (document, report) = from_value(envelope.data, &RandomIds::default())?;

        info!(
            board = %envelope.id,
            repairs = report.len(),
            "Loaded board"
        );
        Ok(StoredBoard {
            board: BoardRef::new(envelope.id, envelope.name),
            document,
            report,
        })
    }

    async fn list(&self) -> Result<Vec<BoardRef>> {
        let mut boards = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(boards),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            match serde_json::from_str::<BoardFile>(&content) {
                Ok(file) => boards.push(BoardRef::new(file.id, file.name)),
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable board file"),
            }
        }
        boards.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(boards)
    }

    async fn append_activity(&self, id: &BoardId, entries: &[LogEntry]) -> Result<()> {
        Self::check_board_id(id)?;
        if entries.is_empty() {
            return Ok(());
        }
        let mut lines = String::new();
        for entry in entries {
            lines.push_str(&serde_json::to_string(entry)?);
            lines.push('\n');
        }

        fs::create_dir_all(&self.root).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.activity_path(id))
            .await?;
        file.write_all(lines.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_activity(&self, id: &BoardId, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        Self::check_board_id(id)?;
        let path = self.activity_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        // Reverse to get newest first
        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }
}

/// RAII lock guard - releases on drop
#[derive(Debug)]
pub struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Write to temp file in same directory
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await
}
