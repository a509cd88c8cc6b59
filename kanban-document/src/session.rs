//! BoardSession - the current document of one open board
//!
//! A session applies operations synchronously and saves through its
//! [`BoardStore`] only once edits have been quiet for the configured debounce
//! interval, or when flushed explicitly.

use crate::context::EngineContext;
use crate::error::Result;
use crate::operation::Apply;
use crate::processor::DocumentProcessor;
use crate::store::{BoardRef, BoardStore};
use crate::types::{BoardDocument, BoardId, LogEntry};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One open board with debounced persistence
pub struct BoardSession {
    board: BoardRef,
    document: BoardDocument,
    store: Arc<dyn BoardStore>,
    ctx: EngineContext,
    processor: DocumentProcessor,
    dirty: bool,
    last_edit: Option<Instant>,
    /// Newest first
    activity: Vec<LogEntry>,
    /// Leading entries of `activity` not yet handed to the store
    unsaved_activity: usize,
}

impl BoardSession {
    /// Start a session on a document that is not yet (or already) stored
    pub fn new(
        board: BoardRef,
        document: BoardDocument,
        store: Arc<dyn BoardStore>,
        ctx: EngineContext,
    ) -> Self {
        Self {
            board,
            document,
            store,
            ctx,
            processor: DocumentProcessor::new(),
            dirty: false,
            last_edit: None,
            activity: Vec::new(),
            unsaved_activity: 0,
        }
    }

    /// Load a stored board and open a session on it
    pub async fn open(store: Arc<dyn BoardStore>, id: &BoardId, ctx: EngineContext) -> Result<Self> {
        let stored = store.load(id).await?;
        let mut session = Self::new(stored.board, stored.document, store, ctx);
        // repaired documents differ from what is stored
        session.dirty = !stored.report.is_clean();
        Ok(session)
    }

    /// Attribute logged edits to `actor`
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.processor = DocumentProcessor::with_actor(actor);
        self
    }

    pub fn board(&self) -> &BoardRef {
        &self.board
    }

    pub fn document(&self) -> &BoardDocument {
        &self.document
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Unsaved edits exist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Logged operations, newest first
    pub fn activity(&self) -> &[LogEntry] {
        &self.activity
    }

    fn debounce(&self) -> Duration {
        self.ctx.config().save_debounce()
    }

    /// Apply an operation to the current document.
    ///
    /// On failure the document is left as it was and the error is returned.
    pub fn apply<O>(&mut self, op: &O) -> Result<&BoardDocument>
    where
        O: Apply + Serialize,
    {
        let (result, log_entry) = self.processor.process(op, &self.document, &self.ctx).split();
        if let Some(entry) = log_entry {
            self.activity.insert(0, entry);
            self.unsaved_activity += 1;
        }
        let next = result?;
        if next != self.document {
            self.document = next;
            self.dirty = true;
            self.last_edit = Some(Instant::now());
        }
        Ok(&self.document)
    }

    /// When the pending save becomes due, if there is one
    pub fn save_due_at(&self) -> Option<Instant> {
        if !self.dirty {
            return None;
        }
        Some(
            self.last_edit
                .map_or_else(Instant::now, |last| last + self.debounce()),
        )
    }

    /// Save if dirty and quiet for the debounce interval. Returns whether a
    /// save happened.
    pub async fn flush_if_idle(&mut self) -> Result<bool> {
        self.flush_if_idle_at(Instant::now()).await
    }

    /// [`flush_if_idle`](Self::flush_if_idle) as seen at `now`
    pub async fn flush_if_idle_at(&mut self, now: Instant) -> Result<bool> {
        match self.save_due_at() {
            Some(due) if now >= due => {
                self.flush().await?;
                Ok(true)
            }
            Some(due) => {
                debug!(
                    board = %self.board.id,
                    remaining_ms = due.saturating_duration_since(now).as_millis() as u64,
                    "Save debounced"
                );
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Sleep until the pending save is due, then save
    pub async fn wait_and_flush(&mut self) -> Result<bool> {
        let Some(due) = self.save_due_at() else {
            return Ok(false);
        };
        tokio::time::sleep_until(due.into()).await;
        self.flush_if_idle().await
    }

    /// Save now, regardless of the debounce interval
    pub async fn flush(&mut self) -> Result<()> {
        self.store.save(&self.board, &self.document).await?;
        self.dirty = false;

        if self.unsaved_activity > 0 {
            let pending: Vec<LogEntry> = self.activity[..self.unsaved_activity]
                .iter()
                .rev()
                .cloned()
                .collect();
            self.store.append_activity(&self.board.id, &pending).await?;
            self.unsaved_activity = 0;
        }
        info!(
            board = %self.board.id,
            columns = self.document.column_order.len(),
            tasks = self.document.live_task_count(),
            "Board session saved"
        );
        Ok(())
    }
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSession")
            .field("board", &self.board)
            .field("dirty", &self.dirty)
            .field("activity", &self.activity.len())
            .finish_non_exhaustive()
    }
}
