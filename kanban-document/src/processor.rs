//! Operation processing with activity logging

use crate::context::EngineContext;
use crate::error::DocumentError;
use crate::operation::Apply;
use crate::types::{BoardDocument, LogEntry};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

/// Result of processing an operation
///
/// Distinguishes between:
/// - Logged: the document changed and the edit should be recorded
/// - Unlogged: the operation succeeded but was a no-op
/// - Failed: the operation was rejected; the input document still stands
pub enum ExecutionResult<T, E> {
    /// Operation succeeded and should be logged
    Logged { value: T, log_entry: LogEntry },
    /// Operation succeeded without changing anything
    Unlogged { value: T },
    /// Operation failed
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}

/// Applies operations to documents, attributing each logged edit to an actor
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    actor: Option<String>,
}

impl DocumentProcessor {
    /// Processor without actor attribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor that stamps every log entry with `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Apply `op` to `doc`.
    ///
    /// Returns the next document. A result identical to the input is
    /// `Unlogged`; failures carry a log entry describing the rejected edit.
    pub fn process<O>(
        &self,
        op: &O,
        doc: &BoardDocument,
        ctx: &EngineContext,
    ) -> ExecutionResult<BoardDocument, DocumentError>
    where
        O: Apply + Serialize,
    {
        let op_string = op.op_string();
        let input = match serde_json::to_value(op) {
            Ok(input) => input,
            Err(error) => {
                warn!(op = %op_string, %error, "Could not serialize operation input; logging null");
                Value::Null
            }
        };
        let started = Instant::now();
        let outcome = op.apply(doc, ctx);
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(next) if &next == doc => {
                debug!(op = %op_string, "Operation left the document unchanged");
                ExecutionResult::Unlogged { value: next }
            }
            Ok(next) => {
                debug!(
                    op = %op_string,
                    duration_ms,
                    columns = next.columns.len(),
                    live_tasks = next.live_task_count(),
                    "Applied operation"
                );
                let log_entry = self.attribute(LogEntry::success(
                    op_string,
                    input,
                    summarize(&next),
                    duration_ms,
                ));
                ExecutionResult::Logged {
                    value: next,
                    log_entry,
                }
            }
            Err(error) => {
                warn!(op = %op_string, %error, "Operation rejected");
                let log_entry = self.attribute(LogEntry::failure(
                    op_string,
                    input,
                    &error.to_string(),
                    duration_ms,
                ));
                ExecutionResult::Failed {
                    error,
                    log_entry: Some(log_entry),
                }
            }
        }
    }

    fn attribute(&self, entry: LogEntry) -> LogEntry {
        match &self.actor {
            Some(actor) => entry.with_actor(actor.clone()),
            None => entry,
        }
    }
}

/// Compact description of a document for log output
fn summarize(doc: &BoardDocument) -> Value {
    json!({
        "columns": doc.column_order.len(),
        "liveTasks": doc.live_task_count(),
        "archivedTasks": doc.archived_task_count(),
    })
}
