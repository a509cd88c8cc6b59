//! Task move commands

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::types::{BoardDocument, ColumnId, Task, TaskId};
use serde::{Deserialize, Serialize};

/// Reorder tasks inside one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskWithinColumn {
    pub column_id: ColumnId,
    pub from_index: usize,
    pub to_index: usize,
}

operation!(
    MoveTaskWithinColumn,
    verb = "reorder",
    noun = "task",
    description = "Move a task to another position in its column"
);

impl MoveTaskWithinColumn {
    pub fn new(column_id: impl Into<ColumnId>, from_index: usize, to_index: usize) -> Self {
        Self {
            column_id: column_id.into(),
            from_index,
            to_index,
        }
    }
}

impl Apply for MoveTaskWithinColumn {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let column = next
            .column_mut(&self.column_id)
            .ok_or_else(|| DocumentError::column_not_found(&self.column_id))?;

        let len = column.tasks.len();
        for index in [self.from_index, self.to_index] {
            if index >= len {
                return Err(DocumentError::InvalidIndex { index, len });
            }
        }

        reposition(&mut column.tasks, self.from_index, self.to_index);
        Ok(next)
    }
}

/// Move a task from one column to a position in another.
///
/// The destination index is clamped to the destination length, so a stale
/// index from a drag gesture still lands the task at the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskBetweenColumns {
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    pub dest_column_id: ColumnId,
    pub dest_index: usize,
}

operation!(
    MoveTaskBetweenColumns,
    verb = "move",
    noun = "task",
    description = "Move a task to a different column"
);

impl MoveTaskBetweenColumns {
    pub fn new(
        task_id: impl Into<TaskId>,
        source_column_id: impl Into<ColumnId>,
        dest_column_id: impl Into<ColumnId>,
        dest_index: usize,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            source_column_id: source_column_id.into(),
            dest_column_id: dest_column_id.into(),
            dest_index,
        }
    }

    /// Move to the end of the destination column
    pub fn to_end(
        task_id: impl Into<TaskId>,
        source_column_id: impl Into<ColumnId>,
        dest_column_id: impl Into<ColumnId>,
    ) -> Self {
        Self::new(task_id, source_column_id, dest_column_id, usize::MAX)
    }
}

impl Apply for MoveTaskBetweenColumns {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        for id in [&self.source_column_id, &self.dest_column_id] {
            if doc.column(id).is_none() {
                return Err(DocumentError::column_not_found(id));
            }
        }

        let mut next = doc.clone();
        let source = next
            .column_mut(&self.source_column_id)
            .ok_or_else(|| DocumentError::column_not_found(&self.source_column_id))?;
        let from = source
            .task_index(&self.task_id)
            .ok_or_else(|| DocumentError::task_not_found(&self.task_id))?;

        if self.source_column_id == self.dest_column_id {
            let to = self.dest_index.min(source.tasks.len() - 1);
            reposition(&mut source.tasks, from, to);
            return Ok(next);
        }

        let task = source.tasks.remove(from);
        let dest = next
            .column_mut(&self.dest_column_id)
            .ok_or_else(|| DocumentError::column_not_found(&self.dest_column_id))?;
        let at = self.dest_index.min(dest.tasks.len());
        dest.tasks.insert(at, task);
        Ok(next)
    }
}

/// Remove at `from`, insert at `to`. Both must be in bounds.
fn reposition(tasks: &mut Vec<Task>, from: usize, to: usize) {
    if from != to {
        let task = tasks.remove(from);
        tasks.insert(to, task);
    }
}
