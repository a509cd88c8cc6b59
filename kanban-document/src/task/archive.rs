//! ArchiveTask command

use crate::archive::{add_entry, today};
use crate::context::EngineContext;
use crate::error::Result;
use crate::operation::{operation, Apply};
use crate::relationships::sever_references;
use crate::types::{ArchivedTask, BoardDocument, Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Move a live task into the archive history under `as_of`.
///
/// Archiving an absent task is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveTask {
    pub id: TaskId,
    /// Archive date; defaults to today (local time)
    #[serde(default = "today")]
    pub as_of: NaiveDate,
}

operation!(ArchiveTask, verb = "archive", noun = "task", description = "Move a task into the archive");

impl ArchiveTask {
    /// Archive as of today
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            as_of: today(),
        }
    }

    /// Archive under a specific date
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = date;
        self
    }
}

impl Apply for ArchiveTask {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let Some((column_id, index)) = doc.locate_task(&self.id) else {
            return Ok(next);
        };
        let Some(column) = next.column_mut(column_id) else {
            return Ok(next);
        };

        let task = column.tasks.remove(index);
        let archived = archived_copy(task, self.as_of)
            .with_column(column.title.as_str(), column.highlight_color.as_str());

        sever_references(&mut next, &HashSet::from([self.id.clone()]));
        next.archive_history = add_entry(&next.archive_history, archived, self.as_of);
        Ok(next)
    }
}

/// The archived form of a task: out of the relationship graph, stamped with
/// the archive date
pub(crate) fn archived_copy(mut task: Task, date: NaiveDate) -> ArchivedTask {
    task.parent_id = None;
    task.subtasks.clear();
    ArchivedTask::new(task, date)
}
