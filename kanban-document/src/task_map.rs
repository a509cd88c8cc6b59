//! Flattened task index derived from a document.
//!
//! The map borrows the document it was built from, so it cannot outlive an
//! edit; rebuild it after every change.

use crate::types::{BoardDocument, ColumnId, Task, TaskId};
use indexmap::IndexMap;

/// Where a live task sits and how it is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMapEntry<'a> {
    pub task: &'a Task,
    pub column_id: &'a ColumnId,
    /// Index within the column's task list
    pub index: usize,
    /// Highlight color of the containing column
    pub highlight_color: &'a str,
}

/// Live tasks by id, in display order
pub type TaskMap<'a> = IndexMap<&'a TaskId, TaskMapEntry<'a>>;

/// Index every live task. A duplicated id keeps its first position.
pub fn build_task_map(doc: &BoardDocument) -> TaskMap<'_> {
    let mut map = TaskMap::with_capacity(doc.live_task_count());
    for column in doc.ordered_columns() {
        for (index, task) in column.tasks.iter().enumerate() {
            map.entry(&task.id).or_insert(TaskMapEntry {
                task,
                column_id: &column.id,
                index,
                highlight_color: &column.highlight_color,
            });
        }
    }
    map
}
