//! DeleteTask command

use crate::context::EngineContext;
use crate::error::Result;
use crate::operation::{operation, Apply};
use crate::relationships::sever_references;
use crate::types::{BoardDocument, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Delete a live task wherever it is. Deleting an absent task is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTask {
    pub id: TaskId,
}

operation!(DeleteTask, verb = "delete", noun = "task", description = "Delete a task from the board");

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

impl Apply for DeleteTask {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let Some((column_id, index)) = doc.locate_task(&self.id) else {
            return Ok(next);
        };

        if let Some(column) = next.column_mut(column_id) {
            column.tasks.remove(index);
        }
        sever_references(&mut next, &HashSet::from([self.id.clone()]));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SequentialIds;
    use crate::task::{AddTask, SetSubtasks};
    use crate::template::STANDARD_3;

    fn setup() -> (EngineContext, BoardDocument, TaskId, TaskId) {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let doc = BoardDocument::from_template(STANDARD_3, &ctx);
        let todo = doc.column_order[0].clone();
        let doc = AddTask::new(todo.clone(), "Parent").apply(&doc, &ctx).unwrap();
        let doc = AddTask::new(todo.clone(), "Child").apply(&doc, &ctx).unwrap();
        let parent = doc.columns[&todo].tasks[0].id.clone();
        let child = doc.columns[&todo].tasks[1].id.clone();
        let doc = SetSubtasks::new(parent.clone(), vec![child.clone()])
            .apply(&doc, &ctx)
            .unwrap();
        (ctx, doc, parent, child)
    }

    #[test]
    fn test_delete_task() {
        let (ctx, doc, _, child) = setup();
        let next = DeleteTask::new(child.clone()).apply(&doc, &ctx).unwrap();
        assert_eq!(next.live_task_count(), 1);
        assert!(next.find_task(&child).is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (ctx, doc, _, child) = setup();
        let once = DeleteTask::new(child.clone()).apply(&doc, &ctx).unwrap();
        let twice = DeleteTask::new(child).apply(&once, &ctx).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_delete_parent_orphans_children() {
        let (ctx, doc, parent, child) = setup();
        let next = DeleteTask::new(parent).apply(&doc, &ctx).unwrap();
        assert_eq!(next.find_task(&child).unwrap().parent_id, None);
    }

    #[test]
    fn test_delete_child_prunes_subtasks() {
        let (ctx, doc, parent, child) = setup();
        let next = DeleteTask::new(child).apply(&doc, &ctx).unwrap();
        assert!(next.find_task(&parent).unwrap().subtasks.is_empty());
    }
}
