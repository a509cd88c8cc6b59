//! Parent/subtask assignment commands
//!
//! Both commands keep `parent_id` and the parent's `subtasks` list in sync
//! and refuse any edit that would put a task above one of its ancestors.

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::relationships::{find_ancestors, find_descendants};
use crate::types::{BoardDocument, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Replace a task's ordered subtask list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSubtasks {
    pub id: TaskId,
    /// New children, in order. Duplicates collapse to the first occurrence.
    pub subtasks: Vec<TaskId>,
}

operation!(SetSubtasks, verb = "set", noun = "subtasks", description = "Replace the subtasks of a task");

impl SetSubtasks {
    pub fn new(id: impl Into<TaskId>, subtasks: Vec<TaskId>) -> Self {
        Self {
            id: id.into(),
            subtasks,
        }
    }

    fn validate(&self, doc: &BoardDocument) -> Result<Vec<TaskId>> {
        let ancestors = find_ancestors(&self.id, doc.live_tasks());
        let mut seen = HashSet::new();
        let mut children = Vec::with_capacity(self.subtasks.len());

        for candidate in &self.subtasks {
            if !seen.insert(candidate) {
                continue;
            }
            let reject = |reason: String| {
                Err(DocumentError::invalid_relationship(&self.id, candidate, reason))
            };
            if candidate == &self.id {
                return reject("a task cannot be its own subtask".into());
            }
            let Some(task) = doc.find_task(candidate) else {
                return reject("subtask is not a live task".into());
            };
            if ancestors.contains(candidate) {
                return reject("subtask is an ancestor of the task".into());
            }
            if let Some(other) = task.parent_id.as_ref().filter(|p| *p != &self.id) {
                return reject(format!("already a subtask of {other}"));
            }
            children.push(candidate.clone());
        }
        Ok(children)
    }
}

impl Apply for SetSubtasks {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        if doc.find_task(&self.id).is_none() {
            return Err(DocumentError::task_not_found(&self.id));
        }
        let children = self.validate(doc)?;

        let mut next = doc.clone();
        for task in next.live_tasks_mut() {
            if task.id == self.id {
                task.subtasks = children.clone();
            } else if children.contains(&task.id) {
                task.parent_id = Some(self.id.clone());
            } else if task.parent_id.as_ref() == Some(&self.id) {
                task.parent_id = None;
            }
        }
        Ok(next)
    }
}

/// Set or clear a task's parent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetParent {
    pub id: TaskId,
    #[serde(default)]
    pub parent: Option<TaskId>,
}

operation!(SetParent, verb = "set", noun = "parent", description = "Set or clear the parent of a task");

impl SetParent {
    pub fn new(id: impl Into<TaskId>, parent: Option<TaskId>) -> Self {
        Self {
            id: id.into(),
            parent,
        }
    }

    /// Detach the task from its parent
    pub fn clear(id: impl Into<TaskId>) -> Self {
        Self::new(id, None)
    }
}

impl Apply for SetParent {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let task = doc
            .find_task(&self.id)
            .ok_or_else(|| DocumentError::task_not_found(&self.id))?;

        if let Some(parent) = &self.parent {
            let reject =
                |reason: &str| Err(DocumentError::invalid_relationship(&self.id, parent, reason));
            if parent == &self.id {
                return reject("a task cannot be its own parent");
            }
            if doc.find_task(parent).is_none() {
                return reject("parent is not a live task");
            }
            if find_descendants(&self.id, doc.live_tasks()).contains(parent) {
                return reject("parent is a descendant of the task");
            }
        }

        let old = task.parent_id.clone();
        let mut next = doc.clone();
        if old == self.parent {
            return Ok(next);
        }

        for task in next.live_tasks_mut() {
            if task.id == self.id {
                task.parent_id = self.parent.clone();
            } else if Some(&task.id) == old.as_ref() {
                task.subtasks.retain(|id| id != &self.id);
            } else if Some(&task.id) == self.parent.as_ref() && !task.has_subtask(&self.id) {
                task.subtasks.push(self.id.clone());
            }
        }
        Ok(next)
    }
}
