//! UpdateTask command

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, patch_field, Apply};
use crate::types::{BoardDocument, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Update the editable fields of a live task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// The task ID to update
    pub id: TaskId,
    /// New card text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New markdown description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New due date (None = don't change, Some(None) = clear, Some(Some(x)) = set)
    #[serde(
        default,
        deserialize_with = "patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

operation!(UpdateTask, verb = "update", noun = "task", description = "Update task properties");

impl UpdateTask {
    /// Create a new UpdateTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            content: None,
            description: None,
            due_date: None,
            completed: None,
        }
    }

    /// Set the card text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Remove the due date
    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Mark the task done or not done
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

impl Apply for UpdateTask {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let task = next
            .find_task_mut(&self.id)
            .ok_or_else(|| DocumentError::task_not_found(&self.id))?;

        if let Some(content) = &self.content {
            task.content = content.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }

        Ok(next)
    }
}
