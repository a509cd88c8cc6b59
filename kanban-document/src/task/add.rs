//! AddTask command

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::types::{BoardDocument, ColumnId, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Append a new task to the end of a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTask {
    /// The column to add to
    pub column_id: ColumnId,
    /// The card text (required)
    pub content: String,
    /// Markdown description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

operation!(AddTask, verb = "add", noun = "task", description = "Create a new task at the end of a column");

impl AddTask {
    /// Create a new AddTask command
    pub fn new(column_id: impl Into<ColumnId>, content: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            content: content.into(),
            description: None,
            due_date: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl Apply for AddTask {
    fn apply(&self, doc: &BoardDocument, ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let column = next
            .column_mut(&self.column_id)
            .ok_or_else(|| DocumentError::column_not_found(&self.column_id))?;

        let ids = ctx.ids();
        let mut task = Task::new(ids.task_id(), ids.display_id(), self.content.as_str());
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        task.due_date = self.due_date;

        column.tasks.push(task);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SequentialIds;
    use crate::template::STANDARD_3;

    fn setup() -> (EngineContext, BoardDocument) {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let doc = BoardDocument::from_template(STANDARD_3, &ctx);
        (ctx, doc)
    }

    #[test]
    fn test_add_task_appends() {
        let (ctx, doc) = setup();
        let todo = doc.column_order[0].clone();

        let doc = AddTask::new(todo.clone(), "First").apply(&doc, &ctx).unwrap();
        let doc = AddTask::new(todo.clone(), "Second")
            .with_description("Details")
            .apply(&doc, &ctx)
            .unwrap();

        let tasks = &doc.columns[&todo].tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].content, "First");
        assert_eq!(tasks[1].content, "Second");
        assert_eq!(tasks[1].description, "Details");
        assert_eq!(tasks[0].id, "task-4");
        assert_eq!(tasks[0].display_id, "4");
        assert!(tasks[0].parent_id.is_none());
        assert!(tasks[0].subtasks.is_empty());
    }

    #[test]
    fn test_add_task_random_display_id() {
        let ctx = EngineContext::default();
        let doc = BoardDocument::from_template(STANDARD_3, &ctx);
        let todo = doc.column_order[0].clone();

        let doc = AddTask::new(todo.clone(), "Task").apply(&doc, &ctx).unwrap();
        let display: u32 = doc.columns[&todo].tasks[0].display_id.parse().unwrap();
        assert!((100..=999).contains(&display));
    }

    #[test]
    fn test_add_task_unknown_column() {
        let (ctx, doc) = setup();
        let result = AddTask::new("nope", "Task").apply(&doc, &ctx);
        assert!(matches!(result, Err(DocumentError::ColumnNotFound { .. })));
    }

    #[test]
    fn test_add_task_leaves_input_untouched() {
        let (ctx, doc) = setup();
        let before = doc.clone();
        let todo = doc.column_order[0].clone();
        let _ = AddTask::new(todo, "Task").apply(&doc, &ctx).unwrap();
        assert_eq!(doc, before);
    }
}
