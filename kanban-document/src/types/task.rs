//! Task types: live Task and its archived copy

use super::ids::TaskId;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A task/card living in exactly one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Short human-facing number; a display convenience, not a key
    #[serde(default)]
    pub display_id: String,
    #[serde(default)]
    pub content: String,
    /// Markdown body
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    /// Ordered, unique child ids; inverse of the children's `parent_id`
    #[serde(default)]
    pub subtasks: Vec<TaskId>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub archived_at: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a fresh task: no parent, no subtasks, not archived
    pub fn new(id: TaskId, display_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            display_id: display_id.into(),
            content: content.into(),
            description: String::new(),
            due_date: None,
            parent_id: None,
            subtasks: Vec::new(),
            archived_at: None,
            completed: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the parent id (does not touch the parent's subtask list)
    pub fn with_parent(mut self, parent_id: impl Into<TaskId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Check whether `id` is listed as a subtask
    pub fn has_subtask(&self, id: &TaskId) -> bool {
        self.subtasks.contains(id)
    }
}

/// A task as recorded in the archive history.
///
/// The column color and title are copied onto the entry because the column
/// may later be renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedTask {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_title: Option<String>,
}

impl ArchivedTask {
    /// Archive a task as of `date`, without column details
    pub fn new(mut task: Task, date: NaiveDate) -> Self {
        task.archived_at = Some(date);
        Self {
            task,
            highlight_color: None,
            column_title: None,
        }
    }

    /// Record the column the task was archived from
    pub fn with_column(mut self, title: impl Into<String>, highlight_color: impl Into<String>) -> Self {
        self.column_title = Some(title.into());
        self.highlight_color = Some(highlight_color.into());
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.task.id
    }
}

/// Accepts `null`, `""`, `YYYY-MM-DD`, or any string whose first ten
/// characters are a date (RFC 3339 timestamps written by browsers).
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date_prefix(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
    }
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp string
pub fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
