//! Board-level types: BoardDocument, Column, ArchiveEntry

use super::ids::{ColumnId, TaskId};
use super::task::{ArchivedTask, Task};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered lane of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// `#RRGGBB`
    #[serde(default)]
    pub highlight_color: String,
    #[serde(default)]
    pub minimized: bool,
}

impl Column {
    /// Create an empty, expanded column
    pub fn new(id: ColumnId, title: impl Into<String>, highlight_color: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tasks: Vec::new(),
            highlight_color: highlight_color.into(),
            minimized: false,
        }
    }

    /// Position of a task within this column
    pub fn task_index(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Check whether the column holds the task
    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.task_index(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// All archived tasks for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<ArchivedTask>,
}

impl ArchiveEntry {
    pub fn new(date: NaiveDate, tasks: Vec<ArchivedTask>) -> Self {
        Self { date, tasks }
    }
}

/// The full state of one board.
///
/// `column_order` is always a permutation of the keys of `columns`; operations
/// in this crate never return a document that breaks this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    #[serde(default)]
    pub columns: IndexMap<ColumnId, Column>,
    #[serde(default)]
    pub column_order: Vec<ColumnId>,
    /// Newest date first
    #[serde(default)]
    pub archive_history: Vec<ArchiveEntry>,
    /// Card background gradient, unrelated to column colors
    #[serde(
        default,
        serialize_with = "serialize_gradient",
        deserialize_with = "deserialize_gradient"
    )]
    pub gradient_colors: Option<[String; 2]>,
    #[serde(default)]
    pub description: String,
}

impl BoardDocument {
    /// An empty board: no columns, no archive, no gradient
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a column by id
    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Look up a column by id (mutable)
    pub fn column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.get_mut(id)
    }

    /// Check whether a raw id names a column
    pub fn is_column(&self, id: &str) -> bool {
        self.columns.contains_key(id)
    }

    /// Columns in display order
    pub fn ordered_columns(&self) -> impl Iterator<Item = &Column> {
        self.column_order.iter().filter_map(|id| self.columns.get(id))
    }

    /// Position of a column in `column_order`
    pub fn column_position(&self, id: &ColumnId) -> Option<usize> {
        self.column_order.iter().position(|c| c == id)
    }

    /// Locate a live task: its column id and index within that column
    pub fn locate_task(&self, id: &TaskId) -> Option<(&ColumnId, usize)> {
        self.columns
            .iter()
            .find_map(|(column_id, column)| column.task_index(id).map(|idx| (column_id, idx)))
    }

    /// Find a live task by id
    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.columns
            .values()
            .find_map(|column| column.tasks.iter().find(|t| &t.id == id))
    }

    /// Find a live task by id (mutable)
    pub fn find_task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.columns
            .values_mut()
            .find_map(|column| column.tasks.iter_mut().find(|t| &t.id == id))
    }

    /// All live tasks, column by column in display order
    pub fn live_tasks(&self) -> impl Iterator<Item = &Task> {
        self.ordered_columns().flat_map(|c| c.tasks.iter())
    }

    /// All live tasks (mutable, map order)
    pub fn live_tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.columns.values_mut().flat_map(|c| c.tasks.iter_mut())
    }

    pub fn live_task_count(&self) -> usize {
        self.columns.values().map(|c| c.tasks.len()).sum()
    }

    pub fn archived_task_count(&self) -> usize {
        self.archive_history.iter().map(|e| e.tasks.len()).sum()
    }

    /// Highlight colors currently in use by columns
    pub fn highlight_colors(&self) -> Vec<&str> {
        self.columns
            .values()
            .map(|c| c.highlight_color.as_str())
            .collect()
    }
}

fn serialize_gradient<S>(value: &Option<[String; 2]>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(pair) => pair.serialize(serializer),
        None => Vec::<String>::new().serialize(serializer),
    }
}

/// Boards are created with `gradientColors: []`; anything but a pair means "none".
fn deserialize_gradient<'de, D>(deserializer: D) -> Result<Option<[String; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(v) if v.len() == 2 => {
            let mut it = v.into_iter();
            match (it.next(), it.next()) {
                (Some(a), Some(b)) => Some([a, b]),
                _ => None,
            }
        }
        _ => None,
    })
}
