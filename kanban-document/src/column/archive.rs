//! ArchiveColumn command

use crate::archive::{add_entries, today};
use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::relationships::sever_references;
use crate::task::archived_copy;
use crate::types::{BoardDocument, ColumnId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Archive every task of a column in one step. The column itself stays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveColumn {
    pub id: ColumnId,
    /// Archive date; defaults to today (local time)
    #[serde(default = "today")]
    pub as_of: NaiveDate,
}

operation!(ArchiveColumn, verb = "archive", noun = "column", description = "Archive all tasks of a column");

impl ArchiveColumn {
    /// Archive as of today
    pub fn new(id: impl Into<ColumnId>) -> Self {
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

impl Apply for ArchiveColumn {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let column = next
            .column_mut(&self.id)
            .ok_or_else(|| DocumentError::column_not_found(&self.id))?;
        if column.is_empty() {
            return Ok(next);
        }

        let tasks = std::mem::take(&mut column.tasks);
        let removed: HashSet<_> = tasks.iter().map(|t| t.id.clone()).collect();
        let archived = tasks
            .into_iter()
            .map(|task| {
                archived_copy(task, self.as_of)
                    .with_column(column.title.as_str(), column.highlight_color.as_str())
            })
            .collect();

        sever_references(&mut next, &removed);
        next.archive_history = add_entries(&next.archive_history, archived, self.as_of);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{entry_for, total_archived};
    use crate::identity::SequentialIds;
    use crate::task::{AddTask, ArchiveTask};
    use crate::template::STANDARD_3;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup() -> (EngineContext, BoardDocument, ColumnId) {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let mut doc = BoardDocument::from_template(STANDARD_3, &ctx);
        let done = doc.column_order[2].clone();
        for content in ["One", "Two", "Three"] {
            doc = AddTask::new(done.clone(), content).apply(&doc, &ctx).unwrap();
        }
        (ctx, doc, done)
    }

    #[test]
    fn test_archive_done_column() {
        let (ctx, doc, done) = setup();
        let next = ArchiveColumn::new(done.clone())
            .as_of(date("2025-01-15"))
            .apply(&doc, &ctx)
            .unwrap();

        assert!(next.columns[&done].tasks.is_empty());
        assert!(next.column_order.contains(&done));
        assert_eq!(next.archive_history.len(), 1);

        let entry = &next.archive_history[0];
        assert_eq!(entry.date, date("2025-01-15"));
        assert_eq!(entry.tasks.len(), 3);
        for archived in &entry.tasks {
            assert_eq!(archived.column_title.as_deref(), Some("Done"));
            assert_eq!(archived.highlight_color.as_deref(), Some("#3247D8"));
            assert_eq!(archived.task.archived_at, Some(date("2025-01-15")));
        }
        let contents: Vec<_> = entry.tasks.iter().map(|t| t.task.content.as_str()).collect();
        assert_eq!(contents, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_archive_appends_to_same_day() {
        let (ctx, doc, done) = setup();
        let first = doc.columns[&done].tasks[0].id.clone();
        let doc = ArchiveTask::new(first)
            .as_of(date("2025-01-15"))
            .apply(&doc, &ctx)
            .unwrap();
        let next = ArchiveColumn::new(done)
            .as_of(date("2025-01-15"))
            .apply(&doc, &ctx)
            .unwrap();

        assert_eq!(next.archive_history.len(), 1);
        assert_eq!(total_archived(&next.archive_history), 3);
        assert!(entry_for(&next.archive_history, date("2025-01-15")).is_some());
    }

    #[test]
    fn test_archive_empty_column_is_noop() {
        let (ctx, doc, _) = setup();
        let todo = doc.column_order[0].clone();
        let next = ArchiveColumn::new(todo).apply(&doc, &ctx).unwrap();
        assert_eq!(next, doc);
    }

    #[test]
    fn test_archive_unknown_column() {
        let (ctx, doc, _) = setup();
        let result = ArchiveColumn::new("nope").apply(&doc, &ctx);
        assert!(matches!(result, Err(DocumentError::ColumnNotFound { .. })));
    }
}
