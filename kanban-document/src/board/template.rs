//! ApplyTemplate command

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::template::{create_columns_from_template, is_template, TEMPLATE_NAMES};
use crate::types::BoardDocument;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Replace the board's columns with a fresh template set.
///
/// Live tasks go with the old columns; the archive is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyTemplate {
    pub name: String,
}

operation!(ApplyTemplate, verb = "apply", noun = "template", description = "Replace the board columns with a template");

impl ApplyTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Apply for ApplyTemplate {
    fn apply(&self, doc: &BoardDocument, ctx: &EngineContext) -> Result<BoardDocument> {
        if !is_template(&self.name) {
            return Err(DocumentError::invalid_value(
                "template",
                format!("unknown template {:?}, expected one of {TEMPLATE_NAMES:?}", self.name),
            ));
        }

        let dropped = doc.live_task_count();
        if dropped > 0 {
            debug!(template = %self.name, dropped, "Template replaces columns holding tasks");
        }

        let columns = create_columns_from_template(&self.name, ctx);
        let mut next = doc.clone();
        next.column_order = columns.keys().cloned().collect();
        next.columns = columns;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ArchiveColumn;
    use crate::identity::SequentialIds;
    use crate::task::AddTask;
    use crate::template::{ONE_COLUMN, STANDARD_4};
    use chrono::NaiveDate;

    #[test]
    fn test_apply_template_keeps_archive() {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let doc = BoardDocument::from_template(ONE_COLUMN, &ctx);
        let todo = doc.column_order[0].clone();
        let doc = AddTask::new(todo.clone(), "Keep me").apply(&doc, &ctx).unwrap();
        let doc = AddTask::new(todo.clone(), "Lose me").apply(&doc, &ctx).unwrap();
        let doc = ArchiveColumn::new(todo)
            .as_of(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .apply(&doc, &ctx)
            .unwrap();

        let next = ApplyTemplate::new(STANDARD_4).apply(&doc, &ctx).unwrap();
        assert_eq!(next.column_order.len(), 4);
        assert_eq!(next.archive_history, doc.archive_history);
        assert_eq!(next.live_task_count(), 0);
    }

    #[test]
    fn test_unknown_template_rejected() {
        let ctx = EngineContext::default();
        let doc = BoardDocument::from_template(ONE_COLUMN, &ctx);
        let result = ApplyTemplate::new("Scrum").apply(&doc, &ctx);
        assert!(matches!(result, Err(DocumentError::InvalidValue { .. })));
    }
}
