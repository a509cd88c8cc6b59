//! DeleteColumn command

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::relationships::sever_references;
use crate::types::{BoardDocument, ColumnId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Delete a column together with its tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteColumn {
    pub id: ColumnId,
}

operation!(DeleteColumn, verb = "delete", noun = "column", description = "Delete a column and its tasks");

impl DeleteColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }
}

impl Apply for DeleteColumn {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let mut next = doc.clone();
        let column = next
            .columns
            .shift_remove(&self.id)
            .ok_or_else(|| DocumentError::column_not_found(&self.id))?;
        next.column_order.retain(|id| id != &self.id);

        if !column.is_empty() {
            debug!(column = %self.id, tasks = column.tasks.len(), "Deleting column with tasks");
        }
        let removed: HashSet<_> = column.tasks.into_iter().map(|t| t.id).collect();
        sever_references(&mut next, &removed);
        Ok(next)
    }
}
