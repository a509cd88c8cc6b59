//! ReorderColumns command

use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::types::BoardDocument;
use serde::{Deserialize, Serialize};

/// Move one column to another position in the column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderColumns {
    pub from_index: usize,
    pub to_index: usize,
}

operation!(ReorderColumns, verb = "reorder", noun = "column", description = "Move a column to another position");

impl ReorderColumns {
    pub fn new(from_index: usize, to_index: usize) -> Self {
        Self {
            from_index,
            to_index,
        }
    }
}

impl Apply for ReorderColumns {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        let len = doc.column_order.len();
        for index in [self.from_index, self.to_index] {
            if index >= len {
                return Err(DocumentError::InvalidIndex { index, len });
            }
        }

        let mut next = doc.clone();
        let id = next.column_order.remove(self.from_index);
        next.column_order.insert(self.to_index, id);
        Ok(next)
    }
}
