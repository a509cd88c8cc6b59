//! AddColumn command

use crate::color::is_hex_color;
use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::types::{BoardDocument, Column};
use serde::{Deserialize, Serialize};

/// Add a new empty column at the end of the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddColumn {
    /// The column display name
    pub title: String,
    /// Explicit `#RRGGBB` color; picked automatically when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
}

operation!(AddColumn, verb = "add", noun = "column", description = "Add a new column to the board");

impl AddColumn {
    /// Create a new AddColumn command
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            highlight_color: None,
        }
    }

    /// Use a specific highlight color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = Some(color.into());
        self
    }
}

impl Apply for AddColumn {
    fn apply(&self, doc: &BoardDocument, ctx: &EngineContext) -> Result<BoardDocument> {
        let color = match &self.highlight_color {
            Some(color) if is_hex_color(color) => color.clone(),
            Some(color) => {
                return Err(DocumentError::invalid_value(
                    "highlight_color",
                    format!("expected #RRGGBB, got {color:?}"),
                ))
            }
            None => ctx.pick_column_color(doc),
        };

        let mut next = doc.clone();
        let id = ctx.ids().column_id();
        next.columns
            .insert(id.clone(), Column::new(id.clone(), self.title.as_str(), color));
        next.column_order.push(id);
        Ok(next)
    }
}
