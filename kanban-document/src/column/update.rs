//! UpdateColumn command

use crate::color::is_hex_color;
use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, Apply};
use crate::types::{BoardDocument, ColumnId};
use serde::{Deserialize, Serialize};

/// Shallow-merge title, color and minimized state into a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateColumn {
    /// The column ID to update
    pub id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New `#RRGGBB` highlight color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimized: Option<bool>,
}

operation!(UpdateColumn, verb = "update", noun = "column", description = "Update column properties");

impl UpdateColumn {
    /// Create a new UpdateColumn command
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            highlight_color: None,
            minimized: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the highlight color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = Some(color.into());
        self
    }

    /// Collapse or expand the column
    pub fn with_minimized(mut self, minimized: bool) -> Self {
        self.minimized = Some(minimized);
        self
    }
}

impl Apply for UpdateColumn {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        if let Some(color) = self.highlight_color.as_deref().filter(|c| !is_hex_color(c)) {
            return Err(DocumentError::invalid_value(
                "highlight_color",
                format!("expected #RRGGBB, got {color:?}"),
            ));
        }

        let mut next = doc.clone();
        let column = next
            .column_mut(&self.id)
            .ok_or_else(|| DocumentError::column_not_found(&self.id))?;

        if let Some(title) = &self.title {
            column.title = title.clone();
        }
        if let Some(color) = &self.highlight_color {
            column.highlight_color = color.clone();
        }
        if let Some(minimized) = self.minimized {
            column.minimized = minimized;
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SequentialIds;
    use crate::template::STANDARD_3;

    fn setup() -> (EngineContext, BoardDocument, ColumnId) {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let doc = BoardDocument::from_template(STANDARD_3, &ctx);
        let id = doc.column_order[1].clone();
        (ctx, doc, id)
    }

    #[test]
    fn test_update_column() {
        let (ctx, doc, id) = setup();
        let next = UpdateColumn::new(id.clone())
            .with_title("Doing")
            .with_minimized(true)
            .apply(&doc, &ctx)
            .unwrap();

        let column = &next.columns[&id];
        assert_eq!(column.title, "Doing");
        assert!(column.minimized);
        // untouched
        assert_eq!(column.highlight_color, "#23863D");
        assert_eq!(next.column_order, doc.column_order);
    }

    #[test]
    fn test_update_column_color() {
        let (ctx, doc, id) = setup();
        let next = UpdateColumn::new(id.clone())
            .with_color("#000000")
            .apply(&doc, &ctx)
            .unwrap();
        assert_eq!(next.columns[&id].highlight_color, "#000000");

        let result = UpdateColumn::new(id).with_color("#00000").apply(&doc, &ctx);
        assert!(matches!(result, Err(DocumentError::InvalidValue { .. })));
    }

    #[test]
    fn test_update_unknown_column() {
        let (ctx, doc, _) = setup();
        let result = UpdateColumn::new("nope").with_title("x").apply(&doc, &ctx);
        assert!(matches!(result, Err(DocumentError::ColumnNotFound { .. })));
    }
}
