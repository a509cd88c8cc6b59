//! UpdateBoard command

use crate::color::is_hex_color;
use crate::context::EngineContext;
use crate::error::{DocumentError, Result};
use crate::operation::{operation, patch_field, Apply};
use crate::types::BoardDocument;
use serde::{Deserialize, Serialize};

/// Update board metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    /// New board description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New card gradient (None = don't change, Some(None) = clear)
    #[serde(
        default,
        deserialize_with = "patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub gradient_colors: Option<Option<[String; 2]>>,
}

operation!(UpdateBoard, verb = "update", noun = "board", description = "Update board description or gradient");

impl UpdateBoard {
    /// Create a new UpdateBoard command
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the card gradient
    pub fn with_gradient(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.gradient_colors = Some(Some([from.into(), to.into()]));
        self
    }

    /// Remove the card gradient
    pub fn clear_gradient(mut self) -> Self {
        self.gradient_colors = Some(None);
        self
    }
}

impl Apply for UpdateBoard {
    fn apply(&self, doc: &BoardDocument, _ctx: &EngineContext) -> Result<BoardDocument> {
        if let Some(Some(colors)) = &self.gradient_colors {
            if let Some(bad) = colors.iter().find(|c| !is_hex_color(c)) {
                return Err(DocumentError::invalid_value(
                    "gradient_colors",
                    format!("expected #RRGGBB, got {bad:?}"),
                ));
            }
        }

        let mut next = doc.clone();
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(gradient) = &self.gradient_colors {
            next.gradient_colors = gradient.clone();
        }
        Ok(next)
    }
}
