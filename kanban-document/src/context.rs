//! EngineContext - collaborators passed to every operation
//!
//! The context provides access to id and color sources plus configuration.
//! No document state lives here; operations do all the work on the document
//! they are given.

use crate::color::{pick_distinct_color, ColorSource, RandomColors};
use crate::config::EngineConfig;
use crate::identity::{IdGenerator, RandomIds};
use crate::types::BoardDocument;
use std::fmt;
use std::sync::Arc;

/// Context passed to every operation - provides collaborators, not logic
#[derive(Clone)]
pub struct EngineContext {
    ids: Arc<dyn IdGenerator>,
    colors: Arc<dyn ColorSource>,
    config: EngineConfig,
}

impl EngineContext {
    /// Random ids and colors, tuned by `config`
    pub fn new(config: EngineConfig) -> Self {
        Self {
            ids: Arc::new(RandomIds::new(config.display_id_min, config.display_id_max)),
            colors: Arc::new(RandomColors),
            config,
        }
    }

    /// Replace the id generator
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Replace the color source
    pub fn with_colors(mut self, colors: impl ColorSource + 'static) -> Self {
        self.colors = Arc::new(colors);
        self
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    pub fn colors(&self) -> &dyn ColorSource {
        self.colors.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A highlight color not used by any column of `doc`
    pub fn pick_column_color(&self, doc: &BoardDocument) -> String {
        self.pick_color_avoiding(&doc.highlight_colors())
    }

    /// A color not in `existing`, honoring the configured retry cap
    pub fn pick_color_avoiding(&self, existing: &[&str]) -> String {
        pick_distinct_color(existing, self.colors(), self.config.color_retry_limit)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CyclingColors;
    use crate::identity::SequentialIds;
    use crate::types::{Column, ColumnId};

    #[test]
    fn test_pick_column_color_skips_used() {
        let ctx = EngineContext::default()
            .with_ids(SequentialIds::new())
            .with_colors(CyclingColors::new(["#AF522B", "#23863D"]));

        let mut doc = BoardDocument::new();
        let col = Column::new(ColumnId::from_string("a"), "A", "#AF522B");
        doc.columns.insert(col.id.clone(), col);
        doc.column_order.push("a".into());

        assert_eq!(ctx.pick_column_color(&doc), "#23863D");
    }

    #[test]
    fn test_context_uses_configured_display_range() {
        let config = EngineConfig {
            display_id_min: 7,
            display_id_max: 7,
            ..EngineConfig::default()
        };
        let ctx = EngineContext::new(config);
        assert_eq!(ctx.ids().display_id(), "7");
    }
}
