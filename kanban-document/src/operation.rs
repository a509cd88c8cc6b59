//! Operation traits.
//!
//! Operations are structs where the fields ARE the parameters. Each one is a
//! pure transition: it reads the document it is given and returns a new one,
//! or an error with the input left as the document of record.
//!
//! ```
//! use kanban_document::{column::AddColumn, task::AddTask, Apply, BoardDocument, EngineContext};
//!
//! # fn main() -> kanban_document::Result<()> {
//! let ctx = EngineContext::default();
//! let doc = AddColumn::new("To Do").apply(&BoardDocument::new(), &ctx)?;
//! let todo = doc.column_order[0].clone();
//! let doc = AddTask::new(todo.clone(), "Write the release notes").apply(&doc, &ctx)?;
//! assert_eq!(doc.columns[&todo].tasks.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::context::EngineContext;
use crate::error::Result;
use crate::types::BoardDocument;
use serde::{Deserialize, Deserializer};

/// Metadata every operation carries
pub trait Operation {
    /// Verb, e.g. "move"
    fn verb(&self) -> &'static str;

    /// Noun, e.g. "task"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Canonical op string (e.g. "move task"), used in logs
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// A pure document transition
pub trait Apply: Operation {
    /// Produce the next document. Never mutates `doc`.
    fn apply(&self, doc: &BoardDocument, ctx: &EngineContext) -> Result<BoardDocument>;
}

/// Implement [`Operation`] for a command struct.
macro_rules! operation {
    ($ty:ty, verb = $verb:literal, noun = $noun:literal, description = $desc:literal) => {
        impl $crate::operation::Operation for $ty {
            fn verb(&self) -> &'static str {
                $verb
            }

            fn noun(&self) -> &'static str {
                $noun
            }

            fn description(&self) -> &'static str {
                $desc
            }
        }
    };
}

pub(crate) use operation;

/// Patch fields: absent means "keep", `null` means "clear".
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub(crate) fn patch_field<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
