//! Kanban board document engine
//!
//! A board is one nested value: ordered columns, each holding an ordered list
//! of tasks, plus a date-bucketed archive of removed tasks. This crate keeps
//! that document consistent under structural edits.
//!
//! ## Overview
//!
//! - **Pure operations** - every edit takes a document and returns a new one,
//!   or fails and leaves the input as it was
//! - **Relationship safety** - parent/subtask links are checked against the
//!   ancestry of both tasks, so the graph stays acyclic
//! - **Archive history** - archived tasks keep the title and color of the
//!   column they came from
//! - **One import boundary** - external JSON is normalized and checked once,
//!   in [`normalize`]
//!
//! ## Basic Usage
//!
//! ```rust
//! use kanban_document::{
//!     column::ArchiveColumn, task::AddTask, template, Apply, BoardDocument, EngineContext,
//! };
//!
//! # fn main() -> kanban_document::Result<()> {
//! let ctx = EngineContext::default();
//! let doc = BoardDocument::from_template(template::STANDARD_3, &ctx);
//! let done = doc.column_order[2].clone();
//!
//! let doc = AddTask::new(done.clone(), "Ship 1.0").apply(&doc, &ctx)?;
//! let doc = ArchiveColumn::new(done.clone()).apply(&doc, &ctx)?;
//!
//! assert!(doc.columns[&done].tasks.is_empty());
//! assert_eq!(doc.archived_task_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Document Shape
//!
//! ```text
//! {
//!   "columns": { "<column id>": { "id", "title", "tasks": [Task], "highlightColor", "minimized" } },
//!   "columnOrder": ["<column id>", ...],
//!   "archiveHistory": [ { "date": "YYYY-MM-DD", "tasks": [ArchivedTask] } ],
//!   "gradientColors": ["#RRGGBB", "#RRGGBB"],
//!   "description": "..."
//! }
//! ```

pub mod archive;
pub mod color;
pub mod config;
mod context;
pub mod drag;
mod error;
pub mod identity;
pub mod normalize;
mod operation;
mod processor;
pub mod relationships;
pub mod session;
pub mod store;
pub mod task_map;
pub mod template;
pub mod types;

// Command modules
pub mod board;
pub mod column;
pub mod task;

pub use config::EngineConfig;
pub use context::EngineContext;
pub use error::{DocumentError, Result};
pub use operation::{Apply, Operation};
pub use processor::{DocumentProcessor, ExecutionResult};
pub use session::BoardSession;
pub use task_map::{build_task_map, TaskMap, TaskMapEntry};

// Re-export commonly used types
pub use types::{
    ArchiveEntry, ArchivedTask, BoardDocument, BoardId, Column, ColumnId, LogEntry, Task, TaskId,
};
