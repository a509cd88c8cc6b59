//! Core types for the board document

mod board;
mod ids;
mod log;
mod task;

// Re-export all types
pub use board::{ArchiveEntry, BoardDocument, Column};
pub use ids::{BoardId, ColumnId, TaskId};
pub use log::LogEntry;
pub use task::{parse_date_prefix, ArchivedTask, Task};
