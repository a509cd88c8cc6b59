//! Task commands

mod add;
mod archive;
mod delete;
mod mv;
mod relate;
mod update;

pub use add::AddTask;
pub use archive::ArchiveTask;
pub(crate) use archive::archived_copy;
pub use delete::DeleteTask;
pub use mv::{MoveTaskBetweenColumns, MoveTaskWithinColumn};
pub use relate::{SetParent, SetSubtasks};
pub use update::UpdateTask;
