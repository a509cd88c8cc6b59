//! Column commands

mod add;
mod archive;
mod delete;
mod reorder;
mod update;

pub use add::AddColumn;
pub use archive::ArchiveColumn;
pub use delete::DeleteColumn;
pub use reorder::ReorderColumns;
pub use update::UpdateColumn;
