//! Board commands

mod template;
mod update;

pub use template::ApplyTemplate;
pub use update::UpdateBoard;
