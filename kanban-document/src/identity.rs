//! Identity generation for new tasks and columns.
//!
//! Ids are UUIDs; display ids are short numbers meant for humans and are
//! allowed to repeat.

use crate::types::{ColumnId, TaskId};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies ids for entities created by operations
pub trait IdGenerator: Send + Sync {
    fn task_id(&self) -> TaskId;
    fn column_id(&self) -> ColumnId;
    /// Short human-facing label for a new task
    fn display_id(&self) -> String;
}

/// UUID v4 ids and random display numbers in `min..=max`
#[derive(Debug, Clone, Copy)]
pub struct RandomIds {
    display_min: u32,
    display_max: u32,
}

impl RandomIds {
    pub fn new(display_min: u32, display_max: u32) -> Self {
        Self {
            display_min: display_min.min(display_max),
            display_max: display_max.max(display_min),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new(100, 999)
    }
}

impl IdGenerator for RandomIds {
    fn task_id(&self) -> TaskId {
        TaskId::new()
    }

    fn column_id(&self) -> ColumnId {
        ColumnId::new()
    }

    fn display_id(&self) -> String {
        rand::rng()
            .random_range(self.display_min..=self.display_max)
            .to_string()
    }
}

/// Predictable ids (`task-1`, `column-2`, display `1`, ...) for tests and fixtures
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIds {
    fn task_id(&self) -> TaskId {
        TaskId::from_string(format!("task-{}", self.bump()))
    }

    fn column_id(&self) -> ColumnId {
        ColumnId::from_string(format!("column-{}", self.bump()))
    }

    fn display_id(&self) -> String {
        self.next.load(Ordering::Relaxed).to_string()
    }
}
