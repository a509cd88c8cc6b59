//! Drag-and-drop translation.
//!
//! A drop names an active id and an over id, each of which may be a column or
//! a task. Ids are told apart by lookup: a key of `columns` is a column, an
//! id found in a column's task list is a task. Every drop resolves to at most
//! one document operation.

use crate::column::ReorderColumns;
use crate::context::EngineContext;
use crate::error::Result;
use crate::operation::{Apply, Operation};
use crate::task::{MoveTaskBetweenColumns, MoveTaskWithinColumn};
use crate::types::{BoardDocument, ColumnId, TaskId};
use tracing::{debug, trace};

/// The single operation a drop turns into
#[derive(Debug, Clone)]
pub enum DragResolution {
    /// Nothing to do (dropped on itself, stale ids, no movement)
    NoOp,
    ReorderColumns(ReorderColumns),
    MoveWithin(MoveTaskWithinColumn),
    MoveBetween(MoveTaskBetweenColumns),
}

impl DragResolution {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Op string of the resolved operation, if any
    pub fn op_string(&self) -> Option<String> {
        match self {
            Self::NoOp => None,
            Self::ReorderColumns(op) => Some(op.op_string()),
            Self::MoveWithin(op) => Some(op.op_string()),
            Self::MoveBetween(op) => Some(op.op_string()),
        }
    }

    /// Apply the resolved operation; `NoOp` returns the document unchanged
    pub fn apply(&self, doc: &BoardDocument, ctx: &EngineContext) -> Result<BoardDocument> {
        match self {
            Self::NoOp => Ok(doc.clone()),
            Self::ReorderColumns(op) => op.apply(doc, ctx),
            Self::MoveWithin(op) => op.apply(doc, ctx),
            Self::MoveBetween(op) => op.apply(doc, ctx),
        }
    }
}

/// What a raw id points at
enum Target<'a> {
    Column(&'a ColumnId),
    Task {
        id: &'a TaskId,
        column: &'a ColumnId,
        index: usize,
    },
}

fn resolve<'a>(doc: &'a BoardDocument, id: &str) -> Option<Target<'a>> {
    if let Some((column_id, _)) = doc.columns.get_key_value(id) {
        return Some(Target::Column(column_id));
    }
    doc.columns.iter().find_map(|(column_id, column)| {
        column
            .tasks
            .iter()
            .enumerate()
            .find(|(_, t)| t.id == id)
            .map(|(index, task)| Target::Task {
                id: &task.id,
                column: column_id,
                index,
            })
    })
}

/// Translate a drop of `active_id` over `over_id` into one operation
pub fn resolve_drop(doc: &BoardDocument, active_id: &str, over_id: &str) -> DragResolution {
    if active_id == over_id {
        return DragResolution::NoOp;
    }
    let (Some(active), Some(over)) = (resolve(doc, active_id), resolve(doc, over_id)) else {
        trace!(active_id, over_id, "Drop references unknown ids");
        return DragResolution::NoOp;
    };

    match active {
        Target::Column(active_column) => {
            let over_column = match over {
                Target::Column(column) => column,
                Target::Task { column, .. } => column,
            };
            match (
                doc.column_position(active_column),
                doc.column_position(over_column),
            ) {
                (Some(from), Some(to)) if from != to => {
                    DragResolution::ReorderColumns(ReorderColumns::new(from, to))
                }
                _ => DragResolution::NoOp,
            }
        }
        Target::Task {
            id,
            column: source,
            index: from,
        } => {
            let (dest, over_index) = match over {
                Target::Column(column) => (column, None),
                Target::Task { column, index, .. } => (column, Some(index)),
            };

            if source == dest {
                let len = doc.column(source).map_or(0, |c| c.tasks.len());
                let to = over_index.unwrap_or(len.saturating_sub(1));
                if to == from {
                    return DragResolution::NoOp;
                }
                return DragResolution::MoveWithin(MoveTaskWithinColumn::new(source, from, to));
            }

            let dest_index =
                over_index.unwrap_or_else(|| doc.column(dest).map_or(0, |c| c.tasks.len()));
            DragResolution::MoveBetween(MoveTaskBetweenColumns::new(id, source, dest, dest_index))
        }
    }
}

/// Where a drag gesture stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { active_id: String },
}

/// `Idle -> Dragging -> Idle`, applying one operation on drop
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging `active_id`, replacing any gesture in progress
    pub fn start(&mut self, active_id: impl Into<String>) {
        self.state = DragState::Dragging {
            active_id: active_id.into(),
        };
    }

    /// Abandon the gesture without touching the document
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finish the gesture over `over_id` and return the next document.
    ///
    /// Without a drag in progress or without a target the document is
    /// returned unchanged. The session is idle afterwards, even on error.
    pub fn drop_on(
        &mut self,
        over_id: Option<&str>,
        doc: &BoardDocument,
        ctx: &EngineContext,
    ) -> Result<BoardDocument> {
        let DragState::Dragging { active_id } = std::mem::take(&mut self.state) else {
            return Ok(doc.clone());
        };
        let Some(over_id) = over_id else {
            return Ok(doc.clone());
        };

        let resolution = resolve_drop(doc, &active_id, over_id);
        if let Some(op) = resolution.op_string() {
            debug!(active_id = %active_id, over_id, op = %op, "Resolved drop");
        }
        resolution.apply(doc, ctx)
    }
}
