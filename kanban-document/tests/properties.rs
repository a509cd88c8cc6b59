//! Property tests: random edit sequences keep the document consistent

use chrono::NaiveDate;
use kanban_document::{
    color::{pick_distinct_color, CyclingColors, PALETTE},
    column::{AddColumn, ArchiveColumn, DeleteColumn, ReorderColumns},
    identity::SequentialIds,
    normalize::check_invariants,
    task::{
        AddTask, ArchiveTask, DeleteTask, MoveTaskBetweenColumns, MoveTaskWithinColumn, SetParent,
        SetSubtasks,
    },
    template::STANDARD_4,
    Apply, BoardDocument, ColumnId, EngineContext, TaskId,
};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Edit {
    Add { column: usize },
    Delete { task: usize },
    Archive { task: usize },
    ArchiveColumn { column: usize },
    Within { column: usize, from: usize, to: usize },
    Between { task: usize, dest: usize, index: usize },
    Parent { task: usize, parent: Option<usize> },
    Subtasks { task: usize, children: Vec<usize> },
    Reorder { from: usize, to: usize },
    AddColumn,
    DeleteColumn { column: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (0..4usize).prop_map(|column| Edit::Add { column }),
        1 => (0..16usize).prop_map(|task| Edit::Delete { task }),
        1 => (0..16usize).prop_map(|task| Edit::Archive { task }),
        1 => (0..4usize).prop_map(|column| Edit::ArchiveColumn { column }),
        1 => (0..4usize, 0..8usize, 0..8usize)
            .prop_map(|(column, from, to)| Edit::Within { column, from, to }),
        1 => (0..16usize, 0..4usize, 0..10usize)
            .prop_map(|(task, dest, index)| Edit::Between { task, dest, index }),
        2 => (0..16usize, proptest::option::of(0..16usize))
            .prop_map(|(task, parent)| Edit::Parent { task, parent }),
        2 => (0..16usize, proptest::collection::vec(0..16usize, 0..4))
            .prop_map(|(task, children)| Edit::Subtasks { task, children }),
        1 => (0..4usize, 0..4usize).prop_map(|(from, to)| Edit::Reorder { from, to }),
        1 => Just(Edit::AddColumn),
        1 => (0..4usize).prop_map(|column| Edit::DeleteColumn { column }),
    ]
}

fn nth_task(doc: &BoardDocument, n: usize) -> Option<TaskId> {
    let count = doc.live_task_count();
    if count == 0 {
        return None;
    }
    doc.live_tasks().nth(n % count).map(|t| t.id.clone())
}

fn column_of(doc: &BoardDocument, id: &TaskId) -> usize {
    doc.locate_task(id)
        .and_then(|(column, _)| doc.column_position(column))
        .unwrap_or(0)
}

/// Apply one edit; errors are allowed and must leave `doc` untouched
fn step(doc: &BoardDocument, edit: &Edit, ctx: &EngineContext) -> BoardDocument {
    let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    if doc.column_order.is_empty() && !matches!(edit, Edit::AddColumn) {
        return doc.clone();
    }
    let column = |i: usize| doc.column_order[i % doc.column_order.len()].clone();

    let result = match edit {
        Edit::AddColumn => AddColumn::new("column").apply(doc, ctx),
        Edit::DeleteColumn { column: c } => DeleteColumn::new(column(*c)).apply(doc, ctx),
        Edit::Add { column: c } => AddTask::new(column(*c), "task").apply(doc, ctx),
        Edit::Delete { task } => match nth_task(doc, *task) {
            Some(id) => DeleteTask::new(id).apply(doc, ctx),
            None => return doc.clone(),
        },
        Edit::Archive { task } => match nth_task(doc, *task) {
            Some(id) => ArchiveTask::new(id).as_of(day).apply(doc, ctx),
            None => return doc.clone(),
        },
        Edit::ArchiveColumn { column: c } => ArchiveColumn::new(column(*c)).as_of(day).apply(doc, ctx),
        Edit::Within { column: c, from, to } => {
            MoveTaskWithinColumn::new(column(*c), *from, *to).apply(doc, ctx)
        }
        Edit::Between { task, dest, index } => match nth_task(doc, *task) {
            Some(id) => {
                let source = column(column_of(doc, &id));
                MoveTaskBetweenColumns::new(id, source, column(*dest), *index).apply(doc, ctx)
            }
            None => return doc.clone(),
        },
        Edit::Parent { task, parent } => match nth_task(doc, *task) {
            Some(id) => {
                let parent = parent.and_then(|p| nth_task(doc, p));
                SetParent::new(id, parent).apply(doc, ctx)
            }
            None => return doc.clone(),
        },
        Edit::Subtasks { task, children } => match nth_task(doc, *task) {
            Some(id) => {
                let children = children.iter().filter_map(|c| nth_task(doc, *c)).collect();
                SetSubtasks::new(id, children).apply(doc, ctx)
            }
            None => return doc.clone(),
        },
        Edit::Reorder { from, to } => ReorderColumns::new(*from, *to).apply(doc, ctx),
    };

    result.unwrap_or_else(|_| doc.clone())
}

fn total(doc: &BoardDocument) -> usize {
    doc.live_task_count() + doc.archived_task_count()
}

/// Live tasks in the column a `DeleteColumn` edit would remove
fn tasks_in(doc: &BoardDocument, c: usize) -> usize {
    if doc.column_order.is_empty() {
        return 0;
    }
    let id = &doc.column_order[c % doc.column_order.len()];
    doc.column(id).map_or(0, |column| column.tasks.len())
}

proptest! {
    #[test]
    fn prop_invariants_hold_under_random_edits(edits in proptest::collection::vec(edit(), 1..40)) {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let mut doc = BoardDocument::from_template(STANDARD_4, &ctx);

        for edit in &edits {
            let before = total(&doc);
            let deleting = match edit {
                Edit::Delete { task } => nth_task(&doc, *task).is_some(),
                _ => false,
            };
            let dropped = match edit {
                Edit::DeleteColumn { column } => tasks_in(&doc, *column),
                _ => 0,
            };
            let next = step(&doc, edit, &ctx);

            let violations = check_invariants(&next);
            prop_assert!(violations.is_empty(), "{:?} after {:?}", violations, edit);

            // tasks are only created by add and destroyed by delete
            match edit {
                Edit::Add { .. } if !doc.column_order.is_empty() => {
                    prop_assert_eq!(total(&next), before + 1)
                }
                Edit::Delete { .. } if deleting => prop_assert_eq!(total(&next), before - 1),
                Edit::DeleteColumn { .. } => prop_assert_eq!(total(&next), before - dropped),
                _ => prop_assert_eq!(total(&next), before),
            }

            // column order is a permutation of the column keys
            let order: HashSet<&ColumnId> = next.column_order.iter().collect();
            let keys: HashSet<&ColumnId> = next.columns.keys().collect();
            prop_assert_eq!(order.len(), next.column_order.len(), "repeated column in order");
            prop_assert_eq!(order, keys);
            match edit {
                Edit::AddColumn => prop_assert_eq!(next.columns.len(), doc.columns.len() + 1),
                Edit::DeleteColumn { .. } if !doc.columns.is_empty() => {
                    prop_assert_eq!(next.columns.len(), doc.columns.len() - 1)
                }
                _ => prop_assert_eq!(next.columns.len(), doc.columns.len()),
            }
            doc = next;
        }
    }

    #[test]
    fn prop_delete_is_idempotent(adds in 1..8usize, pick in 0..8usize) {
        let ctx = EngineContext::default().with_ids(SequentialIds::new());
        let mut doc = BoardDocument::from_template(STANDARD_4, &ctx);
        for i in 0..adds {
            let column = doc.column_order[i % 4].clone();
            doc = AddTask::new(column, "task").apply(&doc, &ctx).unwrap();
        }

        let id = nth_task(&doc, pick).unwrap();
        let once = DeleteTask::new(id.clone()).apply(&doc, &ctx).unwrap();
        let twice = DeleteTask::new(id).apply(&once, &ctx).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_color_picking_terminates(taken in proptest::collection::vec(0..PALETTE.len(), 0..40)) {
        let existing: Vec<&str> = taken.iter().map(|i| PALETTE[*i]).collect();
        let color = pick_distinct_color(&existing, &CyclingColors::new(PALETTE.iter().copied()), 16);

        prop_assert!(color.starts_with('#') && color.len() == 7);
        let palette_exhausted = PALETTE.iter().all(|c| existing.contains(c));
        if !palette_exhausted {
            prop_assert!(!existing.contains(&color.as_str()));
        }
    }
}
