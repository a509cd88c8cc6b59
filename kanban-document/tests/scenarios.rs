//! End-to-end board scenarios through the public API

use chrono::NaiveDate;
use std::collections::HashSet;
use kanban_document::{
    column::{AddColumn, ArchiveColumn},
    drag::{resolve_drop, DragResolution, DragSession},
    identity::SequentialIds,
    normalize::{check_invariants, normalize, parse_document},
    relationships::{can_assign_parent, find_ancestors, find_descendants},
    task::{AddTask, DeleteTask, MoveTaskBetweenColumns, SetParent, SetSubtasks, UpdateTask},
    template::{STANDARD_3, STANDARD_4},
    Apply, BoardDocument, DocumentError, EngineContext, TaskId,
};

fn ctx() -> EngineContext {
    EngineContext::default().with_ids(SequentialIds::new())
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn board_with_tasks(ctx: &EngineContext, per_column: &[&[&str]]) -> BoardDocument {
    let mut doc = BoardDocument::from_template(STANDARD_3, ctx);
    for (i, contents) in per_column.iter().enumerate() {
        let column = doc.column_order[i].clone();
        for content in contents.iter() {
            doc = AddTask::new(column.clone(), *content).apply(&doc, ctx).unwrap();
        }
    }
    doc
}

fn id_of(doc: &BoardDocument, content: &str) -> TaskId {
    doc.live_tasks()
        .find(|t| t.content == content)
        .map(|t| t.id.clone())
        .unwrap()
}

#[test]
fn test_archive_done_column() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["a"], &[], &["x", "y", "z"]]);
    let done = doc.column_order[2].clone();

    let next = ArchiveColumn::new(done.clone())
        .as_of(date("2025-01-15"))
        .apply(&doc, &ctx)
        .unwrap();

    assert!(next.columns[&done].tasks.is_empty());
    assert_eq!(next.live_task_count(), 1);
    assert_eq!(next.archive_history.len(), 1);

    let entry = &next.archive_history[0];
    assert_eq!(entry.date, date("2025-01-15"));
    let contents: Vec<_> = entry.tasks.iter().map(|t| t.task.content.as_str()).collect();
    assert_eq!(contents, vec!["x", "y", "z"]);
    for archived in &entry.tasks {
        assert_eq!(archived.column_title.as_deref(), Some("Done"));
        assert_eq!(archived.highlight_color.as_deref(), Some("#3247D8"));
        assert_eq!(archived.task.archived_at, Some(date("2025-01-15")));
    }
    assert!(check_invariants(&next).is_empty());
}

#[test]
fn test_archive_same_day_accumulates() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["a"], &["b"], &[]]);
    let day = date("2025-03-02");

    let doc = ArchiveColumn::new(doc.column_order[0].clone())
        .as_of(day)
        .apply(&doc, &ctx)
        .unwrap();
    let doc = ArchiveColumn::new(doc.column_order[1].clone())
        .as_of(day)
        .apply(&doc, &ctx)
        .unwrap();
    let doc = ArchiveColumn::new(doc.column_order[2].clone())
        .as_of(date("2025-03-05"))
        .apply(&doc, &ctx)
        .unwrap();

    // the empty column adds no entry for its day
    assert_eq!(doc.archive_history.len(), 1);
    assert_eq!(doc.archive_history[0].tasks.len(), 2);
    assert_eq!(doc.archived_task_count(), 2);
}

#[test]
fn test_templates_are_deterministic() {
    for name in [STANDARD_3, STANDARD_4] {
        let first = BoardDocument::from_template(name, &ctx());
        let second = BoardDocument::from_template(name, &ctx());
        assert_eq!(first, second);
    }

    let doc = BoardDocument::from_template(STANDARD_4, &EngineContext::default());
    let colors: Vec<_> = doc.ordered_columns().map(|c| c.highlight_color.as_str()).collect();
    assert_eq!(colors, vec!["#AF522B", "#23863D", "#3247D8", "#9C0029"]);
}

#[test]
fn test_drag_onto_empty_column() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["a", "b"], &[], &[]]);
    let a = id_of(&doc, "a");
    let doing = doc.column_order[1].clone();

    let resolution = resolve_drop(&doc, a.as_str(), doing.as_str());
    assert!(matches!(
        &resolution,
        DragResolution::MoveBetween(op) if op.dest_index == 0
    ));

    let mut drag = DragSession::new();
    drag.start(a.as_str());
    let next = drag.drop_on(Some(doing.as_str()), &doc, &ctx).unwrap();
    assert_eq!(next.columns[&doing].tasks[0].id, a);
    assert_eq!(next.live_task_count(), 2);
}

#[test]
fn test_cycle_rejected_in_chain() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["A", "B", "C"], &[], &[]]);
    let (a, b, c) = (id_of(&doc, "A"), id_of(&doc, "B"), id_of(&doc, "C"));

    // A -> B -> C: A's parent is B, B's parent is C
    let doc = SetParent::new(a.clone(), Some(b.clone())).apply(&doc, &ctx).unwrap();
    let doc = SetSubtasks::new(c.clone(), vec![b.clone()]).apply(&doc, &ctx).unwrap();

    assert_eq!(find_descendants(&c, doc.live_tasks()), HashSet::from([a.clone(), b.clone()]));
    assert_eq!(find_ancestors(&a, doc.live_tasks()), HashSet::from([b.clone(), c.clone()]));
    assert!(!can_assign_parent(&c, &a, doc.live_tasks()));
    assert!(can_assign_parent(&a, &c, doc.live_tasks()));

    let via_parent = SetParent::new(c.clone(), Some(a.clone())).apply(&doc, &ctx);
    assert!(matches!(via_parent, Err(DocumentError::InvalidRelationship { .. })));

    let via_subtasks = SetSubtasks::new(a.clone(), vec![c.clone()]).apply(&doc, &ctx);
    assert!(matches!(via_subtasks, Err(DocumentError::InvalidRelationship { .. })));

    assert_eq!(doc.find_task(&c).unwrap().subtasks, vec![b.clone()]);
    assert_eq!(doc.find_task(&b).unwrap().subtasks, vec![a]);
    assert!(check_invariants(&doc).is_empty());
}

#[test]
fn test_delete_severs_relationships() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["A", "B", "C"], &[], &[]]);
    let (a, b, c) = (id_of(&doc, "A"), id_of(&doc, "B"), id_of(&doc, "C"));
    let doc = SetSubtasks::new(b.clone(), vec![a.clone(), c.clone()])
        .apply(&doc, &ctx)
        .unwrap();

    let next = DeleteTask::new(b).apply(&doc, &ctx).unwrap();
    assert!(next.find_task(&a).unwrap().parent_id.is_none());
    assert!(next.find_task(&c).unwrap().parent_id.is_none());
    assert!(check_invariants(&next).is_empty());
}

#[test]
fn test_move_round_trip() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["a", "b", "c"], &["d"], &[]]);
    let b = id_of(&doc, "b");
    let (todo, doing) = (doc.column_order[0].clone(), doc.column_order[1].clone());

    let moved = MoveTaskBetweenColumns::new(b.clone(), todo.clone(), doing.clone(), 0)
        .apply(&doc, &ctx)
        .unwrap();
    assert_eq!(moved.columns[&doing].tasks[0].id, b);

    let back = MoveTaskBetweenColumns::new(b, doing, todo, 1)
        .apply(&moved, &ctx)
        .unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_failed_ops_leave_document_unchanged() {
    let ctx = ctx();
    let doc = board_with_tasks(&ctx, &[&["a"], &[], &[]]);
    let snapshot = doc.clone();
    let a = id_of(&doc, "a");

    assert!(AddTask::new("nope", "x").apply(&doc, &ctx).is_err());
    assert!(UpdateTask::new("nope").with_content("x").apply(&doc, &ctx).is_err());
    assert!(SetParent::new(a.clone(), Some(a.clone())).apply(&doc, &ctx).is_err());
    assert!(
        MoveTaskBetweenColumns::new(a, doc.column_order[1].clone(), doc.column_order[2].clone(), 0)
            .apply(&doc, &ctx)
            .is_err()
    );
    assert!(AddColumn::new("Bad").with_color("red").apply(&doc, &ctx).is_err());

    assert_eq!(doc, snapshot);
}

#[test]
fn test_normalize_is_idempotent() {
    let raw = r##"{
        "columns": [
            {"id": "c1", "title": "To Do", "highlightColor": "#AF522B", "tasks": [
                {"id": "t1", "content": "one", "subtasks": ["t2", "ghost"]},
                {"id": "t2", "content": "two"},
                {"id": "t1", "content": "duplicate"}
            ]},
            {"id": "c2", "title": "Done", "tasks": [
                {"id": "t3", "content": "three", "parentId": "t3"}
            ]}
        ],
        "archiveHistory": [
            {"date": "2025-01-01", "tasks": []},
            {"date": "2025-02-01", "tasks": []}
        ]
    }"##;

    let (doc, report) = parse_document(raw, &SequentialIds::new()).unwrap();
    assert!(!report.is_clean());
    assert!(check_invariants(&doc).is_empty());
    assert_eq!(doc.live_task_count(), 3);

    let (again, second_report) = normalize(doc.clone());
    assert!(second_report.is_clean());
    assert_eq!(again, doc);
}
