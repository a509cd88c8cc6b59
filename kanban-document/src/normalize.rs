//! Import boundary: coerce external JSON into a canonical [`BoardDocument`].
//!
//! Operations assume a well-formed document and never repair anything
//! themselves. Everything that comes from outside (files, stores, pasted
//! JSON) goes through [`parse_document`] or [`from_value`] once, and every
//! repair made on the way in is reported and logged.

use crate::archive::sort_newest_first;
use crate::color::auto_color;
use crate::error::{DocumentError, Result};
use crate::identity::IdGenerator;
use crate::relationships::in_cycle;
use crate::types::{
    parse_date_prefix, ArchiveEntry, ArchivedTask, BoardDocument, Column, ColumnId, Task, TaskId,
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// A single repair applied while normalizing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Repair {
    #[error("columns were stored as a list")]
    LegacyColumnList,
    #[error("generated id {id} for a column without one")]
    GeneratedColumnId { id: ColumnId },
    #[error("dropped column entry that is not an object ({key})")]
    DroppedColumn { key: String },
    #[error("column {key} carried id {found:?}")]
    ColumnIdMismatch { key: ColumnId, found: String },
    #[error("column {id} had no task list")]
    MissingTasks { id: ColumnId },
    #[error("column {id} had no highlight color, using {color}")]
    DefaultColor { id: ColumnId, color: String },
    #[error("dropped malformed task in column {column}")]
    DroppedTask { column: ColumnId },
    #[error("reset malformed {field} of task {id}")]
    ResetTaskField { id: TaskId, field: &'static str },
    #[error("column order was missing")]
    MissingColumnOrder,
    #[error("dropped unknown or repeated column {id} from column order")]
    DroppedColumnOrderEntry { id: ColumnId },
    #[error("appended column {id} missing from column order")]
    AppendedColumnOrderEntry { id: ColumnId },
    #[error("removed repeated task {id} from column {column}")]
    DuplicateTask { id: TaskId, column: ColumnId },
    #[error("cleared archive date on live task {id}")]
    ClearedArchivedAt { id: TaskId },
    #[error("cleared parent {parent} of task {id}")]
    ClearedParent { id: TaskId, parent: TaskId },
    #[error("broke parent cycle at task {id}")]
    BrokeCycle { id: TaskId },
    #[error("rebuilt subtask list of task {id}")]
    RebuiltSubtasks { id: TaskId },
    #[error("dropped malformed archive entry")]
    DroppedArchiveEntry,
    #[error("dropped malformed archived task from {date}")]
    DroppedArchivedTask { date: NaiveDate },
    #[error("merged repeated archive date {date}")]
    MergedArchiveDate { date: NaiveDate },
    #[error("sorted archive history newest first")]
    SortedArchive,
}

/// Repairs applied by one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub repairs: Vec<Repair>,
}

impl NormalizationReport {
    /// No repairs were needed
    pub fn is_clean(&self) -> bool {
        self.repairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.repairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repair> {
        self.repairs.iter()
    }

    fn record(&mut self, repair: Repair) {
        warn!(%repair, "Normalized board document");
        self.repairs.push(repair);
    }
}

impl fmt::Display for NormalizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "no repairs");
        }
        for repair in &self.repairs {
            writeln!(f, "- {repair}")?;
        }
        Ok(())
    }
}

/// Parse board JSON text
pub fn parse_document(json: &str, ids: &dyn IdGenerator) -> Result<(BoardDocument, NormalizationReport)> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| DocumentError::parse(e.to_string()))?;
    from_value(value, ids)
}

/// Coerce an already parsed JSON value
pub fn from_value(value: Value, ids: &dyn IdGenerator) -> Result<(BoardDocument, NormalizationReport)> {
    let Value::Object(mut root) = value else {
        return Err(DocumentError::parse("board document must be a JSON object"));
    };
    let mut report = NormalizationReport::default();

    let columns = read_columns(root.remove("columns"), ids, &mut report)?;
    let column_order = match root.remove("columnOrder") {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|v| v.as_str().map(ColumnId::from))
            .collect(),
        _ => {
            if !columns.is_empty() {
                report.record(Repair::MissingColumnOrder);
            }
            columns.keys().cloned().collect()
        }
    };
    let archive_history = read_archive(root.remove("archiveHistory"), &mut report);
    let gradient_colors = root
        .remove("gradientColors")
        .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
        .and_then(|v| <[String; 2]>::try_from(v).ok());
    let description = match root.remove("description") {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };

    let doc = BoardDocument {
        columns,
        column_order,
        archive_history,
        gradient_colors,
        description,
    };
    let doc = repair_into(doc, &mut report);
    Ok((doc, report))
}

/// Repair a typed document (ordering, duplicates, relationships, archive)
pub fn normalize(doc: BoardDocument) -> (BoardDocument, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let doc = repair_into(doc, &mut report);
    (doc, report)
}

fn read_columns(
    raw: Option<Value>,
    ids: &dyn IdGenerator,
    report: &mut NormalizationReport,
) -> Result<IndexMap<ColumnId, Column>> {
    let entries: Vec<(ColumnId, Value)> = match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map.into_iter().map(|(k, v)| (ColumnId::from(k), v)).collect(),
        Some(Value::Array(list)) => {
            report.record(Repair::LegacyColumnList);
            list.into_iter()
                .map(|v| {
                    let id = match v.get("id").and_then(Value::as_str) {
                        Some(id) => ColumnId::from(id),
                        None => {
                            let id = ids.column_id();
                            report.record(Repair::GeneratedColumnId { id: id.clone() });
                            id
                        }
                    };
                    (id, v)
                })
                .collect()
        }
        Some(_) => return Err(DocumentError::parse("columns must be an object or a list")),
    };

    let mut columns = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        let Value::Object(mut fields) = value else {
            report.record(Repair::DroppedColumn {
                key: key.to_string(),
            });
            continue;
        };
        let tasks = coerce_column_fields(&key, &mut fields, report);
        let mut column: Column = serde_json::from_value(Value::Object(fields))
            .map_err(|e| DocumentError::parse(format!("column {key}: {e}")))?;
        column.tasks = tasks
            .into_iter()
            .filter_map(|task| read_task(task, &key, report))
            .collect();
        // first occurrence of a key wins
        columns.entry(key).or_insert(column);
    }
    Ok(columns)
}

/// Repair column-level fields in place and hand back the raw task list
fn coerce_column_fields(
    key: &ColumnId,
    fields: &mut Map<String, Value>,
    report: &mut NormalizationReport,
) -> Vec<Value> {
    match fields.get("id") {
        Some(Value::String(found)) if found == key.as_str() => {}
        Some(found) => {
            report.record(Repair::ColumnIdMismatch {
                key: key.clone(),
                found: found
                    .as_str()
                    .map_or_else(|| found.to_string(), str::to_string),
            });
            fields.insert("id".into(), Value::String(key.to_string()));
        }
        None => {
            fields.insert("id".into(), Value::String(key.to_string()));
        }
    }

    let tasks = match fields.remove("tasks") {
        Some(Value::Array(tasks)) => tasks,
        _ => {
            report.record(Repair::MissingTasks { id: key.clone() });
            Vec::new()
        }
    };

    if !fields.get("highlightColor").is_some_and(Value::is_string) {
        let color = auto_color(key.as_str()).to_string();
        report.record(Repair::DefaultColor {
            id: key.clone(),
            color: color.clone(),
        });
        fields.insert("highlightColor".into(), Value::String(color));
    }
    if !fields.get("minimized").is_some_and(Value::is_boolean) {
        fields.remove("minimized");
    }
    if !fields.get("title").is_some_and(Value::is_string) {
        fields.remove("title");
    }
    tasks
}

/// Task fields as an object with a string id, or `None`
fn task_object(value: Value) -> Option<(TaskId, Map<String, Value>)> {
    let Value::Object(fields) = value else {
        return None;
    };
    let id = TaskId::from(fields.get("id")?.as_str()?);
    Some((id, fields))
}

fn read_task(value: Value, column: &ColumnId, report: &mut NormalizationReport) -> Option<Task> {
    let Some((id, mut fields)) = task_object(value) else {
        report.record(Repair::DroppedTask {
            column: column.clone(),
        });
        return None;
    };
    coerce_task_fields(&id, &mut fields, report);
    match serde_json::from_value(Value::Object(fields)) {
        Ok(task) => Some(task),
        Err(e) => {
            warn!(task = %id, error = %e, "Task still unreadable after coercion");
            report.record(Repair::DroppedTask {
                column: column.clone(),
            });
            None
        }
    }
}

/// Reset task fields of the wrong type one at a time, so one bad value costs
/// that value and not the task
fn coerce_task_fields(id: &TaskId, fields: &mut Map<String, Value>, report: &mut NormalizationReport) {
    let mut reset = |field: &'static str| {
        report.record(Repair::ResetTaskField {
            id: id.clone(),
            field,
        })
    };

    for field in ["content", "description", "displayId"] {
        match fields.get(field) {
            None | Some(Value::String(_)) => {}
            Some(Value::Number(n)) => {
                let text = n.to_string();
                fields.insert(field.into(), Value::String(text));
                reset(field);
            }
            Some(_) => {
                fields.remove(field);
                reset(field);
            }
        }
    }

    for field in ["dueDate", "archivedAt"] {
        let readable = match fields.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty() || parse_date_prefix(s.trim()).is_some(),
            Some(_) => false,
        };
        if !readable {
            fields.remove(field);
            reset(field);
        }
    }

    for field in ["parentId", "highlightColor", "columnTitle"] {
        if !matches!(fields.get(field), None | Some(Value::Null | Value::String(_))) {
            fields.remove(field);
            reset(field);
        }
    }

    match fields.get_mut("subtasks") {
        None => {}
        Some(Value::Array(ids)) => {
            let before = ids.len();
            ids.retain(Value::is_string);
            if ids.len() != before {
                reset("subtasks");
            }
        }
        Some(other) => {
            *other = Value::Array(Vec::new());
            reset("subtasks");
        }
    }

    if !matches!(fields.get("completed"), None | Some(Value::Bool(_))) {
        fields.remove("completed");
        reset("completed");
    }
}

fn read_archive(raw: Option<Value>, report: &mut NormalizationReport) -> Vec<ArchiveEntry> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| read_archive_entry(entry, report))
        .collect()
}

/// One day of archive history. Only a missing or unreadable date drops the
/// whole entry; bad tasks are dropped one by one.
fn read_archive_entry(entry: Value, report: &mut NormalizationReport) -> Option<ArchiveEntry> {
    let date = entry
        .get("date")
        .and_then(Value::as_str)
        .and_then(|s| parse_date_prefix(s.trim()));
    let (Value::Object(mut fields), Some(date)) = (entry, date) else {
        report.record(Repair::DroppedArchiveEntry);
        return None;
    };

    let raw_tasks = match fields.remove("tasks") {
        Some(Value::Array(tasks)) => tasks,
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            report.record(Repair::DroppedArchivedTask { date });
            Vec::new()
        }
    };
    let tasks = raw_tasks
        .into_iter()
        .filter_map(|task| read_archived_task(task, date, report))
        .collect();
    Some(ArchiveEntry::new(date, tasks))
}

fn read_archived_task(
    value: Value,
    date: NaiveDate,
    report: &mut NormalizationReport,
) -> Option<ArchivedTask> {
    let Some((id, mut fields)) = task_object(value) else {
        report.record(Repair::DroppedArchivedTask { date });
        return None;
    };
    coerce_task_fields(&id, &mut fields, report);
    match serde_json::from_value(Value::Object(fields)) {
        Ok(task) => Some(task),
        Err(e) => {
            warn!(task = %id, error = %e, "Archived task still unreadable after coercion");
            report.record(Repair::DroppedArchivedTask { date });
            None
        }
    }
}

fn repair_into(mut doc: BoardDocument, report: &mut NormalizationReport) -> BoardDocument {
    repair_column_keys(&mut doc, report);
    repair_column_order(&mut doc, report);
    repair_duplicate_tasks(&mut doc, report);
    repair_relationships(&mut doc, report);
    repair_archive(&mut doc, report);
    doc
}

fn repair_column_keys(doc: &mut BoardDocument, report: &mut NormalizationReport) {
    for (key, column) in doc.columns.iter_mut() {
        if &column.id != key {
            report.record(Repair::ColumnIdMismatch {
                key: key.clone(),
                found: column.id.to_string(),
            });
            column.id = key.clone();
        }
    }
}

fn repair_column_order(doc: &mut BoardDocument, report: &mut NormalizationReport) {
    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(doc.columns.len());
    for id in std::mem::take(&mut doc.column_order) {
        if doc.columns.contains_key(&id) && seen.insert(id.clone()) {
            order.push(id);
        } else {
            report.record(Repair::DroppedColumnOrderEntry { id });
        }
    }
    for id in doc.columns.keys() {
        if !seen.contains(id) {
            report.record(Repair::AppendedColumnOrderEntry { id: id.clone() });
            order.push(id.clone());
        }
    }
    doc.column_order = order;
}

fn repair_duplicate_tasks(doc: &mut BoardDocument, report: &mut NormalizationReport) {
    let mut seen = HashSet::new();
    for column_id in doc.column_order.clone() {
        let Some(column) = doc.columns.get_mut(&column_id) else {
            continue;
        };
        column.tasks.retain_mut(|task| {
            if !seen.insert(task.id.clone()) {
                report.record(Repair::DuplicateTask {
                    id: task.id.clone(),
                    column: column_id.clone(),
                });
                return false;
            }
            if task.archived_at.take().is_some() {
                report.record(Repair::ClearedArchivedAt { id: task.id.clone() });
            }
            true
        });
    }
}

/// `parent_id` is authoritative; `subtasks` lists are rebuilt from it
fn repair_relationships(doc: &mut BoardDocument, report: &mut NormalizationReport) {
    let live: HashSet<TaskId> = doc.live_tasks().map(|t| t.id.clone()).collect();

    for task in doc.live_tasks_mut() {
        let Some(parent) = task.parent_id.clone() else {
            continue;
        };
        if parent == task.id || !live.contains(&parent) {
            report.record(Repair::ClearedParent {
                id: task.id.clone(),
                parent,
            });
            task.parent_id = None;
        }
    }

    let in_display_order: Vec<TaskId> = doc.live_tasks().map(|t| t.id.clone()).collect();
    for id in &in_display_order {
        if in_cycle(id, doc.live_tasks()) {
            if let Some(task) = doc.find_task_mut(id) {
                task.parent_id = None;
            }
            report.record(Repair::BrokeCycle { id: id.clone() });
        }
    }

    let mut children: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    for task in doc.live_tasks() {
        if let Some(parent) = &task.parent_id {
            children.entry(parent.clone()).or_default().push(task.id.clone());
        }
    }

    for task in doc.live_tasks_mut() {
        let mine = children.remove(&task.id).unwrap_or_default();
        let mut rebuilt: Vec<TaskId> = Vec::with_capacity(mine.len());
        for id in task.subtasks.iter().chain(mine.iter()) {
            if mine.contains(id) && !rebuilt.contains(id) {
                rebuilt.push(id.clone());
            }
        }
        if rebuilt != task.subtasks {
            report.record(Repair::RebuiltSubtasks { id: task.id.clone() });
            task.subtasks = rebuilt;
        }
    }
}

fn repair_archive(doc: &mut BoardDocument, report: &mut NormalizationReport) {
    let mut merged: Vec<ArchiveEntry> = Vec::with_capacity(doc.archive_history.len());
    for entry in std::mem::take(&mut doc.archive_history) {
        match merged.iter().position(|e| e.date == entry.date) {
            Some(idx) => {
                report.record(Repair::MergedArchiveDate { date: entry.date });
                merged[idx].tasks.extend(entry.tasks);
            }
            None => merged.push(entry),
        }
    }
    if !merged.windows(2).all(|w| w[0].date >= w[1].date) {
        report.record(Repair::SortedArchive);
        sort_newest_first(&mut merged);
    }
    doc.archive_history = merged;
}

/// A broken invariant found by [`check_invariants`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("column order is not a permutation of the column keys")]
    ColumnOrderNotPermutation,
    #[error("column stored under {key} has id {id}")]
    ColumnKeyMismatch { key: ColumnId, id: ColumnId },
    #[error("task {id} appears more than once")]
    DuplicateTask { id: TaskId },
    #[error("link between parent {parent} and child {child} is one-sided")]
    AsymmetricLink { parent: TaskId, child: TaskId },
    #[error("task {parent} lists subtask {child} more than once")]
    DuplicateSubtask { parent: TaskId, child: TaskId },
    #[error("task {task} references missing task {reference}")]
    DanglingReference { task: TaskId, reference: TaskId },
    #[error("task {id} is its own ancestor")]
    Cycle { id: TaskId },
    #[error("archive history is not sorted newest first")]
    ArchiveUnsorted,
    #[error("archive date {date} appears more than once")]
    DuplicateArchiveDate { date: NaiveDate },
    #[error("live task {id} carries an archive date")]
    LiveTaskArchived { id: TaskId },
}

/// Report every broken invariant without repairing anything
pub fn check_invariants(doc: &BoardDocument) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let order: HashSet<&ColumnId> = doc.column_order.iter().collect();
    if order.len() != doc.column_order.len()
        || order.len() != doc.columns.len()
        || !doc.columns.keys().all(|k| order.contains(k))
    {
        violations.push(InvariantViolation::ColumnOrderNotPermutation);
    }

    for (key, column) in &doc.columns {
        if &column.id != key {
            violations.push(InvariantViolation::ColumnKeyMismatch {
                key: key.clone(),
                id: column.id.clone(),
            });
        }
    }

    let mut live: HashMap<&TaskId, &crate::types::Task> = HashMap::new();
    for task in doc.columns.values().flat_map(|c| c.tasks.iter()) {
        if live.insert(&task.id, task).is_some() {
            violations.push(InvariantViolation::DuplicateTask {
                id: task.id.clone(),
            });
        }
        if task.archived_at.is_some() {
            violations.push(InvariantViolation::LiveTaskArchived {
                id: task.id.clone(),
            });
        }
    }

    for task in doc.columns.values().flat_map(|c| c.tasks.iter()) {
        if let Some(parent_id) = &task.parent_id {
            match live.get(parent_id) {
                None => violations.push(InvariantViolation::DanglingReference {
                    task: task.id.clone(),
                    reference: parent_id.clone(),
                }),
                Some(parent) if !parent.has_subtask(&task.id) => {
                    violations.push(InvariantViolation::AsymmetricLink {
                        parent: parent_id.clone(),
                        child: task.id.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        let mut listed = HashSet::new();
        for child_id in &task.subtasks {
            if !listed.insert(child_id) {
                violations.push(InvariantViolation::DuplicateSubtask {
                    parent: task.id.clone(),
                    child: child_id.clone(),
                });
                continue;
            }
            match live.get(child_id) {
                None => violations.push(InvariantViolation::DanglingReference {
                    task: task.id.clone(),
                    reference: child_id.clone(),
                }),
                Some(child) if child.parent_id.as_ref() != Some(&task.id) => {
                    violations.push(InvariantViolation::AsymmetricLink {
                        parent: task.id.clone(),
                        child: child_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        if in_cycle(&task.id, live.values().copied()) {
            violations.push(InvariantViolation::Cycle {
                id: task.id.clone(),
            });
        }
    }

    let mut dates = HashSet::new();
    for entry in &doc.archive_history {
        if !dates.insert(entry.date) {
            violations.push(InvariantViolation::DuplicateArchiveDate { date: entry.date });
        }
    }
    if !doc
        .archive_history
        .windows(2)
        .all(|w| w[0].date >= w[1].date)
    {
        violations.push(InvariantViolation::ArchiveUnsorted);
    }

    violations
}
