//! Parent/subtask graph queries.
//!
//! The graph lives in the tasks themselves: `parent_id` is the edge, the
//! parent's `subtasks` list is its mirror. Queries here only follow
//! `parent_id`, carry a visited set and never fail, so they terminate on
//! corrupted (cyclic) input as well.

use crate::types::{BoardDocument, Task, TaskId};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// Every task reachable downward from `task_id` (children, grandchildren, ...).
///
/// `task_id` itself is never part of the result.
pub fn find_descendants<'a, I>(task_id: &TaskId, tasks: I) -> HashSet<TaskId>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut children: HashMap<&TaskId, Vec<&TaskId>> = HashMap::new();
    for task in tasks {
        if let Some(parent) = &task.parent_id {
            children.entry(parent).or_default().push(&task.id);
        }
    }

    let mut found = HashSet::new();
    let mut queue = VecDeque::from([task_id]);
    while let Some(current) = queue.pop_front() {
        for &child in children.get(current).into_iter().flatten() {
            if child != task_id && found.insert(child.clone()) {
                queue.push_back(child);
            }
        }
    }

    trace!(task = %task_id, count = found.len(), "Resolved descendants");
    found
}

/// Every task reachable upward from `task_id` through `parent_id`.
///
/// Parents that are not among `tasks` still appear in the result; the walk
/// stops there.
pub fn find_ancestors<'a, I>(task_id: &TaskId, tasks: I) -> HashSet<TaskId>
where
    I: IntoIterator<Item = &'a Task>,
{
    let parents = parent_map(tasks);
    let mut found = HashSet::new();
    let mut current = parents.get(task_id).copied();

    while let Some(parent) = current {
        if parent == task_id || !found.insert(parent.clone()) {
            break;
        }
        current = parents.get(parent).copied();
    }

    trace!(task = %task_id, count = found.len(), "Resolved ancestors");
    found
}

/// Check whether following `parent_id` from `task_id` leads back to it
pub fn in_cycle<'a, I>(task_id: &TaskId, tasks: I) -> bool
where
    I: IntoIterator<Item = &'a Task>,
{
    let parents = parent_map(tasks);
    let mut seen = HashSet::new();
    let mut current = parents.get(task_id).copied();

    while let Some(parent) = current {
        if parent == task_id {
            return true;
        }
        if !seen.insert(parent) {
            return false;
        }
        current = parents.get(parent).copied();
    }
    false
}

fn parent_map<'a, I>(tasks: I) -> HashMap<&'a TaskId, &'a TaskId>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter_map(|t| t.parent_id.as_ref().map(|p| (&t.id, p)))
        .collect()
}

/// Whether `parent` may become the parent of `child`
pub fn can_assign_parent<'a, I>(child: &TaskId, parent: &TaskId, tasks: I) -> bool
where
    I: IntoIterator<Item = &'a Task>,
{
    child != parent && !find_descendants(child, tasks).contains(parent)
}

/// Overlay an in-progress subtask selection for `task_id`.
///
/// Tasks in `pending` are shown as children of `task_id`; current children
/// missing from `pending` are shown as parentless. Everything else is
/// returned as is.
pub fn with_pending_subtasks<'a, I>(task_id: &TaskId, tasks: I, pending: &[TaskId]) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .map(|task| {
            let mut task = task.clone();
            if pending.contains(&task.id) {
                task.parent_id = Some(task_id.clone());
            } else if task.parent_id.as_ref() == Some(task_id) {
                task.parent_id = None;
            }
            task
        })
        .collect()
}

/// Tasks that may be offered as new subtasks of `task_id` while editing.
///
/// Excludes the task itself, its parent, anything already pending, tasks
/// owned by another parent, and every ancestor or descendant in the
/// overlaid view.
pub fn subtask_candidates<'a, I>(task_id: &TaskId, tasks: I, pending: &[TaskId]) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let overlay = with_pending_subtasks(task_id, tasks, pending);
    let descendants = find_descendants(task_id, &overlay);
    let ancestors = find_ancestors(task_id, &overlay);
    let own_parent = overlay
        .iter()
        .find(|t| &t.id == task_id)
        .and_then(|t| t.parent_id.clone());

    overlay
        .iter()
        .filter(|t| &t.id != task_id)
        .filter(|t| !pending.contains(&t.id))
        .filter(|t| own_parent.as_ref() != Some(&t.id))
        .filter(|t| t.parent_id.is_none() || t.parent_id.as_ref() == Some(task_id))
        .filter(|t| !descendants.contains(&t.id) && !ancestors.contains(&t.id))
        .cloned()
        .collect()
}

/// Remove every live reference to `removed`: children lose their parent,
/// parents drop the ids from `subtasks`.
pub fn sever_references(doc: &mut BoardDocument, removed: &HashSet<TaskId>) {
    if removed.is_empty() {
        return;
    }
    for task in doc.live_tasks_mut() {
        if task
            .parent_id
            .as_ref()
            .is_some_and(|parent| removed.contains(parent))
        {
            task.parent_id = None;
        }
        task.subtasks.retain(|id| !removed.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, parent: Option<&str>) -> Task {
        let task = Task::new(TaskId::from_string(id), "1", id);
        match parent {
            Some(p) => task.with_parent(p),
            None => task,
        }
    }

    fn id(s: &str) -> TaskId {
        TaskId::from_string(s)
    }

    /// C is the root: A -> B -> C
    fn chain() -> Vec<Task> {
        vec![task("A", Some("B")), task("B", Some("C")), task("C", None), task("D", None)]
    }

    #[test]
    fn test_descendants_of_root() {
        let tasks = chain();
        let found = find_descendants(&id("C"), &tasks);
        assert_eq!(found, HashSet::from([id("A"), id("B")]));
        assert!(find_descendants(&id("A"), &tasks).is_empty());
    }

    #[test]
    fn test_ancestors_of_leaf() {
        let tasks = chain();
        let found = find_ancestors(&id("A"), &tasks);
        assert_eq!(found, HashSet::from([id("B"), id("C")]));
        assert!(find_ancestors(&id("C"), &tasks).is_empty());
    }

    #[test]
    fn test_queries_terminate_on_cycle() {
        let tasks = vec![task("A", Some("B")), task("B", Some("C")), task("C", Some("A"))];
        assert_eq!(find_descendants(&id("A"), &tasks), HashSet::from([id("B"), id("C")]));
        assert_eq!(find_ancestors(&id("A"), &tasks), HashSet::from([id("B"), id("C")]));
        assert!(in_cycle(&id("A"), &tasks));
        assert!(!in_cycle(&id("A"), &chain()));
    }

    #[test]
    fn test_can_assign_parent() {
        let tasks = chain();
        // A cannot become a parent of its own ancestor C
        assert!(!can_assign_parent(&id("C"), &id("A"), &tasks));
        assert!(!can_assign_parent(&id("D"), &id("D"), &tasks));
        assert!(can_assign_parent(&id("D"), &id("A"), &tasks));
    }

    #[test]
    fn test_pending_overlay() {
        let tasks = vec![task("P", None), task("old", Some("P")), task("new", None)];
        let overlay = with_pending_subtasks(&id("P"), &tasks, &[id("new")]);
        let parent_of = |name: &str| {
            overlay
                .iter()
                .find(|t| t.id == name)
                .and_then(|t| t.parent_id.clone())
        };
        assert_eq!(parent_of("new"), Some(id("P")));
        assert_eq!(parent_of("old"), None);
        assert_eq!(parent_of("P"), None);
    }

    #[test]
    fn test_subtask_candidates() {
        let tasks = vec![
            task("root", None),
            task("P", Some("root")),
            task("kid", Some("P")),
            task("free", None),
            task("taken", Some("other")),
            task("other", None),
            task("pending", None),
        ];
        let candidates: Vec<String> = subtask_candidates(&id("P"), &tasks, &[id("pending")])
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();

        // kid was dropped from the pending selection, so it is offered again
        assert_eq!(candidates, vec!["kid", "free", "other"]);
    }

    #[test]
    fn test_sever_references() {
        let mut doc = BoardDocument::new();
        let mut column = crate::types::Column::new("c".into(), "C", "#000000");
        let mut parent = task("P", None);
        parent.subtasks = vec![id("X"), id("Y")];
        column.tasks = vec![parent, task("X", Some("P")), task("Y", Some("P"))];
        doc.columns.insert("c".into(), column);
        doc.column_order.push("c".into());

        sever_references(&mut doc, &HashSet::from([id("P"), id("Y")]));

        let column = &doc.columns["c"];
        assert_eq!(column.tasks[0].subtasks, vec![id("X")]);
        assert_eq!(column.tasks[1].parent_id, None);
    }
}
