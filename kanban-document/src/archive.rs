//! Date-bucketed archive history.
//!
//! One entry per calendar day, newest first. Entries only grow: tasks are
//! appended to their day, days are never merged or removed.

use crate::types::{ArchiveEntry, ArchivedTask};
use chrono::NaiveDate;

/// The current local calendar date, the default archive date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Return a new history with `task` recorded under `date`
pub fn add_entry(history: &[ArchiveEntry], task: ArchivedTask, date: NaiveDate) -> Vec<ArchiveEntry> {
    add_entries(history, vec![task], date)
}

/// Return a new history with all `tasks` recorded under `date`, in order
pub fn add_entries(
    history: &[ArchiveEntry],
    tasks: Vec<ArchivedTask>,
    date: NaiveDate,
) -> Vec<ArchiveEntry> {
    let mut next = history.to_vec();
    let stamped = tasks.into_iter().map(|mut archived| {
        archived.task.archived_at = Some(date);
        archived
    });

    match next.iter().position(|entry| entry.date == date) {
        Some(idx) => next[idx].tasks.extend(stamped),
        None => {
            next.push(ArchiveEntry::new(date, stamped.collect()));
            sort_newest_first(&mut next);
        }
    }
    next
}

/// Order entries by date, newest first (stable for equal dates)
pub fn sort_newest_first(history: &mut [ArchiveEntry]) {
    history.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Number of archived tasks across all days
pub fn total_archived(history: &[ArchiveEntry]) -> usize {
    history.iter().map(|entry| entry.tasks.len()).sum()
}

/// The entry for one day, if anything was archived then
pub fn entry_for(history: &[ArchiveEntry], date: NaiveDate) -> Option<&ArchiveEntry> {
    history.iter().find(|entry| entry.date == date)
}
