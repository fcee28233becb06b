//! Task list reconciliation and derived statistics.

pub mod model;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{TaskSyncError, TaskSyncResult};
use model::{Task, TaskPatch, TaskStats, TaskStatus};

/// Outcome of merging a patch into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The present fields were merged into the held task.
    Merged,
    /// No task with that id is held; the patch was dropped.
    Missing,
    /// The patch revision was not newer than the held one; the patch was dropped.
    Stale,
}

/// The client's authoritative copy of the task collection.
///
/// Creates prepend, so the newest task is first. Updates and deletes never
/// reorder entries.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a freshly fetched snapshot.
    pub fn load(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "task list loaded");
        self.tasks = tasks;
    }

    /// Prepend a newly created task.
    ///
    /// A duplicate id is a server contract breach and is reported as an
    /// error, never silently deduplicated.
    pub fn apply_create(&mut self, task: Task) -> TaskSyncResult<()> {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(TaskSyncError::DuplicateTask(task.id));
        }
        debug!(task_id = %task.id, "task added");
        self.tasks.insert(0, task);
        Ok(())
    }

    /// Merge the present fields of `patch` into the task with `id`.
    ///
    /// An unknown id is a benign no-op: a concurrent delete may have raced
    /// the update. A patch whose revision is not newer than the held task is
    /// dropped as stale.
    pub fn apply_update(&mut self, id: &str, patch: &TaskPatch) -> MergeOutcome {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(task_id = %id, "update for unknown task dropped");
            return MergeOutcome::Missing;
        };
        if let Some(revision) = patch.updated_at {
            if revision <= task.updated_at {
                debug!(task_id = %id, "stale update dropped");
                return MergeOutcome::Stale;
            }
        }
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(assigned_to) = &patch.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(updated_at) = patch.updated_at {
            task.updated_at = updated_at;
        }
        MergeOutcome::Merged
    }

    /// Remove the task with `id`. Returns whether anything was removed; an
    /// absent id is a no-op.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() < before;
        if removed {
            debug!(task_id = %id, "task removed");
        }
        removed
    }

    /// Recompute aggregate counts. Always derived from the live collection,
    /// never cached.
    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        TaskStats {
            total: self.tasks.len(),
            completed: self.count_status(TaskStatus::Completed),
            in_progress: self.count_status(TaskStatus::InProgress),
            pending: self.count_status(TaskStatus::Pending),
            overdue: self.tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// The task with `id`, if held.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// All held tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn task(id: &str, status: TaskStatus, due_date: DateTime<Utc>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: "desc".to_string(),
            status,
            assigned_to: "u2".to_string(),
            created_by: "u1".to_string(),
            due_date,
            created_at: base_time(),
            updated_at: base_time(),
        }
    }

    #[test]
    fn test_create_prepends_newest_first() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();
        list.apply_create(task("b", TaskStatus::Pending, base_time())).unwrap();
        list.apply_create(task("c", TaskStatus::Pending, base_time())).unwrap();
        let ids: Vec<&str> = list.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn test_duplicate_create_is_an_error() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();
        let err = list.apply_create(task("a", TaskStatus::Pending, base_time()));
        assert!(matches!(err, Err(TaskSyncError::DuplicateTask(id)) if id == "a"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_update_merges_only_present_fields() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();

        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..TaskPatch::default()
        };
        assert_eq!(list.apply_update("a", &patch), MergeOutcome::Merged);

        let held = list.get("a").unwrap();
        assert_eq!(held.status, TaskStatus::InProgress);
        assert_eq!(held.title, "Task a");
        assert_eq!(held.description, "desc");
    }

    #[test]
    fn test_update_unknown_id_is_a_noop() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();
        let patch = TaskPatch::status(TaskStatus::Completed);
        assert_eq!(list.apply_update("ghost", &patch), MergeOutcome::Missing);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("a").unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_stale_revision_dropped() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();

        let mut stale = TaskPatch::status(TaskStatus::Completed);
        stale.updated_at = Some(base_time() - chrono::Duration::minutes(5));
        assert_eq!(list.apply_update("a", &stale), MergeOutcome::Stale);
        assert_eq!(list.get("a").unwrap().status, TaskStatus::Pending);

        let mut fresh = TaskPatch::status(TaskStatus::Completed);
        fresh.updated_at = Some(base_time() + chrono::Duration::minutes(5));
        assert_eq!(list.apply_update("a", &fresh), MergeOutcome::Merged);
        assert_eq!(list.get("a").unwrap().status, TaskStatus::Completed);
        assert_eq!(
            list.get("a").unwrap().updated_at,
            base_time() + chrono::Duration::minutes(5)
        );
    }

    #[test]
    fn test_full_task_merges_as_patch() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();

        let mut fresh = task("a", TaskStatus::InProgress, base_time());
        fresh.title = "Renamed".to_string();
        fresh.updated_at = base_time() + chrono::Duration::minutes(1);
        assert_eq!(
            list.apply_update("a", &TaskPatch::from(&fresh)),
            MergeOutcome::Merged
        );
        assert_eq!(list.get("a").unwrap().title, "Renamed");

        // Replaying the same response is stale, not a double-apply.
        assert_eq!(
            list.apply_update("a", &TaskPatch::from(&fresh)),
            MergeOutcome::Stale
        );
    }

    #[test]
    fn test_delete_absent_id_is_a_noop() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();
        assert!(!list.apply_delete("ghost"));
        assert_eq!(list.len(), 1);
        assert!(list.apply_delete("a"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_update_and_delete_keep_order() {
        let mut list = TaskList::new();
        for id in ["a", "b", "c", "d"] {
            list.apply_create(task(id, TaskStatus::Pending, base_time())).unwrap();
        }
        list.apply_update("c", &TaskPatch::status(TaskStatus::Completed));
        list.apply_delete("b");
        let ids: Vec<&str> = list.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["d", "c", "a"]);
    }

    #[test]
    fn test_one_entry_per_id_across_interleavings() {
        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, base_time())).unwrap();
        list.apply_create(task("b", TaskStatus::Pending, base_time())).unwrap();
        list.apply_update("a", &TaskPatch::status(TaskStatus::InProgress));
        list.apply_delete("b");
        list.apply_update("b", &TaskPatch::status(TaskStatus::Completed));
        list.apply_create(task("c", TaskStatus::Pending, base_time())).unwrap();
        list.apply_delete("ghost");

        let mut ids: Vec<&str> = list.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), list.len());
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_stats_buckets() {
        let now = base_time();
        let past = now - chrono::Duration::days(2);
        let future = now + chrono::Duration::days(2);

        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::Pending, future)).unwrap();
        list.apply_create(task("b", TaskStatus::InProgress, past)).unwrap();
        list.apply_create(task("c", TaskStatus::Completed, past)).unwrap();
        list.apply_create(task("d", TaskStatus::Pending, past)).unwrap();

        let stats = list.stats(now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        // Completed tasks never count as overdue, past-due or not.
        assert_eq!(stats.overdue, 2);
    }

    #[test]
    fn test_completing_a_task_moves_exactly_one_bucket() {
        let now = base_time();
        let past = now - chrono::Duration::days(1);

        let mut list = TaskList::new();
        list.apply_create(task("a", TaskStatus::InProgress, past)).unwrap();
        list.apply_create(task("b", TaskStatus::Pending, past)).unwrap();

        let before = list.stats(now);
        assert_eq!(before.in_progress, 1);
        assert_eq!(before.overdue, 2);

        list.apply_update("a", &TaskPatch::status(TaskStatus::Completed));
        let after = list.stats(now);
        assert_eq!(after.total, before.total);
        assert_eq!(after.in_progress, 0);
        assert_eq!(after.completed, before.completed + 1);
        assert_eq!(after.pending, before.pending);
        // The completed task also left the overdue bucket.
        assert_eq!(after.overdue, 1);
    }
}
