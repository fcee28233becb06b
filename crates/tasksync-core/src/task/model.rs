//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TaskSyncError, TaskSyncResult};
use crate::session::model::Role;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Parse from user input. Accepts a few spellings; `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "pending" => Some(Self::Pending),
            "in progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Convert to the wire/display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// A task as held by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// User id of the assignee.
    pub assigned_to: String,
    /// User id of the manager who created the task.
    pub created_by: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is past due and not yet completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status != TaskStatus::Completed
    }

    /// Whether `role` may edit task fields. Guidance for the UI only; the
    /// server enforces the actual policy.
    pub fn can_edit(&self, role: Role) -> bool {
        role == Role::Manager
    }

    /// Whether `role` may delete the task.
    pub fn can_delete(&self, role: Role) -> bool {
        role == Role::Manager
    }

    /// Whether `role` may change the status. Employees lose the control once
    /// a task is completed; only a manager can reopen it.
    pub fn can_set_status(&self, role: Role) -> bool {
        match role {
            Role::Manager => true,
            Role::Employee => self.status != TaskStatus::Completed,
        }
    }
}

/// Payload for creating a task. The server assigns id, creator and timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
}

impl TaskDraft {
    /// Create a draft in the initial `Pending` status.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        assigned_to: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            assigned_to: assigned_to.into(),
            status: TaskStatus::Pending,
            due_date,
        }
    }

    /// Reject drafts with missing required fields before any network call.
    pub fn validate(&self) -> TaskSyncResult<()> {
        if self.title.trim().is_empty() {
            return Err(TaskSyncError::validation("task title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(TaskSyncError::validation("task description is required"));
        }
        if self.assigned_to.trim().is_empty() {
            return Err(TaskSyncError::validation("task assignee is required"));
        }
        Ok(())
    }
}

/// Partial task update. Only the present fields are sent and merged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Server revision. A patch carrying one older than the held task is
    /// dropped as stale on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// A patch carrying only a status change.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the patch changes any task field.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
    }
}

impl From<&Task> for TaskPatch {
    /// Full-task responses merge through the same path as partial patches.
    fn from(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            status: Some(task.status),
            assigned_to: Some(task.assigned_to.clone()),
            due_date: Some(task.due_date),
            updated_at: Some(task.updated_at),
        }
    }
}

/// Aggregate counts over a task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub overdue: usize,
}
