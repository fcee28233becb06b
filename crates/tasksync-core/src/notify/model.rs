//! Notification and push event models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of server-side change a push event announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TaskAssigned,
    TaskUpdated,
    TaskCompleted,
    TaskOverdue,
}

impl EventKind {
    /// Title shown for notifications of this kind.
    pub fn title(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "New Task Assigned",
            Self::TaskUpdated => "Task Status Updated",
            Self::TaskCompleted => "Task Completed",
            Self::TaskOverdue => "Task Overdue",
        }
    }

    /// Message used when the event carries none.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "You have a new task",
            Self::TaskUpdated => "A task was updated",
            Self::TaskCompleted => "A task was completed",
            Self::TaskOverdue => "A task is overdue",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskUpdated => "task_updated",
            Self::TaskCompleted => "task_completed",
            Self::TaskOverdue => "task_overdue",
        }
    }
}

/// Payload carried by a push frame. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A typed push frame as sent by the notification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum PushEvent {
    TaskAssigned(EventPayload),
    TaskUpdated(EventPayload),
    TaskCompleted(EventPayload),
    TaskOverdue(EventPayload),
}

impl PushEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TaskAssigned(_) => EventKind::TaskAssigned,
            Self::TaskUpdated(_) => EventKind::TaskUpdated,
            Self::TaskCompleted(_) => EventKind::TaskCompleted,
            Self::TaskOverdue(_) => EventKind::TaskOverdue,
        }
    }

    pub fn payload(&self) -> &EventPayload {
        match self {
            Self::TaskAssigned(p)
            | Self::TaskUpdated(p)
            | Self::TaskCompleted(p)
            | Self::TaskOverdue(p) => p,
        }
    }
}

/// A client-side notification entry. Never persisted and never sent back to
/// the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}
