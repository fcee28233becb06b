//! Client-side notification state.

pub mod model;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use model::{NotificationRecord, PushEvent};

/// Default bound on retained notification records.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded, newest-first collection of notification records.
///
/// State is derived purely from push events plus local mark-read and dismiss
/// actions. Cleared on logout; nothing here is ever persisted.
#[derive(Debug)]
pub struct NotificationCenter {
    records: VecDeque<NotificationRecord>,
    capacity: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A center bounded to `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Ingest a push event, prepending one unread record.
    ///
    /// Redelivery of a server-supplied event id is dropped and yields
    /// nothing. Events without an id get a local one and are never
    /// deduplicated. Past capacity the oldest read record is evicted, or the
    /// oldest overall when everything is unread.
    pub fn on_event(&mut self, event: &PushEvent, now: DateTime<Utc>) -> Option<&NotificationRecord> {
        let kind = event.kind();
        let payload = event.payload();
        let id = match &payload.id {
            Some(id) => {
                if self.records.iter().any(|r| r.id == *id) {
                    debug!(id = %id, "duplicate push event dropped");
                    return None;
                }
                id.clone()
            }
            None => Uuid::new_v4().to_string(),
        };
        let message = payload
            .message
            .clone()
            .unwrap_or_else(|| kind.default_message().to_string());
        self.records.push_front(NotificationRecord {
            id,
            kind,
            title: kind.title().to_string(),
            message,
            timestamp: now,
            read: false,
        });
        if self.records.len() > self.capacity {
            self.evict();
        }
        self.records.front()
    }

    /// Evict one record, preferring the oldest read one.
    fn evict(&mut self) {
        if let Some(pos) = self.records.iter().rposition(|r| r.read) {
            self.records.remove(pos);
        } else {
            self.records.pop_back();
        }
    }

    /// Mark one record read. Read is one-way; marking again is a no-op.
    /// Returns whether the record exists.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.read = true;
                true
            }
            None => false,
        }
    }

    /// Remove one record. Returns whether anything was removed.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() < before
    }

    /// Count of unread records.
    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.read).count()
    }

    /// Records, newest first.
    pub fn records(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop everything. Called on logout.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Short human age of a timestamp: "Just now", "5m ago", "3h ago", "2d ago".
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}
