//! Level-up notification queue.
//!
//! A FIFO of transient notifications, each removed automatically after a
//! fixed TTL. Removal is by id, so a timer firing after a manual dismiss or
//! a [`NotificationQueue::clear`] is a no-op.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpNotification {
    pub id: Uuid,
    /// The level just reached.
    pub level: i32,
    pub timestamp: DateTime<Utc>,
}

/// Shared handle to the queue. Clones observe the same notifications.
#[derive(Clone)]
pub struct NotificationQueue {
    state: Arc<watch::Sender<Vec<LevelUpNotification>>>,
    ttl: Duration,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            state: Arc::new(tx),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Append a notification for `level` and schedule its removal.
    ///
    /// Must be called within a tokio runtime.
    pub fn add(&self, level: i32) -> Uuid {
        let notification = LevelUpNotification {
            id: Uuid::new_v4(),
            level,
            timestamp: Utc::now(),
        };
        let id = notification.id;
        self.state.send_modify(|list| list.push(notification));
        debug!(%id, level, "level-up notification queued");

        let queue = self.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            queue.remove(id);
        });
        id
    }

    /// Remove by id. Unknown ids are ignored.
    pub fn remove(&self, id: Uuid) {
        self.state.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            list.len() != before
        });
    }

    pub fn clear(&self) {
        self.state.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }

    /// Current notifications, oldest first.
    pub fn notifications(&self) -> Vec<LevelUpNotification> {
        self.state.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<LevelUpNotification>> {
        self.state.subscribe()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}
