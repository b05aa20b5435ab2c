//! Structured events emitted by the cascade orchestrator.
//!
//! Consumers subscribe to build activity feeds or audit logs. Events
//! describe workflow progress; cache state itself is observed through the
//! stores' watch channels.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::cache::{Domain, ErrorCode};

const DEFAULT_CAPACITY: usize = 256;

/// A structured event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number. Consumers can detect gaps.
    pub seq: u64,
    /// When this event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    WorkflowStarted {
        workflow: String,
    },
    WorkflowFinished {
        workflow: String,
        duration_ms: u64,
        failed_steps: usize,
    },
    WorkflowAborted {
        workflow: String,
        step: String,
        code: ErrorCode,
    },
    StepFailed {
        workflow: String,
        step: String,
        domain: Domain,
    },
    LevelUp {
        from: Option<i32>,
        to: i32,
    },
    CharacterProvisioned {
        level: i32,
    },
}

/// Broadcast fan-out of [`Event`]s.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    seq: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, kind: EventKind) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self.tx.send(Event {
            seq,
            timestamp: Utc::now(),
            kind,
        });
        seq
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
