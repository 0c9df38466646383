use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::task::{Task, TaskId};

/// How long a presenter should show the celebration before it expires.
pub const CELEBRATION_DURATION_MS: u64 = 4000;

/// Every state change in the store produces an Event.
/// Presenters drain them after each command; nothing in the core waits on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        day: DateKey,
        task: Task,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        day: DateKey,
        task: Task,
        at: DateTime<Utc>,
    },
    TaskToggled {
        day: DateKey,
        id: TaskId,
        completed: bool,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        day: DateKey,
        id: TaskId,
        at: DateTime<Utc>,
    },
    /// The day just reached 100%. Fire-and-forget celebration.
    DayCompleted {
        day: DateKey,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn day(&self) -> DateKey {
        match self {
            Event::TaskAdded { day, .. }
            | Event::TaskUpdated { day, .. }
            | Event::TaskToggled { day, .. }
            | Event::TaskRemoved { day, .. }
            | Event::DayCompleted { day, .. } => *day,
        }
    }

    pub fn is_celebration(&self) -> bool {
        matches!(self, Event::DayCompleted { .. })
    }
}
