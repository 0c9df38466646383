//! Tasks and their identifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Task identifier: the creation time in epoch milliseconds.
///
/// Unique within a day bucket, not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// A single daily task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Create an incomplete task with an id that does not collide with `bucket`.
    pub fn new(text: impl Into<String>, bucket: &[Task]) -> Self {
        Self {
            id: next_id(bucket),
            text: text.into(),
            completed: false,
        }
    }
}

/// Base of the most recent id handed out by this process.
static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Reserve the next process-wide starting point: the current epoch
/// milliseconds, bumped past the previous base.
fn reserve_base(now: i64) -> i64 {
    let mut prev = LAST_ISSUED.load(Ordering::Relaxed);
    loop {
        let base = prev.checked_add(1).map_or(now, |next| next.max(now));
        match LAST_ISSUED.compare_exchange_weak(prev, base, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return base,
            Err(actual) => prev = actual,
        }
    }
}

/// Issue a timestamp id that is unique within `bucket`.
///
/// Starts from a fresh process-wide base and walks upward past ids already in
/// the bucket; if that runs off the end of the `i64` range it walks downward
/// instead. Ids found in the bucket never move the process-wide base.
pub fn next_id(bucket: &[Task]) -> TaskId {
    let base = reserve_base(Utc::now().timestamp_millis());
    let taken = |id: i64| bucket.iter().any(|t| t.id.0 == id);

    let upward = std::iter::successors(Some(base), |id| id.checked_add(1));
    let downward = std::iter::successors(base.checked_sub(1), |id| id.checked_sub(1));
    // A finite bucket always leaves a gap on one side of `base`.
    upward
        .chain(downward)
        .find(|id| !taken(*id))
        .map_or(TaskId(base), TaskId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_never_repeat_in_a_tight_loop() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(next_id(&[])));
        }
    }

    fn task(id: i64) -> Task {
        Task {
            id: TaskId(id),
            text: format!("t{id}"),
            completed: false,
        }
    }

    #[test]
    fn id_skips_ids_already_in_bucket() {
        let now = Utc::now().timestamp_millis();
        let crowded: Vec<Task> = (now - 10..now + 2_000).map(task).collect();
        let id = next_id(&crowded);
        assert!(!crowded.iter().any(|t| t.id == id));
    }

    #[test]
    fn id_at_top_of_range_does_not_pin_later_ids() {
        let top = [task(i64::MAX)];
        let patched = next_id(&top);
        assert_ne!(patched, TaskId(i64::MAX));

        let a = next_id(&[]);
        let b = next_id(std::slice::from_ref(&task(a.0)));
        assert_ne!(a, b);
        assert!(a.0 < i64::MAX && b.0 < i64::MAX);
    }

    #[test]
    fn id_avoids_a_full_tail_of_the_range() {
        let tail: Vec<Task> = (0..5).map(|i| task(i64::MAX - i)).collect();
        let id = next_id(&tail);
        assert!(!tail.iter().any(|t| t.id == id));
    }

    #[test]
    fn new_task_starts_incomplete() {
        let task = Task::new("water plants", &[]);
        assert!(!task.completed);
        assert_eq!(task.text, "water plants");
    }

    #[test]
    fn task_serializes_as_flat_record() {
        let task = Task {
            id: TaskId(1_700_000_000_000),
            text: "read".into(),
            completed: true,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1_700_000_000_000_i64, "text": "read", "completed": true})
        );
    }

    #[test]
    fn task_id_parses_from_cli_text() {
        assert_eq!(" 42 ".parse::<TaskId>().unwrap(), TaskId(42));
        assert!("abc".parse::<TaskId>().is_err());
    }
}
