//! Per-day task buckets and the owned store that persists them.
//!
//! The whole [`Store`] is serialized as one JSON object under one key:
//!
//! ```text
//! { "2024-02-05": [ { "id": 1707120000000, "text": "Stretch", "completed": true } ] }
//! ```
//!
//! Every mutation rewrites the full blob. Reading is fail-soft: a missing,
//! corrupt or partially corrupt blob yields whatever could be salvaged, never
//! an error.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Config, KeyValueStore};
use crate::date_key::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::progress::{compute_progress, ProgressTracker};
use crate::task::{next_id, Task, TaskId};

/// Mapping from day to its ordered tasks.
///
/// A day that was never written is absent. A day whose tasks were all removed
/// keeps an empty bucket; both read as "no tasks".
///
/// Serializes as the storage blob. Reading goes through [`Store::parse`] only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Store {
    days: BTreeMap<DateKey, Vec<Task>>,
}

/// Task record as found in storage. Anything may be missing.
#[derive(Debug, Deserialize)]
struct StoredTask {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    completed: bool,
}

impl StoredTask {
    fn stored_id(&self) -> Option<TaskId> {
        let value = self.id.as_ref()?;
        if let Some(id) = value.as_i64() {
            return Some(TaskId(id));
        }
        // Older writers may have produced 1.7e12-style numbers.
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| TaskId(f as i64))
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the store kept under `key`; empty on any failure.
    pub fn load<B: KeyValueStore + ?Sized>(backend: &B, key: &str) -> Self {
        match backend.get(key) {
            Ok(Some(raw)) => Self::parse(&raw),
            Ok(None) => {
                debug!(key, "no stored tasks yet");
                Self::default()
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read stored tasks; starting empty");
                Self::default()
            }
        }
    }

    /// Parse a serialized blob, salvaging what it can.
    ///
    /// Legacy unpadded keys are normalized and merged with their canonical
    /// twin. Tasks without a usable id, or whose id repeats within the bucket,
    /// get a fresh one.
    pub fn parse(raw: &str) -> Self {
        let root: BTreeMap<String, serde_json::Value> = match serde_json::from_str(raw) {
            Ok(root) => root,
            Err(e) => {
                warn!(error = %e, "stored task blob is not a JSON object; starting empty");
                return Self::default();
            }
        };

        let mut store = Self::default();
        for (raw_key, value) in root {
            let day = match raw_key.parse::<DateKey>() {
                Ok(day) => day,
                Err(_) => {
                    warn!(key = %raw_key, "skipping bucket with unrecognized date key");
                    continue;
                }
            };
            let serde_json::Value::Array(items) = value else {
                warn!(%day, "skipping bucket that is not a list");
                continue;
            };

            let bucket = store.days.entry(day).or_default();
            for item in items {
                let stored: StoredTask = match serde_json::from_value(item) {
                    Ok(stored) => stored,
                    Err(e) => {
                        warn!(%day, error = %e, "skipping unreadable task record");
                        continue;
                    }
                };
                if stored.text.trim().is_empty() {
                    warn!(%day, "skipping task record with blank text");
                    continue;
                }
                let id = match stored.stored_id() {
                    Some(id) if !bucket.iter().any(|t| t.id == id) => id,
                    previous => {
                        let fresh = next_id(bucket);
                        debug!(%day, ?previous, %fresh, "patched task id");
                        fresh
                    }
                };
                bucket.push(Task {
                    id,
                    text: stored.text,
                    completed: stored.completed,
                });
            }
        }
        store
    }

    /// Serialize to the storage blob.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Tasks for `day` in insertion order; empty if the day is absent.
    pub fn tasks_for(&self, day: &DateKey) -> &[Task] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a bucket exists for `day`, even an empty one.
    pub fn contains_day(&self, day: &DateKey) -> bool {
        self.days.contains_key(day)
    }

    /// Days in chronological order with their tasks.
    pub fn days(&self) -> impl Iterator<Item = (&DateKey, &[Task])> {
        self.days.iter().map(|(day, tasks)| (day, tasks.as_slice()))
    }

    pub fn earliest_day(&self) -> Option<DateKey> {
        self.days.keys().next().copied()
    }

    pub fn latest_day(&self) -> Option<DateKey> {
        self.days.keys().next_back().copied()
    }

    /// Number of day buckets, including empty ones.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn bucket_mut(&mut self, day: &DateKey) -> Option<&mut Vec<Task>> {
        self.days.get_mut(day)
    }

    fn bucket_or_create(&mut self, day: DateKey) -> &mut Vec<Task> {
        self.days.entry(day).or_default()
    }
}

impl FromIterator<(DateKey, Vec<Task>)> for Store {
    fn from_iter<I: IntoIterator<Item = (DateKey, Vec<Task>)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Owned task store bound to one storage backend.
///
/// Loaded once on open; every successful mutation rewrites the whole blob.
/// Mutations queue [`Event`]s that presenters collect with
/// [`TaskStore::drain_events`].
pub struct TaskStore<B: KeyValueStore> {
    backend: B,
    key: String,
    store: Store,
    tracker: ProgressTracker,
    celebrate: bool,
    events: Vec<Event>,
}

impl<B: KeyValueStore> TaskStore<B> {
    /// Load the store using the key and celebration settings from `config`.
    pub fn open(backend: B, config: &Config) -> Self {
        let mut store = Self::with_key(backend, config.storage.key.clone());
        store.celebrate = config.progress.celebrate;
        store
    }

    /// Load the store kept under `key`.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let store = Store::load(&backend, &key);
        debug!(key = %key, days = store.len(), "loaded task store");
        Self {
            backend,
            key,
            store,
            tracker: ProgressTracker::new(),
            celebrate: true,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn get_tasks_for(&self, day: &DateKey) -> &[Task] {
        self.store.tasks_for(day)
    }

    /// Append a task to `day`. Blank text is rejected with `Ok(None)` and
    /// nothing is written.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn add_task(&mut self, day: DateKey, text: &str) -> Result<Option<Task>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("rejected blank task text");
            return Ok(None);
        }
        self.baseline(day);

        let bucket = self.store.bucket_or_create(day);
        let task = Task::new(text, bucket);
        bucket.push(task.clone());
        self.persist()?;

        debug!(id = %task.id, "added task");
        self.events.push(Event::TaskAdded {
            day,
            task: task.clone(),
            at: Utc::now(),
        });
        self.observe(day);
        Ok(Some(task))
    }

    /// Replace the task in `day` whose id matches `task.id`.
    ///
    /// Returns `Ok(false)` without writing when the day or id is unknown, or
    /// when the new text is blank.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn update_task(&mut self, day: DateKey, mut task: Task) -> Result<bool> {
        task.text = task.text.trim().to_string();
        if task.text.is_empty() {
            debug!("rejected blank task text");
            return Ok(false);
        }
        self.baseline(day);

        let Some(slot) = self
            .store
            .bucket_mut(&day)
            .and_then(|bucket| bucket.iter_mut().find(|t| t.id == task.id))
        else {
            return Ok(false);
        };
        *slot = task.clone();
        self.persist()?;

        debug!(id = %task.id, "updated task");
        self.events.push(Event::TaskUpdated {
            day,
            task,
            at: Utc::now(),
        });
        self.observe(day);
        Ok(true)
    }

    /// Flip the completion state of the task currently stored under `id`.
    pub fn toggle_task(&mut self, day: DateKey, id: TaskId) -> Result<Option<Task>> {
        let Some(current) = self.store.tasks_for(&day).iter().find(|t| t.id == id) else {
            return Ok(None);
        };
        let completed = !current.completed;
        self.set_completed(day, id, completed)
    }

    /// Set the completion state of the task stored under `id`.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn set_completed(
        &mut self,
        day: DateKey,
        id: TaskId,
        completed: bool,
    ) -> Result<Option<Task>> {
        self.baseline(day);

        let Some(slot) = self
            .store
            .bucket_mut(&day)
            .and_then(|bucket| bucket.iter_mut().find(|t| t.id == id))
        else {
            return Ok(None);
        };
        if slot.completed == completed {
            return Ok(Some(slot.clone()));
        }
        slot.completed = completed;
        let task = slot.clone();
        self.persist()?;

        debug!(%id, completed, "set completion");
        self.events.push(Event::TaskToggled {
            day,
            id,
            completed,
            at: Utc::now(),
        });
        self.observe(day);
        Ok(Some(task))
    }

    /// Remove `id` from `day`.
    ///
    /// Returns whether a task was removed. An absent day is a no-op with no
    /// write; removing an unknown id from an existing day rewrites the same
    /// blob.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn remove_task(&mut self, day: DateKey, id: TaskId) -> Result<bool> {
        self.baseline(day);

        let Some(bucket) = self.store.bucket_mut(&day) else {
            return Ok(false);
        };
        let before = bucket.len();
        bucket.retain(|t| t.id != id);
        let removed = bucket.len() != before;
        self.persist()?;

        if removed {
            debug!(%id, "removed task");
            self.events.push(Event::TaskRemoved {
                day,
                id,
                at: Utc::now(),
            });
        }
        self.observe(day);
        Ok(removed)
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn persist(&mut self) -> Result<()> {
        let blob = self.store.to_json()?;
        self.backend.set(&self.key, &blob)
    }

    fn baseline(&mut self, day: DateKey) {
        if self.tracker.last(&day).is_none() {
            let progress = compute_progress(self.store.tasks_for(&day));
            self.tracker.observe(day, progress);
        }
    }

    fn observe(&mut self, day: DateKey) {
        let progress = compute_progress(self.store.tasks_for(&day));
        if let Some(event) = self.tracker.observe(day, progress) {
            if self.celebrate {
                debug!(%day, "day completed");
                self.events.push(event);
            }
        }
    }
}
