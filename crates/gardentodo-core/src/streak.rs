//! Consecutive-day streaks.
//!
//! A day qualifies when its bucket holds at least one completed task. The
//! current streak walks backward from today; today itself never breaks the
//! streak, it only adds to it once something is done.
//!
//! The walk is bounded twice: it stops once it passes the earliest stored day,
//! and it never visits more than `max_lookback_days` days.

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::storage::{Store, StreakConfig};
use crate::task::Task;

/// Default bound on the backward walk (about ten years).
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 3650;

/// Current and best streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    /// Whether today already counts toward `current`.
    pub today_counted: bool,
}

fn qualifies(tasks: &[Task]) -> bool {
    tasks.iter().any(|t| t.completed)
}

/// Streak calculator with a fixed lookback bound.
#[derive(Debug, Clone)]
pub struct StreakCalculator {
    max_lookback_days: u32,
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreakCalculator {
    pub fn new() -> Self {
        Self {
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
        }
    }

    pub fn with_config(config: &StreakConfig) -> Self {
        Self::with_max_lookback(config.max_lookback_days)
    }

    pub fn with_max_lookback(max_lookback_days: u32) -> Self {
        Self { max_lookback_days }
    }

    pub fn max_lookback_days(&self) -> u32 {
        self.max_lookback_days
    }

    /// Consecutive qualifying days ending at today, or at yesterday when
    /// today has nothing completed yet.
    pub fn current(&self, store: &Store, today: DateKey) -> u32 {
        let Some(earliest) = store.earliest_day() else {
            return 0;
        };

        let mut streak = 0;
        let mut cursor = Some(today);
        for _ in 0..self.max_lookback_days {
            let Some(day) = cursor else { break };
            if day < earliest {
                break;
            }
            if qualifies(store.tasks_for(&day)) {
                streak += 1;
            } else if day != today {
                break;
            }
            cursor = day.pred();
        }
        streak
    }

    /// Longest run of consecutive qualifying days anywhere in the store.
    pub fn longest(&self, store: &Store) -> u32 {
        let mut best = 0;
        let mut run = 0;
        let mut previous: Option<DateKey> = None;
        for (day, tasks) in store.days() {
            if !qualifies(tasks) {
                run = 0;
                previous = None;
                continue;
            }
            run = match previous {
                Some(prev) if prev.succ() == Some(*day) => run + 1,
                _ => 1,
            };
            best = best.max(run);
            previous = Some(*day);
        }
        best
    }

    pub fn summarize(&self, store: &Store, today: DateKey) -> StreakSummary {
        let current = self.current(store, today);
        StreakSummary {
            current,
            longest: self.longest(store).max(current),
            today_counted: qualifies(store.tasks_for(&today)),
        }
    }
}

/// Current streak with the default lookback bound.
pub fn compute_streak(store: &Store, today: DateKey) -> u32 {
    StreakCalculator::new().current(store, today)
}
