//! Day progress and plant growth stages.
//!
//! Progress is a pure function of a day's tasks. The growth stage is a pure
//! function of progress and a fixed [`StageTable`].
//!
//! ## Stage tables
//!
//! ```text
//! Quartile (default)        Halves
//!   empty    -> Empty         empty   -> Empty
//!   0%       -> Seed          0%      -> Seed
//!   1-25%    -> Sapling       1-49%   -> Sapling
//!   26-50%   -> SmallTree     50-99%  -> SmallTree
//!   51-75%   -> Flowering     100%    -> Fruiting
//!   76-100%  -> Fruiting
//! ```

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::events::{Event, CELEBRATION_DURATION_MS};
use crate::task::Task;

/// Completion state of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 0-100, rounded half up.
    pub percentage: u8,
    /// True when the day has no tasks at all.
    pub is_empty: bool,
}

impl Progress {
    pub const EMPTY: Progress = Progress {
        percentage: 0,
        is_empty: true,
    };

    pub fn is_complete(&self) -> bool {
        !self.is_empty && self.percentage == 100
    }
}

/// Compute completion percentage for a day's tasks.
pub fn compute_progress(tasks: &[Task]) -> Progress {
    let total = tasks.len() as u64;
    if total == 0 {
        return Progress::EMPTY;
    }
    let completed = tasks.iter().filter(|t| t.completed).count() as u64;
    // round(100 * c / t), half up, in integers
    let percentage = (200 * completed + total) / (2 * total);
    Progress {
        percentage: percentage as u8,
        is_empty: false,
    }
}

/// Threshold table used to map a percentage to a [`GrowthStage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageTable {
    /// Five growth stages at 0 / 25 / 50 / 75 / 100.
    #[default]
    Quartile,
    /// Four growth stages at 0 / 50 / 100.
    Halves,
}

/// Plant growth stage, ordered from nothing to fully grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Empty,
    Seed,
    Sapling,
    SmallTree,
    Flowering,
    Fruiting,
}

impl GrowthStage {
    pub fn classify(progress: Progress, table: StageTable) -> Self {
        if progress.is_empty {
            return GrowthStage::Empty;
        }
        match (table, progress.percentage) {
            (_, 0) => GrowthStage::Seed,
            (StageTable::Quartile, 1..=25) => GrowthStage::Sapling,
            (StageTable::Quartile, 26..=50) => GrowthStage::SmallTree,
            (StageTable::Quartile, 51..=75) => GrowthStage::Flowering,
            (StageTable::Quartile, _) => GrowthStage::Fruiting,
            (StageTable::Halves, 1..=49) => GrowthStage::Sapling,
            (StageTable::Halves, 50..=99) => GrowthStage::SmallTree,
            (StageTable::Halves, _) => GrowthStage::Fruiting,
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            GrowthStage::Empty => "Nothing planted",
            GrowthStage::Seed => "Seed",
            GrowthStage::Sapling => "Sapling",
            GrowthStage::SmallTree => "Small tree",
            GrowthStage::Flowering => "Flowering",
            GrowthStage::Fruiting => "Fruiting",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            GrowthStage::Empty => "🟫",
            GrowthStage::Seed => "🌰",
            GrowthStage::Sapling => "🌱",
            GrowthStage::SmallTree => "🌿",
            GrowthStage::Flowering => "🌸",
            GrowthStage::Fruiting => "🍎",
        }
    }
}

/// Detects transitions into a completed day.
///
/// The first observation of a day only records a baseline, so a day that is
/// already complete when loaded does not celebrate again.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    last_seen: HashMap<DateKey, Progress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `progress` for `day`; returns [`Event::DayCompleted`] when the
    /// day has just become complete.
    pub fn observe(&mut self, day: DateKey, progress: Progress) -> Option<Event> {
        let previous = self.last_seen.insert(day, progress)?;
        if progress.is_complete() && !previous.is_complete() {
            Some(Event::DayCompleted {
                day,
                duration_ms: CELEBRATION_DURATION_MS,
                at: Utc::now(),
            })
        } else {
            None
        }
    }

    /// Last progress recorded for `day`.
    pub fn last(&self, day: &DateKey) -> Option<Progress> {
        self.last_seen.get(day).copied()
    }
}
