//! # Garden Todo Core Library
//!
//! This library provides the core business logic for Garden Todo, a daily
//! habit tracker where a plant grows as the day's tasks get done. Presentation
//! layers (the `gardentodo` CLI today) are thin consumers of the values
//! computed here and never touch storage directly.
//!
//! ## Architecture
//!
//! - **Storage**: one JSON blob of per-day task buckets kept under a single key
//!   of a [`KeyValueStore`] (SQLite-backed [`Database`]), plus TOML-based
//!   configuration
//! - **Progress**: completion percentage and growth stage for a day
//! - **Streak**: bounded backward walk over consecutive days with completed work
//! - **Calendar**: per-day completion status for a visible month
//!
//! ## Key Components
//!
//! - [`TaskStore`]: owned store with add/update/toggle/remove operations
//! - [`compute_progress`] and [`GrowthStage`]: derived progress view
//! - [`compute_streak`]: current streak ending at or before today
//! - [`summarize_month`]: calendar month view
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod date_key;
pub mod error;
pub mod events;
pub mod progress;
pub mod storage;
pub mod streak;
pub mod task;

pub use calendar::{summarize_month, DayStatus, DaySummary, MonthView};
pub use date_key::DateKey;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use progress::{compute_progress, GrowthStage, Progress, ProgressTracker, StageTable};
pub use storage::{Config, Database, KeyValueStore, Store, TaskStore};
pub use streak::{compute_streak, StreakCalculator, StreakSummary};
pub use task::{Task, TaskId};
