pub mod calendar;
pub mod config;
pub mod progress;
pub mod streak;
pub mod task;

use gardentodo_core::{Config, Database, DateKey, Event, TaskStore};
use tracing::debug;

/// Open the configured store on the default database.
pub fn open_store() -> Result<(TaskStore<Database>, Config), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let store = TaskStore::open(db, &config);
    debug!(key = %config.storage.key, days = store.store().len(), "opened store");
    Ok((store, config))
}

/// The day a command applies to: `--date` if given, otherwise today.
pub fn day_or_today(date: Option<DateKey>) -> DateKey {
    date.unwrap_or_else(DateKey::today)
}

/// Print anything the core asked the user to see.
pub fn present_events(events: &[Event]) {
    for event in events {
        if let Event::DayCompleted { day, .. } = event {
            println!("🎉 Every task done for {day}! Your tree is bearing fruit.");
        }
    }
}
