//! Month calendar aggregation.
//!
//! Produces the data behind a Sunday-first month grid: the number of blank
//! cells before the 1st, then one [`DaySummary`] per day of the month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::{Result, ValidationError};
use crate::storage::Store;

/// Completion status of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No bucket, or an empty one.
    NoData,
    /// At least one task, not all completed.
    HasIncomplete,
    /// At least one task, all completed.
    AllDone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Day of month, 1-based.
    pub day: u32,
    pub key: DateKey,
    pub status: DayStatus,
    pub is_today: bool,
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// Weekday index of the 1st, Sunday = 0.
    pub leading_blanks: u32,
    pub days: Vec<DaySummary>,
}

impl MonthView {
    /// Grid cells in order: `None` for each leading blank, then every day.
    pub fn cells(&self) -> impl Iterator<Item = Option<&DaySummary>> {
        std::iter::repeat(None)
            .take(self.leading_blanks as usize)
            .chain(self.days.iter().map(Some))
    }

    pub fn first_day(&self) -> Option<DateKey> {
        self.days.first().map(|d| d.key)
    }

    /// Year and month before this one.
    pub fn previous(&self) -> (i32, u32) {
        if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        }
    }

    /// Year and month after this one.
    pub fn next(&self) -> (i32, u32) {
        if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        }
    }

    pub fn count(&self, status: DayStatus) -> usize {
        self.days.iter().filter(|d| d.status == status).count()
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth { month }.into());
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ValidationError::InvalidYearMonth { year, month }.into())
}

/// Summarize every day of `year`-`month` (1-indexed) against `store`.
///
/// # Errors
/// Returns a validation error when the month is outside 1-12 or the year is
/// outside chrono's calendar range.
pub fn summarize_month(store: &Store, year: i32, month: u32, today: DateKey) -> Result<MonthView> {
    let first = first_of_month(year, month)?;
    let leading_blanks = first.weekday().num_days_from_sunday();

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let key = DateKey::from_date(date);
            let tasks = store.tasks_for(&key);
            let total = tasks.len();
            let completed = tasks.iter().filter(|t| t.completed).count();
            let status = match (total, completed) {
                (0, _) => DayStatus::NoData,
                (t, c) if t == c => DayStatus::AllDone,
                _ => DayStatus::HasIncomplete,
            };
            DaySummary {
                day: date.day(),
                key,
                status,
                is_today: key == today,
                total,
                completed,
            }
        })
        .collect();

    Ok(MonthView {
        year,
        month,
        leading_blanks,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskId};
    use crate::CoreError;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn bucket(done: usize, total: usize) -> Vec<Task> {
        (0..total)
            .map(|i| Task {
                id: TaskId(i as i64),
                text: format!("t{i}"),
                completed: i < done,
            })
            .collect()
    }

    #[test]
    fn classifies_day_status() {
        let store: Store = [
            (day("2024-02-01"), bucket(3, 3)),
            (day("2024-02-02"), bucket(2, 3)),
            (day("2024-02-03"), bucket(0, 0)),
            (day("2024-02-04"), bucket(0, 2)),
        ]
        .into_iter()
        .collect();
        let view = summarize_month(&store, 2024, 2, day("2024-02-10")).unwrap();
        assert_eq!(view.days[0].status, DayStatus::AllDone);
        assert_eq!(view.days[1].status, DayStatus::HasIncomplete);
        assert_eq!(view.days[2].status, DayStatus::NoData);
        assert_eq!(view.days[3].status, DayStatus::HasIncomplete);
        assert_eq!(view.days[4].status, DayStatus::NoData);
        assert_eq!((view.days[1].completed, view.days[1].total), (2, 3));
    }

    #[test]
    fn month_lengths_and_leap_years() {
        let store = Store::new();
        let today = day("2000-01-01");
        assert_eq!(summarize_month(&store, 2024, 2, today).unwrap().days.len(), 29);
        assert_eq!(summarize_month(&store, 2023, 2, today).unwrap().days.len(), 28);
        assert_eq!(summarize_month(&store, 1900, 2, today).unwrap().days.len(), 28);
        assert_eq!(summarize_month(&store, 2000, 2, today).unwrap().days.len(), 29);
        assert_eq!(summarize_month(&store, 2024, 4, today).unwrap().days.len(), 30);
        assert_eq!(summarize_month(&store, 2024, 12, today).unwrap().days.len(), 31);
    }

    #[test]
    fn leading_blanks_follow_weekday_of_the_first() {
        let store = Store::new();
        let today = day("2000-01-01");
        // 2024-09-01 was a Sunday, 2024-02-01 a Thursday, 2024-06-01 a Saturday.
        assert_eq!(summarize_month(&store, 2024, 9, today).unwrap().leading_blanks, 0);
        assert_eq!(summarize_month(&store, 2024, 2, today).unwrap().leading_blanks, 4);
        assert_eq!(summarize_month(&store, 2024, 6, today).unwrap().leading_blanks, 6);
    }

    #[test]
    fn cells_prefix_blanks() {
        let view = summarize_month(&Store::new(), 2024, 2, day("2024-02-29")).unwrap();
        let cells: Vec<_> = view.cells().collect();
        assert_eq!(cells.len(), 4 + 29);
        assert!(cells[..4].iter().all(Option::is_none));
        assert_eq!(cells[4].unwrap().day, 1);
        assert!(cells.last().unwrap().unwrap().is_today);
    }

    #[test]
    fn only_today_is_flagged() {
        let view = summarize_month(&Store::new(), 2024, 3, day("2024-03-15")).unwrap();
        let flagged: Vec<_> = view.days.iter().filter(|d| d.is_today).map(|d| d.day).collect();
        assert_eq!(flagged, [15]);

        let other = summarize_month(&Store::new(), 2024, 4, day("2024-03-15")).unwrap();
        assert!(other.days.iter().all(|d| !d.is_today));
    }

    #[test]
    fn invalid_month_is_rejected() {
        for month in [0, 13] {
            let err = summarize_month(&Store::new(), 2024, month, day("2024-01-01")).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::InvalidMonth { .. })
            ));
        }
    }

    #[test]
    fn navigation_wraps_years() {
        let dec = summarize_month(&Store::new(), 2023, 12, day("2024-01-01")).unwrap();
        assert_eq!(dec.next(), (2024, 1));
        let jan = summarize_month(&Store::new(), 2024, 1, day("2024-01-01")).unwrap();
        assert_eq!(jan.previous(), (2023, 12));
        assert_eq!(jan.first_day(), Some(day("2024-01-01")));
    }
}
