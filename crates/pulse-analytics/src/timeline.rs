use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use pulse_types::FeedbackRecord;
use serde::Serialize;

/// Window used by the analyst dashboard.
pub const TIMELINE_DAYS: u32 = 7;

/// Longest window `time_series` will build; larger requests are clamped.
pub const MAX_TIMELINE_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub label: String,
    pub count: usize,
}

/// Per-day review counts for the `window_days` calendar days ending on
/// `today` (inclusive), oldest first. Days are UTC calendar days. The window
/// is clamped to [`MAX_TIMELINE_DAYS`].
pub fn time_series<'a, I>(records: I, window_days: u32, today: NaiveDate) -> Vec<DayBucket>
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for record in records {
        *per_day.entry(record.created_on()).or_default() += 1;
    }

    (0..window_days.min(MAX_TIMELINE_DAYS))
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| DayBucket {
            date,
            label: date.format("%a").to_string(),
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, review};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_true_per_day_totals() {
        // 2024-06-07 is a Friday.
        let records = vec![
            review("a", "t1", 5, at(2024, 6, 7, 9)),
            review("b", "t1", 3, at(2024, 6, 7, 23)),
            review("c", "t2", 1, at(2024, 6, 5, 0)),
            review("d", "t2", 4, at(2024, 6, 1, 12)),
            review("old", "t2", 4, at(2024, 5, 20, 12)),
        ];
        let series = time_series(&records, 7, day(2024, 6, 7));

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, day(2024, 6, 1));
        assert_eq!(series[6].date, day(2024, 6, 7));
        assert_eq!(series[6].label, "Fri");
        let counts: Vec<usize> = series.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 1, 0, 2]);
    }

    #[test]
    fn is_deterministic() {
        let records = vec![review("a", "t1", 5, at(2024, 6, 7, 9))];
        let today = day(2024, 6, 7);
        assert_eq!(time_series(&records, 7, today), time_series(&records, 7, today));
    }

    #[test]
    fn oversized_window_is_clamped() {
        let records = vec![review("a", "t1", 5, at(2024, 6, 7, 9))];
        let series = time_series(&records, u32::MAX, day(2024, 6, 7));
        assert_eq!(series.len(), MAX_TIMELINE_DAYS as usize);
        assert_eq!(series.last().unwrap().count, 1);
    }

    #[test]
    fn zero_window_is_empty() {
        let records = vec![review("a", "t1", 5, at(2024, 6, 7, 9))];
        assert!(time_series(&records, 0, day(2024, 6, 7)).is_empty());
    }

    #[test]
    fn empty_records_give_zero_buckets() {
        let series = time_series(std::iter::empty(), 3, day(2024, 1, 1));
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|b| b.count == 0));
        assert_eq!(series[0].date, day(2023, 12, 30));
    }
}
