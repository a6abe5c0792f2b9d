//! Trailing seven-day window and the record set resolved for it

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::weather::DayRecord;

/// Number of calendar days in the historical window
pub const WINDOW_DAYS: usize = 7;

/// `[today - 7, today - 1]`, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoricalWindow {
    /// The seven full days before `today`
    pub fn ending_before(today: NaiveDate) -> Self {
        Self {
            start: today - TimeDelta::days(WINDOW_DAYS as i64),
            end: today - TimeDelta::days(1),
        }
    }

    /// Every date of the window, oldest first
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|date| *date <= self.end)
    }
}

/// The single, date-unique record set of a session.
///
/// Records are kept oldest first; the descending view walks the same storage
/// backwards, so the two orderings can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRange {
    window: HistoricalWindow,
    records: Vec<DayRecord>,
}

impl HistoricalRange {
    /// Build the set for `window`. Returns `None` unless `records` covers
    /// every date of the window exactly once.
    pub fn new(window: HistoricalWindow, mut records: Vec<DayRecord>) -> Option<Self> {
        records.sort_by_key(|record| record.date);
        let covers_window = records.len() == WINDOW_DAYS
            && records
                .iter()
                .zip(window.dates())
                .all(|(record, date)| record.date == date);

        covers_window.then_some(Self { window, records })
    }

    /// Build the set by producing one record per window date
    pub fn generate(
        window: HistoricalWindow,
        mut produce: impl FnMut(NaiveDate) -> DayRecord,
    ) -> Self {
        let records = window
            .dates()
            .map(|date| DayRecord {
                date,
                ..produce(date)
            })
            .collect();
        Self { window, records }
    }

    pub fn window(&self) -> HistoricalWindow {
        self.window
    }

    /// Oldest to newest, for strip display
    pub fn ascending(&self) -> &[DayRecord] {
        &self.records
    }

    /// Newest to oldest, for list display
    pub fn descending(&self) -> impl DoubleEndedIterator<Item = &DayRecord> + ExactSizeIterator {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_fully_synthetic(&self) -> bool {
        self.records.iter().all(|record| record.is_synthetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate) -> DayRecord {
        DayRecord {
            date,
            max_temperature: 20.0,
            min_temperature: 10.0,
            avg_temperature: 15.0,
            description: "Sunny".to_string(),
            wind_speed: None,
            is_synthetic: false,
        }
    }

    #[test]
    fn test_window_bounds() {
        let window = HistoricalWindow::ending_before(date(2026, 10, 15));
        assert_eq!(window.start, date(2026, 10, 8));
        assert_eq!(window.end, date(2026, 10, 14));
        assert_eq!(window.dates().count(), WINDOW_DAYS);
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let window = HistoricalWindow::ending_before(date(2026, 1, 3));
        let dates: Vec<_> = window.dates().collect();
        assert_eq!(dates.first(), Some(&date(2025, 12, 27)));
        assert_eq!(dates.last(), Some(&date(2026, 1, 2)));
    }

    #[test]
    fn test_views_share_one_set() {
        let window = HistoricalWindow::ending_before(date(2026, 10, 15));
        // Deliberately shuffled input
        let mut records: Vec<_> = window.dates().map(record).collect();
        records.reverse();
        records.swap(1, 4);

        let range = HistoricalRange::new(window, records).unwrap();
        let ascending: Vec<_> = range.ascending().iter().map(|r| r.date).collect();
        let mut descending: Vec<_> = range.descending().map(|r| r.date).collect();
        assert_eq!(ascending.first(), Some(&window.start));
        assert_eq!(descending.first(), Some(&window.end));
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_generate_pins_dates() {
        let window = HistoricalWindow::ending_before(date(2026, 10, 15));
        let range = HistoricalRange::generate(window, |_| record(date(1999, 1, 1)));
        let dates: Vec<_> = range.ascending().iter().map(|r| r.date).collect();
        assert_eq!(dates, window.dates().collect::<Vec<_>>());
    }

    #[test]
    fn test_rejects_duplicates_and_gaps() {
        let window = HistoricalWindow::ending_before(date(2026, 10, 15));

        let mut duplicated: Vec<_> = window.dates().map(record).collect();
        duplicated[3] = record(duplicated[2].date);
        assert!(HistoricalRange::new(window, duplicated).is_none());

        let short: Vec<_> = window.dates().take(6).map(record).collect();
        assert!(HistoricalRange::new(window, short).is_none());

        let mut shifted: Vec<_> = window.dates().map(record).collect();
        shifted[6] = record(date(2026, 10, 15));
        assert!(HistoricalRange::new(window, shifted).is_none());
    }
}
