//! Sample timestamps for historical series.

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;

use super::instrument::Instrument;
use super::purchase::Purchase;

const MS_PER_DAY: i64 = 86_400_000;

/// Inclusive `[from, to]` bounds in epoch milliseconds. `None` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TimeRange {
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a range from calendar dates (UTC). `to` covers the whole day,
    /// up to its last millisecond.
    pub fn from_dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        TimeRange {
            from: from.map(start_of_day_millis),
            to: to.map(end_of_day_millis),
        }
    }

    pub fn contains(&self, t: i64) -> bool {
        self.from.is_none_or(|from| t >= from) && self.to.is_none_or(|to| t <= to)
    }
}

/// Midnight UTC of `date` in epoch milliseconds.
pub fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Last millisecond of `date` (UTC): next midnight minus one millisecond.
pub fn end_of_day_millis(date: NaiveDate) -> i64 {
    start_of_day_millis(date) + MS_PER_DAY - 1
}

/// Every price and purchase timestamp, deduplicated and ascending.
pub fn sample_timestamps(instruments: &[Instrument], purchases: &[Purchase]) -> Vec<i64> {
    sample_timestamps_in(instruments, purchases, TimeRange::all())
}

pub fn sample_timestamps_in(
    instruments: &[Instrument],
    purchases: &[Purchase],
    range: TimeRange,
) -> Vec<i64> {
    let unique: BTreeSet<i64> = instruments
        .iter()
        .flat_map(|inst| inst.prices.timestamps())
        .chain(purchases.iter().map(|p| p.timestamp))
        .filter(|&t| range.contains(t))
        .collect();
    unique.into_iter().collect()
}
