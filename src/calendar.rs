//! Expansion of a scheduling horizon into an ordered list of days.

use chrono::{Datelike, NaiveDate};

use crate::error::ScheduleError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const LABEL_FORMAT: &str = "%-d %B %Y %A";
const MIN_YEAR: i64 = 1;
const MAX_YEAR: i64 = 9999;

/// Longest horizon accepted, roughly ten years.
pub const MAX_HORIZON_DAYS: usize = 3660;

/// A single day of the horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    /// Human readable label, e.g. `5 March 2024 Tuesday`. Unique within a horizon.
    pub label: String,
    /// 1-based position within the horizon.
    pub index: usize,
    pub date: NaiveDate,
}

impl Day {
    /// 0-based position within the horizon.
    pub fn offset(&self) -> usize {
        self.index - 1
    }
}

/// Which way the caller described the horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Horizon {
    Range { first_day: String, last_day: String },
    Month { year: i64, month: i64 },
}

impl Horizon {
    /// First and last date of the horizon, both inclusive.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate), ScheduleError> {
        match self {
            Horizon::Range { first_day, last_day } => {
                Ok((parse_date(first_day)?, parse_date(last_day)?))
            }
            Horizon::Month { year, month } => month_bounds(*year, *month),
        }
    }

    /// Number of days without materialising them.
    pub fn num_days(&self) -> Result<usize, ScheduleError> {
        let (first, last) = self.bounds()?;
        day_count(first, last)
    }

    pub fn expand(&self) -> Result<Vec<Day>, ScheduleError> {
        let (first, last) = self.bounds()?;
        expand_range(first, last)
    }
}

pub fn parse_date(text: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        ScheduleError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date ({})", text, e))
    })
}

pub fn day_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}

/// Days from `first` to `last`, both inclusive.
///
/// Rejects an inverted range and anything longer than [`MAX_HORIZON_DAYS`].
pub fn day_count(first: NaiveDate, last: NaiveDate) -> Result<usize, ScheduleError> {
    if last < first {
        return Err(ScheduleError::InvalidRange {
            first: first.format(DATE_FORMAT).to_string(),
            last: last.format(DATE_FORMAT).to_string(),
        });
    }

    let days = (last - first).num_days() + 1;
    if days > MAX_HORIZON_DAYS as i64 {
        return Err(ScheduleError::InvalidInput(format!(
            "horizon spans {} days, at most {} are supported",
            days, MAX_HORIZON_DAYS
        )));
    }
    Ok(days as usize)
}

/// Every calendar date from `first` to `last`, both inclusive.
///
/// An inverted range is rejected instead of producing an empty horizon.
pub fn expand_range(first: NaiveDate, last: NaiveDate) -> Result<Vec<Day>, ScheduleError> {
    let count = day_count(first, last)?;

    Ok(first
        .iter_days()
        .take(count)
        .enumerate()
        .map(|(offset, date)| Day {
            label: day_label(date),
            index: offset + 1,
            date,
        })
        .collect())
}

/// First and last date of `month` (1-12) in `year`.
pub fn month_bounds(year: i64, month: i64) -> Result<(NaiveDate, NaiveDate), ScheduleError> {
    if !(1..=12).contains(&month) {
        return Err(ScheduleError::InvalidDate(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ScheduleError::InvalidDate(format!(
            "year must be between {} and {}, got {}",
            MIN_YEAR, MAX_YEAR, year
        )));
    }

    // Both casts are in range after the checks above.
    let (year, month) = (year as i32, month as u32);
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ScheduleError::InvalidDate(format!("{}-{:02} is not a valid month", year, month))
    })?;
    let last = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .last()
        .unwrap_or(first);

    Ok((first, last))
}

/// Every calendar date of `month` (1-12) in `year`.
pub fn expand_month(year: i64, month: i64) -> Result<Vec<Day>, ScheduleError> {
    let (first, last) = month_bounds(year, month)?;
    expand_range(first, last)
}
