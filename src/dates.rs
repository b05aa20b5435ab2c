//! Calendar helpers for the wire formats: days as `YYYY-MM-DD`, weeks as
//! `YYYY-WW` (ISO week).

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in UTC.
pub fn today() -> String {
    format_date(Utc::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| Error::Other(format!("invalid date {s:?}: {e}")))
}

/// ISO week key, e.g. `2026-42`. The year is the ISO week-numbering year,
/// which differs from the calendar year around New Year.
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-{:02}", week.year(), week.week())
}
