//! Period boundaries: `MM/DD/YYYY` input dates to epoch-second strings.
//!
//! The history endpoint takes `period1`/`period2` as integer seconds since
//! 1970-01-01 UTC. Midnight of the requested day is computed either in the
//! machine's local zone (what a desktop browser sends) or in UTC.

use crate::error::ScrapeError;
use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Input format for period dates.
pub const INPUT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Which zone "midnight" is taken in when converting a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    #[default]
    Local,
    Utc,
}

/// Parse `MM/DD/YYYY`.
pub fn parse_input_date(text: &str) -> Result<NaiveDate, ScrapeError> {
    NaiveDate::parse_from_str(text.trim(), INPUT_DATE_FORMAT).map_err(|source| {
        ScrapeError::DateParse {
            input: text.to_string(),
            format: INPUT_DATE_FORMAT,
            source,
        }
    })
}

/// Epoch seconds at midnight of `date` in the given basis.
pub fn to_epoch(date: NaiveDate, basis: TimeBasis) -> Result<i64, ScrapeError> {
    let midnight = date.and_time(NaiveTime::MIN);
    match basis {
        TimeBasis::Utc => Ok(midnight.and_utc().timestamp()),
        TimeBasis::Local => match chrono::Local.from_local_datetime(&midnight) {
            LocalResult::Single(t) => Ok(t.timestamp()),
            // Clocks went back over midnight: take the first occurrence.
            LocalResult::Ambiguous(first, _) => Ok(first.timestamp()),
            LocalResult::None => Err(ScrapeError::InvalidDate(format!(
                "local midnight of {date} does not exist"
            ))),
        },
    }
}

/// Calendar day containing `seconds` in the given basis.
pub fn from_epoch(seconds: i64, basis: TimeBasis) -> Result<NaiveDate, ScrapeError> {
    let out_of_range = || ScrapeError::InvalidDate(format!("timestamp {seconds} out of range"));
    match basis {
        TimeBasis::Utc => DateTime::from_timestamp(seconds, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(out_of_range),
        TimeBasis::Local => chrono::Local
            .timestamp_opt(seconds, 0)
            .single()
            .map(|dt| dt.date_naive())
            .ok_or_else(out_of_range),
    }
}

/// `MM/DD/YYYY` text to the epoch-second string used in the request URL.
pub fn convert_date_to_timestamp(text: &str, basis: TimeBasis) -> Result<String, ScrapeError> {
    let date = parse_input_date(text)?;
    Ok(to_epoch(date, basis)?.to_string())
}
