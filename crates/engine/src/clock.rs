//! Small calendar and wall-clock helpers.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::error::SynthesisError;

/// Parse `HH:MM` into `(hour, minute)`.
pub(crate) fn parse_hhmm(input: &str) -> Result<(u8, u8), SynthesisError> {
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| SynthesisError::InvalidTime(input.to_string()))?;
    Ok((time.hour() as u8, time.minute() as u8))
}

pub(crate) fn format_hhmm(hour: u8, minute: u8) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// Number of days in `month` (1-12) of `year`.
pub(crate) fn days_in_month(year: i32, month: u8) -> u8 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month as u32 + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day() as u8)
        .unwrap_or(31)
}
