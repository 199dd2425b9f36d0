//! Cron normalization, weekday translation and preview helpers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::error::ScheduleError;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Normalize a 5-field cron expression to 6-field by prepending "0 " for seconds.
///
/// The `cron` crate requires 6 fields: `sec min hour day-of-month month day-of-week`.
/// Standard cron uses 5 fields: `min hour day-of-month month day-of-week`.
pub fn normalize_cron(cron_5field: &str) -> String {
    let trimmed = cron_5field.trim();
    let field_count = trimmed.split_whitespace().count();
    if field_count == 5 {
        format!("0 {}", trimmed)
    } else {
        // Already 6-field or non-standard; pass through as-is.
        trimmed.to_string()
    }
}

/// Normalize and rewrite numeric day-of-week values (0/7 = Sunday) as names.
///
/// Step values after `/` are left numeric.
pub fn to_schedule_syntax(expr: &str) -> String {
    let normalized = normalize_cron(expr);
    let mut fields: Vec<String> = normalized.split_whitespace().map(String::from).collect();
    if fields.len() == 6 {
        fields[5] = weekday_names(&fields[5]);
    }
    fields.join(" ")
}

fn weekday_names(field: &str) -> String {
    let mut out = String::with_capacity(field.len() * 3);
    let mut digits = String::new();
    let mut after_slash = false;

    for ch in field.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        flush_weekday(&mut out, &mut digits, after_slash);
        after_slash = ch == '/';
        out.push(ch);
    }
    flush_weekday(&mut out, &mut digits, after_slash);
    out
}

fn flush_weekday(out: &mut String, digits: &mut String, is_step: bool) {
    if digits.is_empty() {
        return;
    }
    match digits.parse::<usize>() {
        Ok(n) if !is_step && n <= 7 => out.push_str(WEEKDAY_NAMES[n % 7]),
        _ => out.push_str(digits),
    }
    digits.clear();
}

/// Parse a standard 5-field (or 6-field) expression into a [`Schedule`].
pub fn validate(expr: &str) -> Result<Schedule, ScheduleError> {
    Schedule::from_str(&to_schedule_syntax(expr)).map_err(|e| ScheduleError::Invalid {
        expr: expr.trim().to_string(),
        reason: e.to_string(),
    })
}

/// The next `count` fire times strictly after `after`, in UTC.
pub fn upcoming(
    expr: &str,
    after: DateTime<Utc>,
    count: usize,
) -> Result<Vec<DateTime<Utc>>, ScheduleError> {
    let schedule = validate(expr)?;
    Ok(schedule.after(&after).take(count).collect())
}
