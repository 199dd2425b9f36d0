//! Cron timezone conversion.
//!
//! [`CronConverter`] shifts the hour, day and month of a cron expression so it
//! fires at the same absolute instant in another zone. Minute and weekday are
//! passed through. The weekday is never recalculated, even when the calendar
//! day rolls over. With [`MinuteHandling::Preserve`] a fractional-hour shift
//! is floored to whole hours; [`MinuteHandling::Carry`] moves the minute too.
//!
//! Two offset sources are supported:
//! - [`OffsetSource::Fixed`] uses the static table in [`crate::timezone`] and
//!   rolls days/months by hand. A day past 31 becomes the 1st of the next
//!   month, and a day below 1 becomes the last day of the previous month.
//! - [`OffsetSource::Iana`] resolves both zones through `chrono-tz` on the
//!   cron's calendar date in the reference year, so DST applies.

use chrono::{Datelike, Duration, LocalResult, NaiveDate, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use schedkit_core::{EngineSettings, MinuteHandling, OffsetSource, ParseMode};

use crate::clock::days_in_month;
use crate::error::ConvertError;
use crate::expression::{parse_cron, CronExpression};
use crate::timezone::{lookup_zone, zone_label};

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Result of converting a cron expression between zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub original: CronExpression,
    pub converted: CronExpression,
    pub source_timezone: String,
    pub target_timezone: String,
    /// Target offset minus source offset, in minutes.
    pub offset_diff_minutes: i32,
    pub explanation: String,
}

impl Conversion {
    /// Converted expression in `m h d M w` form.
    pub fn cron(&self) -> String {
        self.converted.to_string()
    }
}

/// Converts cron expressions between named zones.
#[derive(Debug, Clone, Default)]
pub struct CronConverter {
    settings: EngineSettings,
}

impl CronConverter {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn reference_year(&self) -> i32 {
        self.settings
            .reference_year
            .unwrap_or_else(|| Utc::now().year())
    }

    /// Parse `cron` using the configured [`ParseMode`].
    pub fn parse(&self, cron: &str) -> Result<CronExpression, ConvertError> {
        Ok(parse_cron(cron, self.settings.parse_mode)?)
    }

    /// Convert `cron` from zone `from` to zone `to`.
    pub fn convert(&self, cron: &str, from: &str, to: &str) -> Result<Conversion, ConvertError> {
        let original = self.parse(cron)?;

        let (converted, diff) = match self.settings.offset_source {
            OffsetSource::Fixed => {
                let diff = self.fixed_offset(to)? - self.fixed_offset(from)?;
                let converted = shift_fixed(
                    &original,
                    diff,
                    self.reference_year(),
                    self.settings.minute_handling,
                );
                (converted, diff)
            }
            OffsetSource::Iana => self.shift_iana(&original, from, to)?,
        };

        debug!(
            cron = %cron.trim(),
            from = %from,
            to = %to,
            offset_diff_minutes = diff,
            converted = %converted,
            "converted cron expression"
        );

        Ok(Conversion {
            original,
            converted,
            source_timezone: from.trim().to_string(),
            target_timezone: to.trim().to_string(),
            offset_diff_minutes: diff,
            explanation: describe_shift(from, to, original.hour, converted.hour, diff),
        })
    }

    fn fixed_offset(&self, zone: &str) -> Result<i32, ConvertError> {
        match lookup_zone(zone) {
            Some(info) => Ok(info.offset_minutes),
            None => self.unknown_zone(zone).map(|_| 0),
        }
    }

    /// Resolve an IANA zone. Table names are matched case-insensitively, like
    /// the fixed path, before falling back to the full database.
    fn tz(&self, zone: &str) -> Result<Tz, ConvertError> {
        let name = lookup_zone(zone).map_or(zone.trim(), |info| info.name);
        match Tz::from_str_insensitive(name) {
            Ok(tz) => Ok(tz),
            Err(_) => self.unknown_zone(zone).map(|_| Tz::UTC),
        }
    }

    fn unknown_zone(&self, zone: &str) -> Result<(), ConvertError> {
        match self.settings.parse_mode {
            ParseMode::Strict => Err(ConvertError::UnknownTimezone(zone.trim().to_string())),
            ParseMode::Lenient => {
                warn!(zone = %zone.trim(), "unknown timezone, treating as UTC");
                Ok(())
            }
        }
    }

    fn shift_iana(
        &self,
        expr: &CronExpression,
        from: &str,
        to: &str,
    ) -> Result<(CronExpression, i32), ConvertError> {
        let source = self.tz(from)?;
        let target = self.tz(to)?;

        let carry = self.settings.minute_handling == MinuteHandling::Carry;
        let year = self.reference_year();
        let day = expr.day.min(days_in_month(year, expr.month));
        let wall_minute = if carry { expr.minute } else { 0 };
        let naive = NaiveDate::from_ymd_opt(year, expr.month as u32, day as u32)
            .and_then(|d| d.and_hms_opt(expr.hour as u32, wall_minute as u32, 0))
            .ok_or(ConvertError::InvalidDate {
                year,
                month: expr.month,
                day,
            })?;

        let (utc, source_offset) = match source.from_local_datetime(&naive) {
            LocalResult::Single(dt) => (dt.naive_utc(), dt.offset().fix()),
            LocalResult::Ambiguous(earliest, _) => (earliest.naive_utc(), earliest.offset().fix()),
            // Wall time skipped by a DST jump: apply the offset in force just before it.
            LocalResult::None => {
                let offset = source.offset_from_utc_datetime(&naive).fix();
                (naive - Duration::seconds(offset.local_minus_utc() as i64), offset)
            }
        };
        let shifted = target.from_utc_datetime(&utc);
        let diff = (shifted.offset().fix().local_minus_utc() - source_offset.local_minus_utc()) / 60;

        Ok((
            CronExpression {
                minute: if carry { shifted.minute() as u8 } else { expr.minute },
                hour: shifted.hour() as u8,
                day: shifted.day() as u8,
                month: shifted.month() as u8,
                weekday: expr.weekday,
            },
            diff,
        ))
    }
}

/// Shift by a fixed offset difference, rolling day/month by hand.
///
/// `year` only feeds the previous month's length on underflow.
fn shift_fixed(
    expr: &CronExpression,
    diff_minutes: i32,
    year: i32,
    minutes: MinuteHandling,
) -> CronExpression {
    let carried = match minutes {
        MinuteHandling::Carry => expr.minute as i32,
        MinuteHandling::Preserve => 0,
    };
    let total = expr.hour as i32 * 60 + carried + diff_minutes;
    let mut day = expr.day as i32 + total.div_euclid(MINUTES_PER_DAY);
    let time_of_day = total.rem_euclid(MINUTES_PER_DAY);
    let mut month = expr.month as i32;

    if day > 31 {
        day = 1;
        month = if month >= 12 { 1 } else { month + 1 };
    } else if day < 1 {
        let (prev_year, prev_month) = if month <= 1 { (year - 1, 12) } else { (year, month - 1) };
        month = prev_month;
        day = days_in_month(prev_year, prev_month as u8) as i32;
    }

    CronExpression {
        minute: match minutes {
            MinuteHandling::Carry => (time_of_day % 60) as u8,
            MinuteHandling::Preserve => expr.minute,
        },
        hour: (time_of_day / 60).clamp(0, 23) as u8,
        day: day.clamp(1, 31) as u8,
        month: month.clamp(1, 12) as u8,
        weekday: expr.weekday,
    }
}

/// Convert with default settings (lenient parsing, fixed offsets).
pub fn convert_timezone(cron: &str, from: &str, to: &str) -> Result<String, ConvertError> {
    CronConverter::default()
        .convert(cron, from, to)
        .map(|c| c.cron())
}

/// Describe how a conversion between two table zones moves the schedule.
///
/// The direction and magnitude come from the zones' fixed offsets. The hours
/// are only echoed back.
pub fn explain_conversion(from: &str, to: &str, original_hour: u8, converted_hour: u8) -> String {
    let offset = |zone: &str| lookup_zone(zone).map(|z| z.offset_minutes).unwrap_or(0);
    let diff = offset(to) - offset(from);
    describe_shift(from, to, original_hour, converted_hour, diff)
}

fn describe_shift(from: &str, to: &str, original_hour: u8, converted_hour: u8, diff: i32) -> String {
    let from_label = zone_label(from);
    let to_label = zone_label(to);

    if diff == 0 {
        return format!(
            "{} and {} share the same UTC offset, so the schedule stays at hour {}.",
            from_label, to_label, original_hour
        );
    }

    let direction = if diff > 0 { "forward" } else { "backward" };
    format!(
        "Converting from {} to {} moves the schedule {} by {}: hour {} becomes hour {}.",
        from_label,
        to_label,
        direction,
        format_hours(diff.unsigned_abs()),
        original_hour,
        converted_hour
    )
}

fn format_hours(minutes: u32) -> String {
    if minutes == 60 {
        "1 hour".to_string()
    } else if minutes % 60 == 0 {
        format!("{} hours", minutes / 60)
    } else {
        format!("{} hours", minutes as f64 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(year: i32) -> CronConverter {
        CronConverter::new(EngineSettings {
            reference_year: Some(year),
            ..EngineSettings::default()
        })
    }

    fn carrying(year: i32) -> CronConverter {
        CronConverter::new(EngineSettings {
            minute_handling: MinuteHandling::Carry,
            reference_year: Some(year),
            ..EngineSettings::default()
        })
    }

    fn iana(year: i32) -> CronConverter {
        CronConverter::new(EngineSettings {
            offset_source: OffsetSource::Iana,
            reference_year: Some(year),
            ..EngineSettings::default()
        })
    }

    #[test]
    fn utc_to_new_york_shifts_back_five_hours() {
        assert_eq!(
            convert_timezone("0 9 * * 1", "UTC", "America/New_York").unwrap(),
            "0 4 1 1 0"
        );
    }

    #[test]
    fn same_zone_is_identity() {
        let c = fixed(2023);
        for cron in ["0 0 1 1 0", "30 9 15 6 3", "59 23 31 12 7", "5 12 28 2 6"] {
            for zone in ["UTC", "Asia/Kolkata", "America/Los_Angeles"] {
                assert_eq!(c.convert(cron, zone, zone).unwrap().cron(), cron);
            }
        }
    }

    #[test]
    fn invalid_cron_is_reported() {
        let err = convert_timezone("not a cron", "UTC", "UTC").unwrap_err();
        assert_eq!(err.to_string(), "Invalid cron expression");
    }

    #[test]
    fn forward_overflow_rolls_into_next_day() {
        let c = fixed(2023).convert("15 20 10 6 2", "UTC", "Asia/Tokyo").unwrap();
        assert_eq!(c.cron(), "15 5 11 6 2");
        assert_eq!(c.offset_diff_minutes, 540);
    }

    #[test]
    fn year_end_rolls_into_january() {
        let c = fixed(2023).convert("0 20 31 12 5", "UTC", "Asia/Tokyo").unwrap();
        assert_eq!(c.cron(), "0 5 1 1 5");
    }

    #[test]
    fn day_underflow_uses_previous_month_length() {
        let c = fixed(2024).convert("0 2 1 3 4", "UTC", "America/New_York").unwrap();
        assert_eq!(c.cron(), "0 21 29 2 4");

        let c = fixed(2023).convert("0 2 1 3 4", "UTC", "America/New_York").unwrap();
        assert_eq!(c.cron(), "0 21 28 2 4");

        let c = fixed(2023).convert("0 2 1 1 4", "UTC", "America/New_York").unwrap();
        assert_eq!(c.cron(), "0 21 31 12 4");
    }

    #[test]
    fn overflow_past_31_ignores_short_months() {
        // April has 30 days; the fixed-offset path only rolls past 31.
        let c = fixed(2023).convert("0 22 30 4 1", "UTC", "Asia/Tokyo").unwrap();
        assert_eq!(c.cron(), "0 7 31 4 1");
    }

    #[test]
    fn fractional_offsets_keep_minute_by_default() {
        let c = fixed(2023);
        let there = c.convert("0 9 15 6 3", "UTC", "Asia/Kolkata").unwrap();
        assert_eq!(there.cron(), "0 14 15 6 3");
        assert_eq!(there.offset_diff_minutes, 330);

        // 14:00 - 5.5h = 08:30, floored to hour 8.
        let back = c.convert(&there.cron(), "Asia/Kolkata", "UTC").unwrap();
        assert_eq!(back.cron(), "0 8 15 6 3");

        // Negative fractional shift across midnight floors to the earlier hour.
        let c = c.convert("45 0 15 6 3", "Asia/Kolkata", "UTC").unwrap();
        assert_eq!(c.cron(), "45 18 14 6 3");
    }

    #[test]
    fn fractional_offsets_carry_into_minutes_when_enabled() {
        let c = carrying(2023);
        let there = c.convert("0 9 15 6 3", "UTC", "Asia/Kolkata").unwrap();
        assert_eq!(there.cron(), "30 14 15 6 3");
        let back = c.convert(&there.cron(), "Asia/Kolkata", "UTC").unwrap();
        assert_eq!(back.cron(), "0 9 15 6 3");
    }

    #[test]
    fn whole_hour_shifts_agree_in_both_minute_modes() {
        for cron in ["17 3 10 10 6", "59 23 31 12 0"] {
            assert_eq!(
                fixed(2023).convert(cron, "Europe/Paris", "America/Denver").unwrap(),
                carrying(2023).convert(cron, "Europe/Paris", "America/Denver").unwrap()
            );
        }
    }

    #[test]
    fn unknown_zone_falls_back_to_utc_when_lenient() {
        let c = fixed(2023).convert("0 9 1 1 1", "Mars/Base", "Asia/Tokyo").unwrap();
        assert_eq!(c.cron(), "0 18 1 1 1");
    }

    #[test]
    fn unknown_zone_is_an_error_when_strict() {
        let c = CronConverter::new(EngineSettings {
            reference_year: Some(2023),
            ..EngineSettings::strict()
        });
        assert_eq!(
            c.convert("0 9 1 1 1", "Mars/Base", "UTC").unwrap_err(),
            ConvertError::UnknownTimezone("Mars/Base".to_string())
        );
    }

    #[test]
    fn iana_applies_daylight_saving() {
        let c = iana(2024);
        // January: EST (UTC-5).
        assert_eq!(c.convert("0 9 15 1 1", "UTC", "America/New_York").unwrap().cron(), "0 4 15 1 1");
        // July: EDT (UTC-4).
        let summer = c.convert("0 9 15 7 1", "UTC", "America/New_York").unwrap();
        assert_eq!(summer.cron(), "0 5 15 7 1");
        assert_eq!(summer.offset_diff_minutes, -240);
    }

    #[test]
    fn iana_matches_table_names_case_insensitively() {
        let c = iana(2024);
        assert_eq!(c.convert("0 9 15 1 1", "UTC", "america/new_york").unwrap().cron(), "0 4 15 1 1");
        assert_eq!(c.convert("0 9 15 1 1", "utc", "ASIA/TOKYO").unwrap().cron(), "0 18 15 1 1");
        // Outside the fixed table, the database lookup itself ignores case.
        assert_eq!(c.convert("0 9 15 1 1", "UTC", "europe/madrid").unwrap().cron(), "0 10 15 1 1");
    }

    #[test]
    fn iana_skipped_wall_time_uses_offset_before_the_jump() {
        // 02:30 on 2024-03-10 does not exist in New York; EST (UTC-5) still applies.
        let c = iana(2024).convert("30 2 10 3 0", "America/New_York", "UTC").unwrap();
        assert_eq!(c.cron(), "30 7 10 3 0");
        assert_eq!(c.offset_diff_minutes, 300);
    }

    #[test]
    fn iana_ambiguous_wall_time_takes_earlier_instant() {
        // 01:30 on 2024-11-03 happens twice in New York; the EDT (UTC-4) one is first.
        let c = iana(2024).convert("30 1 3 11 0", "America/New_York", "UTC").unwrap();
        assert_eq!(c.cron(), "30 5 3 11 0");
        assert_eq!(c.offset_diff_minutes, 240);
    }

    #[test]
    fn iana_fractional_zone_follows_minute_handling() {
        let preserve = iana(2024).convert("0 9 15 6 3", "UTC", "Asia/Kolkata").unwrap();
        assert_eq!(preserve.cron(), "0 14 15 6 3");

        let carry = CronConverter::new(EngineSettings {
            offset_source: OffsetSource::Iana,
            minute_handling: MinuteHandling::Carry,
            reference_year: Some(2024),
            ..EngineSettings::default()
        });
        assert_eq!(carry.convert("0 9 15 6 3", "UTC", "Asia/Kolkata").unwrap().cron(), "30 14 15 6 3");
    }

    #[test]
    fn iana_clamps_day_to_month_length() {
        let c = iana(2023).convert("0 22 31 4 0", "UTC", "Asia/Tokyo").unwrap();
        assert_eq!(c.cron(), "0 7 1 5 0");
    }

    #[test]
    fn explanation_states_direction_and_magnitude() {
        let text = explain_conversion("UTC", "America/New_York", 9, 4);
        assert!(text.contains("Coordinated Universal Time (UTC)"));
        assert!(text.contains("Eastern Time (EST/EDT)"));
        assert!(text.contains("backward by 5 hours"));

        let text = explain_conversion("UTC", "Asia/Kolkata", 9, 14);
        assert!(text.contains("forward by 5.5 hours"));

        let text = explain_conversion("Europe/Paris", "Europe/Berlin", 9, 9);
        assert!(text.contains("same UTC offset"));

        let text = explain_conversion("Europe/London", "Europe/Paris", 9, 10);
        assert!(text.contains("forward by 1 hour:"));
    }
}
