//! Business-day / holiday-safe cron synthesis.
//!
//! The cron expression comes from a fixed template per [`ScheduleType`].
//! Holidays are never encoded into it. They only live in the companion
//! shell script from [`holiday_check_script`], which the operator wraps
//! around the job.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::{format_hhmm, parse_hhmm};
use crate::error::SynthesisError;

const PLACEHOLDER_COMMAND: &str = "/path/to/your/job.sh";

/// Recurrence cadence for the holiday-safe synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleType {
    Daily,
    Weekly,
    Monthly,
    BusinessDays,
    Quarterly,
}

impl ScheduleType {
    pub const ALL: [ScheduleType; 5] = [
        ScheduleType::Daily,
        ScheduleType::Weekly,
        ScheduleType::Monthly,
        ScheduleType::BusinessDays,
        ScheduleType::Quarterly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::BusinessDays => "business-days",
            Self::Quarterly => "quarterly",
        }
    }

    /// Cadences whose weekend skipping cron cannot express exactly.
    fn weekend_skip_is_approximate(&self) -> bool {
        matches!(self, Self::Monthly | Self::Quarterly)
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "business-days" | "businessdays" | "weekdays" => Ok(Self::BusinessDays),
            "quarterly" => Ok(Self::Quarterly),
            _ => Err(SynthesisError::UnknownScheduleType(s.to_string())),
        }
    }
}

// ── Holiday calendar ────────────────────────────────────────────────

/// A yearless calendar date, rendered as `MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    pub month: u8,
    pub day: u8,
}

impl MonthDay {
    /// Validates against the longest possible month (Feb 29 is allowed).
    pub fn new(month: u8, day: u8) -> Option<Self> {
        let max_day = match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => 29,
            _ => return None,
        };
        (1..=max_day).contains(&day).then_some(Self { month, day })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SynthesisError::InvalidHoliday(s.to_string());
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let day: u8 = day.parse().map_err(|_| invalid())?;
        Self::new(month, day).ok_or_else(invalid)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// User-editable set of holiday dates, kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    dates: BTreeSet<MonthDay>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// New Year's Day, Independence Day and Christmas.
    pub fn with_common_holidays() -> Self {
        let mut calendar = Self::new();
        for (month, day) in [(1, 1), (7, 4), (12, 25)] {
            if let Some(date) = MonthDay::new(month, day) {
                calendar.dates.insert(date);
            }
        }
        calendar
    }

    /// Add a `MM-DD` date. Returns `false` if it was already present.
    pub fn add(&mut self, date: &str) -> Result<bool, SynthesisError> {
        Ok(self.dates.insert(date.parse()?))
    }

    /// Remove a `MM-DD` date. Returns `false` if it was not present.
    pub fn remove(&mut self, date: &str) -> Result<bool, SynthesisError> {
        Ok(self.dates.remove(&date.parse()?))
    }

    pub fn contains(&self, date: &MonthDay) -> bool {
        self.dates.contains(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthDay> {
        self.dates.iter()
    }

    /// Dates rendered as `MM-DD`, in calendar order.
    pub fn dates(&self) -> Vec<String> {
        self.dates.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

// ── Synthesis ───────────────────────────────────────────────────────

/// Parameters for the holiday-safe synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySafeConfig {
    pub schedule_type: ScheduleType,
    /// Time of day as `HH:MM`.
    pub time: String,
    pub skip_weekends: bool,
    pub skip_holidays: bool,
    /// Command the companion script runs; a placeholder is used when empty.
    #[serde(default)]
    pub command: String,
}

impl Default for HolidaySafeConfig {
    fn default() -> Self {
        Self {
            schedule_type: ScheduleType::Daily,
            time: "09:00".to_string(),
            skip_weekends: true,
            skip_holidays: true,
            command: String::new(),
        }
    }
}

/// Artifacts generated for a holiday-safe schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySafePlan {
    pub cron: String,
    pub explanation: String,
    pub script: String,
    /// Set when cron alone cannot honour the weekend rule.
    pub approximate: bool,
}

/// Build the cron expression, explanation and companion script.
pub fn synthesize(
    config: &HolidaySafeConfig,
    calendar: &HolidayCalendar,
) -> Result<HolidaySafePlan, SynthesisError> {
    let (hour, minute) = parse_hhmm(&config.time)?;
    let cron = cron_template(config.schedule_type, hour, minute, config.skip_weekends);
    let approximate = config.skip_weekends && config.schedule_type.weekend_skip_is_approximate();

    let command = match config.command.trim() {
        "" => PLACEHOLDER_COMMAND,
        cmd => cmd,
    };
    let holidays = config.skip_holidays.then_some(calendar);
    let script = holiday_check_script(command, holidays, approximate);

    Ok(HolidaySafePlan {
        explanation: explain(config, calendar, &format_hhmm(hour, minute), approximate),
        cron,
        script,
        approximate,
    })
}

fn cron_template(schedule_type: ScheduleType, hour: u8, minute: u8, skip_weekends: bool) -> String {
    match (schedule_type, skip_weekends) {
        (ScheduleType::Daily, false) => format!("{} {} * * *", minute, hour),
        (ScheduleType::Daily, true) | (ScheduleType::BusinessDays, _) => {
            format!("{} {} * * 1-5", minute, hour)
        }
        (ScheduleType::Weekly, _) => format!("{} {} * * 1", minute, hour),
        (ScheduleType::Monthly, _) => format!("{} {} 1 * *", minute, hour),
        (ScheduleType::Quarterly, _) => format!("{} {} 1 1,4,7,10 *", minute, hour),
    }
}

fn explain(
    config: &HolidaySafeConfig,
    calendar: &HolidayCalendar,
    time: &str,
    approximate: bool,
) -> String {
    let mut sentences = vec![match config.schedule_type {
        ScheduleType::Daily if config.skip_weekends => format!("Runs Monday through Friday at {}.", time),
        ScheduleType::Daily => format!("Runs every day at {}.", time),
        ScheduleType::Weekly => format!("Runs every Monday at {}.", time),
        ScheduleType::Monthly => format!("Runs on the 1st of every month at {}.", time),
        ScheduleType::BusinessDays => format!("Runs Monday through Friday at {}.", time),
        ScheduleType::Quarterly => {
            format!("Runs on the 1st of January, April, July and October at {}.", time)
        }
    }];

    if config.skip_weekends {
        sentences.push(if approximate {
            "Skips weekends approximately: cron cannot move a weekend date to the nearest weekday, \
             so the companion script exits on Saturday and Sunday instead."
                .to_string()
        } else {
            "Skips weekends (Saturday and Sunday) through the day-of-week field.".to_string()
        });
    }

    if config.skip_holidays {
        sentences.push(if calendar.is_empty() {
            "Holiday skipping is enabled but the holiday list is empty.".to_string()
        } else {
            format!(
                "Skips {} holiday date(s) ({}) through the companion script; cron itself does not know about holidays.",
                calendar.len(),
                calendar.dates().join(", ")
            )
        });
    }

    sentences.join(" ")
}

/// Bash wrapper that exits early on holidays (and weekends, if guarded)
/// before running `command`.
pub fn holiday_check_script(
    command: &str,
    holidays: Option<&HolidayCalendar>,
    weekend_guard: bool,
) -> String {
    let mut script = String::from("#!/bin/bash\n# Holiday-safe job wrapper generated by schedkit.\n\n");

    if let Some(calendar) = holidays {
        let list = calendar
            .iter()
            .map(|d| format!("\"{}\"", d))
            .collect::<Vec<_>>()
            .join(" ");
        script.push_str("TODAY=$(date +%m-%d)\n");
        script.push_str(&format!("HOLIDAYS=({})\n\n", list));
        script.push_str("for HOLIDAY in \"${HOLIDAYS[@]}\"; do\n");
        script.push_str("  if [ \"$TODAY\" = \"$HOLIDAY\" ]; then\n");
        script.push_str("    echo \"Skipping run: $TODAY is a holiday\"\n");
        script.push_str("    exit 0\n");
        script.push_str("  fi\n");
        script.push_str("done\n\n");
    }

    if weekend_guard {
        script.push_str("if [ \"$(date +%u)\" -ge 6 ]; then\n");
        script.push_str("  echo \"Skipping run: weekend\"\n");
        script.push_str("  exit 0\n");
        script.push_str("fi\n\n");
    }

    script.push_str(command);
    script.push('\n');
    script
}
