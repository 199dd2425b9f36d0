//! Engine behaviour switches shared by the engine and its front ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchedkitError;

/// How cron fields that are not plain in-range integers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Wildcards and junk fall back to field defaults, out-of-range values are
    /// clamped and unknown zones resolve to UTC.
    #[default]
    Lenient,
    /// Anything that is not a literal in-range integer is rejected.
    Strict,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = SchedkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(SchedkitError::InvalidSetting {
                key: "parse_mode".to_string(),
                value: other.to_string(),
                reason: "expected 'lenient' or 'strict'".to_string(),
            }),
        }
    }
}

/// Where UTC offsets for named zones come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSource {
    /// Static table of fixed offsets, no daylight-saving adjustment.
    #[default]
    Fixed,
    /// IANA tz database, evaluated on the cron's calendar date.
    Iana,
}

impl OffsetSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Iana => "iana",
        }
    }
}

impl fmt::Display for OffsetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffsetSource {
    type Err = SchedkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "iana" | "tzdb" => Ok(Self::Iana),
            other => Err(SchedkitError::InvalidSetting {
                key: "offset_source".to_string(),
                value: other.to_string(),
                reason: "expected 'fixed' or 'iana'".to_string(),
            }),
        }
    }
}

/// What happens to the minute field when zones differ by a fractional hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinuteHandling {
    /// The minute is emitted unchanged; the hour shift is floored to a whole hour.
    #[default]
    Preserve,
    /// The minute absorbs the fractional part of the shift (09:00 UTC is 14:30 IST).
    Carry,
}

impl MinuteHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Carry => "carry",
        }
    }
}

impl fmt::Display for MinuteHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MinuteHandling {
    type Err = SchedkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "carry" => Ok(Self::Carry),
            other => Err(SchedkitError::InvalidSetting {
                key: "minute_handling".to_string(),
                value: other.to_string(),
                reason: "expected 'preserve' or 'carry'".to_string(),
            }),
        }
    }
}

/// Settings consumed by the conversion engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub parse_mode: ParseMode,
    #[serde(default)]
    pub offset_source: OffsetSource,
    #[serde(default)]
    pub minute_handling: MinuteHandling,
    /// Year used for month-length and DST lookups. `None` means the current year.
    #[serde(default)]
    pub reference_year: Option<i32>,
}

impl EngineSettings {
    pub fn strict() -> Self {
        Self {
            parse_mode: ParseMode::Strict,
            ..Self::default()
        }
    }
}
