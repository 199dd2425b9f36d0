//! 5-field cron expressions restricted to single integer values.
//!
//! Only literal integers survive conversion. Range, list and step syntax
//! (`1-5`, `1,2,3`, `*/5`) is either coerced ([`ParseMode::Lenient`]) or
//! rejected ([`ParseMode::Strict`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use schedkit_core::ParseMode;

use crate::error::CronParseError;

/// Position of a field in a 5-field cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CronField {
    Minute,
    Hour,
    Day,
    Month,
    Weekday,
}

impl CronField {
    pub const ALL: [CronField; 5] = [
        CronField::Minute,
        CronField::Hour,
        CronField::Day,
        CronField::Month,
        CronField::Weekday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day-of-month",
            Self::Month => "month",
            Self::Weekday => "day-of-week",
        }
    }

    /// Inclusive bounds. Weekday allows both 0 and 7 for Sunday.
    pub fn bounds(&self) -> (u8, u8) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::Day => (1, 31),
            Self::Month => (1, 12),
            Self::Weekday => (0, 7),
        }
    }

    /// Value substituted for wildcards and unparseable tokens in lenient mode.
    pub fn default_value(&self) -> u8 {
        match self {
            Self::Minute | Self::Hour | Self::Weekday => 0,
            Self::Day | Self::Month => 1,
        }
    }

    fn clamp(&self, value: i64) -> u8 {
        let (min, max) = self.bounds();
        value.clamp(min as i64, max as i64) as u8
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cron expression whose five fields are all single integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CronExpression {
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub weekday: u8,
}

impl CronExpression {
    pub fn get(&self, field: CronField) -> u8 {
        match field {
            CronField::Minute => self.minute,
            CronField::Hour => self.hour,
            CronField::Day => self.day,
            CronField::Month => self.month,
            CronField::Weekday => self.weekday,
        }
    }

    /// Both 0 and 7 denote Sunday.
    pub fn is_sunday(&self) -> bool {
        self.weekday == 0 || self.weekday == 7
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day, self.month, self.weekday
        )
    }
}

/// Parse a cron string positionally over its first five whitespace-separated fields.
pub fn parse_cron(input: &str, mode: ParseMode) -> Result<CronExpression, CronParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(CronParseError::TooFewFields {
            found: tokens.len(),
        });
    }

    match mode {
        ParseMode::Lenient => Ok(parse_lenient(&tokens[..5])),
        ParseMode::Strict => {
            if tokens.len() > 5 {
                return Err(CronParseError::TooManyFields {
                    found: tokens.len(),
                });
            }
            parse_strict(&tokens)
        }
    }
}

fn parse_lenient(tokens: &[&str]) -> CronExpression {
    let values: Vec<Option<i64>> = tokens.iter().map(|t| leading_int(t)).collect();
    let field = |i: usize| {
        let f = CronField::ALL[i];
        values[i].map(|v| f.clamp(v)).unwrap_or_else(|| f.default_value())
    };

    // A wildcard date is pinned to 1 January; a weekday cannot restrict a
    // pinned date, so it collapses to its default too.
    let date_is_literal = values[2].is_some() && values[3].is_some();
    let weekday = if date_is_literal {
        field(4)
    } else {
        CronField::Weekday.default_value()
    };

    CronExpression {
        minute: field(0),
        hour: field(1),
        day: field(2),
        month: field(3),
        weekday,
    }
}

fn parse_strict(tokens: &[&str]) -> Result<CronExpression, CronParseError> {
    let mut values = [0u8; 5];
    for (i, field) in CronField::ALL.iter().enumerate() {
        values[i] = strict_field(*field, tokens[i])?;
    }
    Ok(CronExpression {
        minute: values[0],
        hour: values[1],
        day: values[2],
        month: values[3],
        weekday: values[4],
    })
}

fn strict_field(field: CronField, token: &str) -> Result<u8, CronParseError> {
    match token.parse::<i64>() {
        Ok(value) => {
            let (min, max) = field.bounds();
            if value < min as i64 || value > max as i64 {
                return Err(CronParseError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
            Ok(value as u8)
        }
        Err(_) if token.contains(['*', ',', '-', '/', '?']) => {
            Err(CronParseError::UnsupportedSyntax {
                field,
                token: token.to_string(),
            })
        }
        Err(_) => Err(CronParseError::NotAnInteger {
            field,
            token: token.to_string(),
        }),
    }
}

/// Radix-10 prefix parse: optional sign, then as many digits as present.
/// `"5abc"` gives 5, `"1-5"` gives 1, `"*"` gives `None`.
fn leading_int(token: &str) -> Option<i64> {
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as i64)
    });
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(s: &str) -> CronExpression {
        parse_cron(s, ParseMode::Lenient).unwrap()
    }

    #[test]
    fn parses_literal_fields() {
        let c = lenient("30 9 15 6 3");
        assert_eq!(
            c,
            CronExpression {
                minute: 30,
                hour: 9,
                day: 15,
                month: 6,
                weekday: 3
            }
        );
        assert_eq!(c.to_string(), "30 9 15 6 3");
    }

    #[test]
    fn wildcard_date_pins_to_defaults() {
        let c = lenient("0 9 * * 1");
        assert_eq!(
            c,
            CronExpression {
                minute: 0,
                hour: 9,
                day: 1,
                month: 1,
                weekday: 0
            }
        );
    }

    #[test]
    fn literal_date_keeps_weekday() {
        assert_eq!(lenient("0 9 1 1 1").weekday, 1);
        assert_eq!(lenient("0 9 1 1 7").weekday, 7);
        assert!(lenient("0 9 1 1 7").is_sunday());
    }

    #[test]
    fn too_few_fields_is_invalid() {
        let err = parse_cron("not a cron", ParseMode::Lenient).unwrap_err();
        assert_eq!(err, CronParseError::TooFewFields { found: 3 });
        assert_eq!(err.to_string(), "Invalid cron expression");
        assert!(parse_cron("", ParseMode::Strict).is_err());
    }

    #[test]
    fn lenient_uses_leading_digits_and_clamps() {
        let c = lenient("*/5 1-5 40 13 9");
        assert_eq!(c.minute, 0);
        assert_eq!(c.hour, 1);
        assert_eq!(c.day, 31);
        assert_eq!(c.month, 12);
        assert_eq!(c.weekday, 7);

        let c = lenient("-3 99 0 0 -1");
        assert_eq!((c.minute, c.hour, c.day, c.month, c.weekday), (0, 23, 1, 1, 0));
    }

    #[test]
    fn lenient_ignores_extra_fields() {
        assert_eq!(lenient("0 9 1 2 3 /usr/bin/backup").to_string(), "0 9 1 2 3");
    }

    #[test]
    fn tolerates_irregular_whitespace() {
        assert_eq!(lenient("  5\t23   31 12 6 ").to_string(), "5 23 31 12 6");
    }

    #[test]
    fn strict_rejects_wildcards() {
        let err = parse_cron("0 9 * * 1", ParseMode::Strict).unwrap_err();
        assert_eq!(
            err,
            CronParseError::UnsupportedSyntax {
                field: CronField::Day,
                token: "*".to_string()
            }
        );
    }

    #[test]
    fn strict_rejects_out_of_range_and_junk() {
        assert!(matches!(
            parse_cron("0 24 1 1 0", ParseMode::Strict),
            Err(CronParseError::OutOfRange {
                field: CronField::Hour,
                value: 24,
                ..
            })
        ));
        assert!(matches!(
            parse_cron("0 9 1 1 mon", ParseMode::Strict),
            Err(CronParseError::NotAnInteger {
                field: CronField::Weekday,
                ..
            })
        ));
        assert!(matches!(
            parse_cron("0 9 1 1 0 extra", ParseMode::Strict),
            Err(CronParseError::TooManyFields { found: 6 })
        ));
    }

    #[test]
    fn strict_accepts_plain_integers() {
        assert_eq!(
            parse_cron("59 23 31 12 7", ParseMode::Strict).unwrap().to_string(),
            "59 23 31 12 7"
        );
    }

    #[test]
    fn leading_int_matches_prefix_semantics() {
        assert_eq!(leading_int("5abc"), Some(5));
        assert_eq!(leading_int("+7"), Some(7));
        assert_eq!(leading_int("-12"), Some(-12));
        assert_eq!(leading_int("*"), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int("99999999999999999999999"), Some(i64::MAX));
    }
}
