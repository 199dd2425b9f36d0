//! Cron validation and upcoming-run previews.
//!
//! Expressions produced by this crate are standard 5-field cron. The `cron`
//! crate wants 6 fields (seconds first) and numbers weekdays from Sunday = 1,
//! so [`to_schedule_syntax`] bridges the two before validation.

pub(crate) mod cron;

#[cfg(test)]
mod tests;

pub use self::cron::{normalize_cron, to_schedule_syntax, upcoming, validate};
