//! Schedule-expression engine.
//!
//! This crate provides:
//! - 5-field cron parsing with lenient (coercing) and strict modes
//! - Cron timezone conversion over a fixed offset table or the IANA database
//! - Holiday-safe cron synthesis with a companion holiday-check script
//! - Repetitive-job shell script synthesis with `at` and cron alternatives
//! - Session-scoped history of generated results
//! - Cron validation and upcoming-run previews via the `cron` crate
//!
//! Everything here is synchronous and performs no I/O.

pub mod convert;
pub mod error;
pub mod expression;
pub mod history;
pub mod holiday;
pub mod repeat;
pub mod scheduler;
pub mod session;
pub mod timezone;

mod clock;

pub use convert::{convert_timezone, explain_conversion, Conversion, CronConverter};
pub use error::{ConvertError, CronParseError, ScheduleError, SynthesisError};
pub use expression::{parse_cron, CronExpression, CronField};
pub use history::{HolidaySafeSchedule, RepetitiveJob, ScheduleConversionRecord, SessionLog};
pub use holiday::{HolidayCalendar, HolidaySafeConfig, HolidaySafePlan, MonthDay, ScheduleType};
pub use repeat::{IntervalUnit, RepetitiveJobConfig, RepetitiveJobPlan};
pub use session::{Session, SessionState};
pub use timezone::{lookup_zone, zone_label, ZoneInfo, ZONES};

pub use schedkit_core::{EngineSettings, MinuteHandling, OffsetSource, ParseMode};
