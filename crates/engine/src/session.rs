//! In-memory tool session.
//!
//! Wraps the pure engine the way a hosting UI does. The flow is
//! `Idle -> Converted -> Converted ...`, and every successful operation is
//! prepended to the matching history. Failures leave the state and histories
//! untouched.

use tracing::info;

use schedkit_core::EngineSettings;

use crate::convert::CronConverter;
use crate::error::{ConvertError, SynthesisError};
use crate::history::{HolidaySafeSchedule, RepetitiveJob, ScheduleConversionRecord, SessionLog};
use crate::holiday::{self, HolidayCalendar, HolidaySafeConfig};
use crate::repeat::{self, RepetitiveJobConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing converted yet, or history cleared.
    Idle,
    /// At least one result is on record.
    Converted,
}

/// Owns the converter, the holiday calendar and the three histories.
#[derive(Debug)]
pub struct Session {
    converter: CronConverter,
    calendar: HolidayCalendar,
    conversions: SessionLog<ScheduleConversionRecord>,
    holiday_schedules: SessionLog<HolidaySafeSchedule>,
    repetitive_jobs: SessionLog<RepetitiveJob>,
}

impl Session {
    /// `history_limit` bounds each history; 0 means unbounded.
    pub fn new(settings: EngineSettings, history_limit: usize) -> Self {
        Self {
            converter: CronConverter::new(settings),
            calendar: HolidayCalendar::with_common_holidays(),
            conversions: SessionLog::with_limit(history_limit),
            holiday_schedules: SessionLog::with_limit(history_limit),
            repetitive_jobs: SessionLog::with_limit(history_limit),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.conversions.is_empty()
            && self.holiday_schedules.is_empty()
            && self.repetitive_jobs.is_empty()
        {
            SessionState::Idle
        } else {
            SessionState::Converted
        }
    }

    pub fn converter(&self) -> &CronConverter {
        &self.converter
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut HolidayCalendar {
        &mut self.calendar
    }

    pub fn convert(
        &mut self,
        cron: &str,
        from: &str,
        to: &str,
    ) -> Result<&ScheduleConversionRecord, ConvertError> {
        let conversion = self.converter.convert(cron, from, to)?;
        info!(from = %from, to = %to, converted = %conversion.cron(), "conversion recorded");
        Ok(self
            .conversions
            .record(ScheduleConversionRecord::new(cron, &conversion)))
    }

    pub fn plan_holiday_safe(
        &mut self,
        config: &HolidaySafeConfig,
    ) -> Result<&HolidaySafeSchedule, SynthesisError> {
        let plan = holiday::synthesize(config, &self.calendar)?;
        info!(schedule_type = %config.schedule_type, cron = %plan.cron, "holiday-safe schedule recorded");
        Ok(self
            .holiday_schedules
            .record(HolidaySafeSchedule::new(config, &self.calendar, plan)))
    }

    pub fn plan_repetitive(
        &mut self,
        config: &RepetitiveJobConfig,
    ) -> Result<&RepetitiveJob, SynthesisError> {
        let plan = repeat::synthesize(config)?;
        info!(repetitions = config.repetitions, unit = %config.unit, "repetitive job recorded");
        Ok(self.repetitive_jobs.record(RepetitiveJob::new(config, plan)))
    }

    pub fn conversions(&self) -> &SessionLog<ScheduleConversionRecord> {
        &self.conversions
    }

    pub fn holiday_schedules(&self) -> &SessionLog<HolidaySafeSchedule> {
        &self.holiday_schedules
    }

    pub fn repetitive_jobs(&self) -> &SessionLog<RepetitiveJob> {
        &self.repetitive_jobs
    }

    /// Drop every history entry and return to [`SessionState::Idle`].
    pub fn clear_history(&mut self) {
        self.conversions.clear();
        self.holiday_schedules.clear();
        self.repetitive_jobs.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineSettings::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::ScheduleType;
    use crate::repeat::IntervalUnit;

    #[test]
    fn starts_idle_and_moves_to_converted() {
        let mut session = Session::default();
        assert_eq!(session.state(), SessionState::Idle);

        let record = session.convert("0 9 * * 1", "UTC", "America/New_York").unwrap();
        assert_eq!(record.converted_cron, "0 4 1 1 0");
        assert_eq!(session.state(), SessionState::Converted);

        session.convert("0 9 1 1 1", "UTC", "Asia/Tokyo").unwrap();
        assert_eq!(session.conversions().len(), 2);
        assert_eq!(
            session.conversions().latest().unwrap().converted_cron,
            "0 18 1 1 1"
        );
    }

    #[test]
    fn failures_record_nothing() {
        let mut session = Session::default();
        assert!(session.convert("bad", "UTC", "UTC").is_err());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.conversions().is_empty());
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut session = Session::default();
        session
            .plan_holiday_safe(&HolidaySafeConfig {
                schedule_type: ScheduleType::Daily,
                ..HolidaySafeConfig::default()
            })
            .unwrap();
        session
            .plan_repetitive(&RepetitiveJobConfig {
                command: "echo hi".to_string(),
                unit: IntervalUnit::Seconds,
                ..RepetitiveJobConfig::default()
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Converted);

        session.clear_history();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.holiday_schedules().is_empty());
        assert!(session.repetitive_jobs().is_empty());
    }

    #[test]
    fn holiday_record_captures_calendar() {
        let mut session = Session::default();
        session.calendar_mut().add("11-28").unwrap();
        let record = session
            .plan_holiday_safe(&HolidaySafeConfig::default())
            .unwrap();
        assert!(record.holidays.contains(&"11-28".to_string()));
        assert_eq!(record.cron, "0 9 * * 1-5");
    }
}
