//! Session-scoped history of generated schedules.
//!
//! Records are immutable once created and live only as long as the
//! [`SessionLog`] that holds them. Nothing is persisted.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::convert::Conversion;
use crate::holiday::{HolidayCalendar, HolidaySafeConfig, HolidaySafePlan, ScheduleType};
use crate::repeat::{IntervalUnit, RepetitiveJobConfig, RepetitiveJobPlan};

/// Newest-first, optionally bounded list of records.
#[derive(Debug, Clone)]
pub struct SessionLog<R> {
    entries: VecDeque<R>,
    /// Maximum number of entries; `None` means unbounded.
    limit: Option<usize>,
}

impl<R> SessionLog<R> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            limit: None,
        }
    }

    /// Bounded log that drops the oldest entry once `limit` is reached.
    /// A limit of 0 means unbounded.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: (limit > 0).then_some(limit),
        }
    }

    /// Prepend a record and return a reference to it.
    pub fn record(&mut self, entry: R) -> &R {
        self.entries.push_front(entry);
        if let Some(limit) = self.limit {
            self.entries.truncate(limit);
        }
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &R> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&R> {
        self.entries.front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for SessionLog<R> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Records ─────────────────────────────────────────────────────────

/// One successful timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConversionRecord {
    pub id: Uuid,
    pub original_cron: String,
    pub source_timezone: String,
    pub target_timezone: String,
    pub converted_cron: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl ScheduleConversionRecord {
    pub fn new(original_cron: &str, conversion: &Conversion) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_cron: original_cron.trim().to_string(),
            source_timezone: conversion.source_timezone.clone(),
            target_timezone: conversion.target_timezone.clone(),
            converted_cron: conversion.cron(),
            explanation: conversion.explanation.clone(),
            created_at: Utc::now(),
        }
    }
}

/// One holiday-safe schedule and the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidaySafeSchedule {
    pub id: Uuid,
    pub schedule_type: ScheduleType,
    pub time: String,
    pub skip_weekends: bool,
    pub skip_holidays: bool,
    /// Dates the script checks; empty when holidays are not skipped.
    pub holidays: Vec<String>,
    pub cron: String,
    pub explanation: String,
    pub script: String,
    pub created_at: DateTime<Utc>,
}

impl HolidaySafeSchedule {
    pub fn new(config: &HolidaySafeConfig, calendar: &HolidayCalendar, plan: HolidaySafePlan) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule_type: config.schedule_type,
            time: config.time.trim().to_string(),
            skip_weekends: config.skip_weekends,
            skip_holidays: config.skip_holidays,
            holidays: if config.skip_holidays {
                calendar.dates()
            } else {
                Vec::new()
            },
            cron: plan.cron,
            explanation: plan.explanation,
            script: plan.script,
            created_at: Utc::now(),
        }
    }
}

/// One repetitive-job plan and the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepetitiveJob {
    pub id: Uuid,
    pub command: String,
    pub start_time: String,
    pub interval: u32,
    pub unit: IntervalUnit,
    pub repetitions: u32,
    pub max_duration_minutes: u32,
    pub script: String,
    pub at_command: String,
    pub cron_suggestion: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl RepetitiveJob {
    pub fn new(config: &RepetitiveJobConfig, plan: RepetitiveJobPlan) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: config.command.trim().to_string(),
            start_time: config.start_time.trim().to_string(),
            interval: config.interval,
            unit: config.unit,
            repetitions: config.repetitions,
            max_duration_minutes: config.max_duration_minutes,
            script: plan.script,
            at_command: plan.at_command,
            cron_suggestion: plan.cron_suggestion,
            explanation: plan.explanation,
            created_at: Utc::now(),
        }
    }
}
