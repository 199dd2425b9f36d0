//! Repetitive-job script synthesis.
//!
//! Produces a bash script that runs a command once and then loops for the
//! remaining runs, sleeping before each, an `at` command that starts it once, and an inexact
//! cron alternative. Nothing is executed here; the max-duration limit is
//! enforced by the generated script through `$SECONDS`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::{format_hhmm, parse_hhmm};
use crate::error::SynthesisError;

pub const MAX_REPETITIONS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
}

impl IntervalUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3_600,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalUnit {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(Self::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(Self::Hours),
            _ => Err(SynthesisError::UnknownUnit(s.to_string())),
        }
    }
}

/// Parameters for the repetitive-job synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitiveJobConfig {
    pub command: String,
    /// First run as `HH:MM`.
    pub start_time: String,
    pub interval: u32,
    pub unit: IntervalUnit,
    /// Total number of runs, including the first.
    pub repetitions: u32,
    /// Stop early once the script has run this long. 0 disables the limit.
    #[serde(default)]
    pub max_duration_minutes: u32,
    #[serde(default = "default_script_name")]
    pub script_name: String,
}

fn default_script_name() -> String {
    "repetitive_job.sh".to_string()
}

impl Default for RepetitiveJobConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            start_time: "09:00".to_string(),
            interval: 5,
            unit: IntervalUnit::Minutes,
            repetitions: 3,
            max_duration_minutes: 0,
            script_name: default_script_name(),
        }
    }
}

/// Artifacts generated for a repetitive job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitiveJobPlan {
    pub script: String,
    pub at_command: String,
    pub cron_suggestion: String,
    /// Why the cron suggestion is not equivalent to the script.
    pub cron_note: String,
    pub explanation: String,
    /// Seconds between the first and last run, ignoring command runtime.
    pub span_seconds: u64,
}

/// Validate `config` and build the script, `at` command and cron alternative.
pub fn synthesize(config: &RepetitiveJobConfig) -> Result<RepetitiveJobPlan, SynthesisError> {
    let command = config.command.trim();
    if command.is_empty() {
        return Err(SynthesisError::EmptyCommand);
    }
    let script_name = config.script_name.trim();
    if script_name.is_empty() {
        return Err(SynthesisError::EmptyScriptName);
    }
    if config.interval == 0 {
        return Err(SynthesisError::ZeroInterval);
    }
    if config.repetitions == 0 || config.repetitions > MAX_REPETITIONS {
        return Err(SynthesisError::Repetitions {
            got: config.repetitions,
            max: MAX_REPETITIONS,
        });
    }
    let (hour, minute) = parse_hhmm(&config.start_time)?;
    let start = format_hhmm(hour, minute);

    let step_seconds = config.unit.seconds() * config.interval as u64;
    let span_seconds = step_seconds * (config.repetitions as u64 - 1);
    let (cron_suggestion, cron_note) = suggest_cron(config, hour, minute);

    Ok(RepetitiveJobPlan {
        script: build_script(config, command),
        at_command: format!("at {} -f {}", start, script_name),
        cron_suggestion,
        cron_note,
        explanation: explain(config, &start, span_seconds),
        span_seconds,
    })
}

fn build_script(config: &RepetitiveJobConfig, command: &str) -> String {
    let total = config.repetitions;
    let limited = config.max_duration_minutes > 0;

    let mut script = format!(
        "#!/bin/bash\n# Repetitive job generated by schedkit: {} run(s), {} {} apart.\nRUNS={}\n",
        total, config.interval, config.unit, total
    );
    if limited {
        script.push_str(&format!(
            "MAX_DURATION=$((60 * {}))\n",
            config.max_duration_minutes
        ));
    }

    script.push_str(&format!("\necho \"Run 1 of $RUNS\"\n{}\n", command));
    if total < 2 {
        return script;
    }

    script.push_str("\nfor ((RUN = 2; RUN <= RUNS; RUN++)); do\n");
    script.push_str(&format!(
        "  sleep $(({} * {}))\n",
        config.unit.seconds(),
        config.interval
    ));
    if limited {
        script.push_str("  if [ $SECONDS -ge $MAX_DURATION ]; then\n");
        script.push_str("    echo \"Max duration reached after $((RUN - 1)) of $RUNS runs\"\n");
        script.push_str("    exit 0\n");
        script.push_str("  fi\n");
    }
    script.push_str("  echo \"Run $RUN of $RUNS\"\n");
    script.push_str(&format!("  {}\ndone\n", command));
    script
}

fn suggest_cron(config: &RepetitiveJobConfig, hour: u8, minute: u8) -> (String, String) {
    let step_seconds = config.unit.seconds() * config.interval as u64;

    if config.unit == IntervalUnit::Seconds || step_seconds % 60 != 0 {
        return (
            format!("{} {} * * *", minute, hour),
            "Cron has one-minute resolution; this starts the script once a day and leaves the spacing to it."
                .to_string(),
        );
    }

    let step_minutes = step_seconds / 60;
    if step_minutes < 60 {
        return (
            format!("{}-59/{} {} * * *", minute, step_minutes, hour),
            format!(
                "Approximate: runs every {} minutes until the end of hour {} each day; cron has no repetition count.",
                step_minutes, hour
            ),
        );
    }

    if step_minutes % 60 == 0 && step_minutes / 60 < 24 {
        let step_hours = step_minutes / 60;
        return (
            format!("{} {}-23/{} * * *", minute, hour, step_hours),
            format!(
                "Approximate: runs every {} hour(s) until midnight each day; cron has no repetition count.",
                step_hours
            ),
        );
    }

    (
        format!("{} {} * * *", minute, hour),
        "The interval does not fit a cron step; this starts the script once a day instead.".to_string(),
    )
}

fn explain(config: &RepetitiveJobConfig, start: &str, span_seconds: u64) -> String {
    let mut text = format!(
        "Runs {} time(s) starting at {}, every {} {}",
        config.repetitions, start, config.interval, config.unit
    );
    if config.repetitions > 1 {
        text.push_str(&format!(
            "; the last run starts {} after the first",
            format_span(span_seconds)
        ));
    }
    text.push('.');
    if config.max_duration_minutes > 0 {
        text.push_str(&format!(
            " Stops early once {} minute(s) have elapsed.",
            config.max_duration_minutes
        ));
    }
    text
}

fn format_span(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3_600, (seconds % 3_600) / 60, seconds % 60);
    let mut parts = Vec::new();
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 {
        parts.push(format!("{}m", m));
    }
    if s > 0 || parts.is_empty() {
        parts.push(format!("{}s", s));
    }
    parts.join("")
}
