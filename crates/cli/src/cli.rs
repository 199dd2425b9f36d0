use clap::{Args, Parser, Subcommand};

/// Cron timezone converter and schedule script generator.
///
/// Converts cron expressions between timezones, synthesizes holiday-safe
/// schedules and builds repetitive-job shell scripts.
#[derive(Parser, Debug)]
#[command(name = "schedkit", version, about = "Cron timezone converter and schedule generator")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/schedkit/config.toml)
    #[arg(long, global = true, env = "SCHEDKIT_CONFIG")]
    pub config: Option<String>,

    /// Reject wildcards, out-of-range fields and unknown timezones
    #[arg(long, global = true)]
    pub strict: bool,

    /// Resolve timezones through the IANA database (DST-aware)
    #[arg(long, global = true)]
    pub iana: bool,

    /// Let fractional-hour offsets move the minute field instead of keeping it
    #[arg(long, global = true)]
    pub carry_minutes: bool,

    /// Reference year for month lengths and DST lookups
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a cron expression from one timezone to another
    Convert(ConvertArgs),
    /// Generate a business-day / holiday-safe cron expression and wrapper script
    Holiday(HolidayArgs),
    /// Generate a script that runs a command repeatedly
    Repeat(RepeatArgs),
    /// List the fixed timezone offset table
    Zones,
    /// Interactive session with in-memory history
    Shell,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// 5-field cron expression, e.g. "0 9 * * 1"
    pub cron: String,

    /// Source timezone (default from config)
    #[arg(long)]
    pub from: Option<String>,

    /// Target timezone (default from config)
    #[arg(long)]
    pub to: Option<String>,

    /// Also list the next N run times of the converted expression
    #[arg(long, default_value = "0")]
    pub preview: usize,
}

#[derive(Args, Debug)]
pub struct HolidayArgs {
    /// daily, weekly, monthly, business-days or quarterly
    #[arg(long = "type", default_value = "daily")]
    pub schedule_type: String,

    /// Time of day as HH:MM
    #[arg(long, default_value = "09:00")]
    pub time: String,

    /// Avoid Saturday and Sunday
    #[arg(long)]
    pub skip_weekends: bool,

    /// Emit a holiday check in the wrapper script
    #[arg(long)]
    pub skip_holidays: bool,

    /// Extra holiday as MM-DD (repeatable)
    #[arg(long = "holiday")]
    pub holidays: Vec<String>,

    /// Start from an empty holiday list instead of the common defaults
    #[arg(long)]
    pub no_default_holidays: bool,

    /// Command the wrapper script runs
    #[arg(long, default_value = "")]
    pub command: String,
}

#[derive(Args, Debug)]
pub struct RepeatArgs {
    /// Command to run on each repetition
    #[arg(long)]
    pub command: String,

    /// First run as HH:MM
    #[arg(long, default_value = "09:00")]
    pub start: String,

    /// Interval between runs
    #[arg(long, default_value = "5")]
    pub interval: u32,

    /// seconds, minutes or hours
    #[arg(long, default_value = "minutes")]
    pub unit: String,

    /// Total number of runs
    #[arg(long, default_value = "3")]
    pub repetitions: u32,

    /// Stop after this many minutes (0 = no limit)
    #[arg(long, default_value = "0")]
    pub max_duration: u32,

    /// File name used in the generated `at` command
    #[arg(long, default_value = "repetitive_job.sh")]
    pub script_name: String,
}
