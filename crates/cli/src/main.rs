mod cli;
mod config;
mod shell;
mod terminal;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use schedkit_core::{config::load_dotenv, Config, MinuteHandling, OffsetSource, ParseMode};
use schedkit_engine::scheduler::upcoming;
use schedkit_engine::{
    HolidayCalendar, HolidaySafeConfig, RepetitiveJobConfig, Session, ZONES,
};

use crate::cli::{CliArgs, Command, ConvertArgs, HolidayArgs, RepeatArgs};
use crate::config::CliConfig;
use crate::terminal::Terminal;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let terminal = Terminal::new();

    // Layer config: environment, then file, then flags
    load_dotenv();
    let file_config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    let config = apply_flags(file_config.apply(Config::from_env()), &args);
    config.log_summary();

    let mut session = Session::new(config.engine.clone(), config.history_limit);
    for date in &file_config.holidays {
        session
            .calendar_mut()
            .add(date)
            .with_context(|| format!("invalid holiday in config file: {}", date))?;
    }

    match args.command {
        Command::Convert(ref convert) => run_convert(&mut session, &terminal, &config, convert, args.json),
        Command::Holiday(ref holiday) => {
            run_holiday(&mut session, &terminal, &file_config, holiday, args.json)
        }
        Command::Repeat(ref repeat) => run_repeat(&mut session, &terminal, repeat, args.json),
        Command::Zones => {
            if args.json {
                terminal.print_json(ZONES)
            } else {
                terminal.print_zones(ZONES)
            }
        }
        Command::Shell => {
            info!(profile = %config.profile_label(), "starting interactive shell");
            shell::run(&mut session, &terminal, &config.defaults)
        }
    }
}

/// Command-line flags win over file and environment settings.
fn apply_flags(mut config: Config, args: &CliArgs) -> Config {
    if args.strict {
        config.engine.parse_mode = ParseMode::Strict;
    }
    if args.iana {
        config.engine.offset_source = OffsetSource::Iana;
    }
    if args.carry_minutes {
        config.engine.minute_handling = MinuteHandling::Carry;
    }
    if args.year.is_some() {
        config.engine.reference_year = args.year;
    }
    config
}

fn run_convert(
    session: &mut Session,
    terminal: &Terminal,
    config: &Config,
    args: &ConvertArgs,
    json: bool,
) -> Result<()> {
    let from = args.from.as_deref().unwrap_or(&config.defaults.source_zone);
    let to = args.to.as_deref().unwrap_or(&config.defaults.target_zone);
    let record = session.convert(&args.cron, from, to)?;

    let preview = if args.preview > 0 {
        upcoming(&record.converted_cron, Utc::now(), args.preview)
            .context("converted expression cannot be previewed")?
    } else {
        Vec::new()
    };

    if json {
        return terminal.print_json(&serde_json::json!({
            "record": record,
            "upcoming": preview,
        }));
    }

    terminal.print_conversion(record)?;
    for at in &preview {
        terminal.print_dim(&at.format("%Y-%m-%d %H:%M UTC").to_string())?;
    }
    Ok(())
}

fn run_holiday(
    session: &mut Session,
    terminal: &Terminal,
    file_config: &CliConfig,
    args: &HolidayArgs,
    json: bool,
) -> Result<()> {
    if args.no_default_holidays {
        *session.calendar_mut() = HolidayCalendar::new();
        for date in &file_config.holidays {
            session.calendar_mut().add(date)?;
        }
    }
    for date in &args.holidays {
        session.calendar_mut().add(date)?;
    }

    let config = HolidaySafeConfig {
        schedule_type: args.schedule_type.parse()?,
        time: args.time.clone(),
        skip_weekends: args.skip_weekends,
        skip_holidays: args.skip_holidays,
        command: args.command.clone(),
    };
    let record = session.plan_holiday_safe(&config)?;

    if json {
        terminal.print_json(record)
    } else {
        terminal.print_holiday_schedule(record)
    }
}

fn run_repeat(session: &mut Session, terminal: &Terminal, args: &RepeatArgs, json: bool) -> Result<()> {
    let config = RepetitiveJobConfig {
        command: args.command.clone(),
        start_time: args.start.clone(),
        interval: args.interval,
        unit: args.unit.parse()?,
        repetitions: args.repetitions,
        max_duration_minutes: args.max_duration,
        script_name: args.script_name.clone(),
    };
    let record = session.plan_repetitive(&config)?;

    if json {
        terminal.print_json(record)
    } else {
        terminal.print_repetitive_job(record)
    }
}
