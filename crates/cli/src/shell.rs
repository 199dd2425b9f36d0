use anyhow::{bail, Context, Result};
use tracing::debug;

use schedkit_core::config::ZoneDefaults;
use schedkit_engine::{
    HolidaySafeConfig, IntervalUnit, RepetitiveJobConfig, ScheduleType, Session, SessionState,
};

use crate::terminal::Terminal;

const HELP: &str = "\
commands:
  convert <m h d M w> [FROM [TO]]        convert a cron expression between zones
  holiday <type> <HH:MM> [weekends] [holidays]
                                         daily|weekly|monthly|business-days|quarterly
  holidays [add|remove MM-DD]            show or edit the holiday list
  repeat <n> <unit> <runs> <HH:MM> <command...>
                                         script that runs a command repeatedly
  history                                results from this session, newest first
  clear                                  forget this session's results
  exit | quit";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Empty,
    Help,
    Convert {
        cron: String,
        from: Option<String>,
        to: Option<String>,
    },
    Holiday {
        schedule_type: ScheduleType,
        time: String,
        skip_weekends: bool,
        skip_holidays: bool,
    },
    Holidays,
    HolidayAdd(String),
    HolidayRemove(String),
    Repeat {
        interval: u32,
        unit: IntervalUnit,
        repetitions: u32,
        start: String,
        command: String,
    },
    History,
    Clear,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, rest)) = tokens.split_first() else {
            return Ok(Self::Empty);
        };

        match head {
            "help" | "?" => Ok(Self::Help),
            "history" => Ok(Self::History),
            "clear" => Ok(Self::Clear),
            "convert" => {
                if rest.len() < 5 || rest.len() > 7 {
                    bail!("usage: convert <m h d M w> [FROM [TO]]");
                }
                Ok(Self::Convert {
                    cron: rest[..5].join(" "),
                    from: rest.get(5).map(|s| s.to_string()),
                    to: rest.get(6).map(|s| s.to_string()),
                })
            }
            "holiday" => {
                let [kind, time, flags @ ..] = rest else {
                    bail!("usage: holiday <type> <HH:MM> [weekends] [holidays]");
                };
                let mut skip_weekends = false;
                let mut skip_holidays = false;
                for flag in flags {
                    match *flag {
                        "weekends" => skip_weekends = true,
                        "holidays" => skip_holidays = true,
                        other => bail!("unknown holiday option '{}'", other),
                    }
                }
                Ok(Self::Holiday {
                    schedule_type: kind.parse()?,
                    time: time.to_string(),
                    skip_weekends,
                    skip_holidays,
                })
            }
            "holidays" => match rest {
                [] => Ok(Self::Holidays),
                ["add", date] => Ok(Self::HolidayAdd(date.to_string())),
                ["remove", date] => Ok(Self::HolidayRemove(date.to_string())),
                _ => bail!("usage: holidays [add|remove MM-DD]"),
            },
            "repeat" => {
                let [interval, unit, runs, start, command @ ..] = rest else {
                    bail!("usage: repeat <n> <unit> <runs> <HH:MM> <command...>");
                };
                if command.is_empty() {
                    bail!("usage: repeat <n> <unit> <runs> <HH:MM> <command...>");
                }
                Ok(Self::Repeat {
                    interval: interval
                        .parse()
                        .with_context(|| format!("invalid interval '{}'", interval))?,
                    unit: unit.parse()?,
                    repetitions: runs
                        .parse()
                        .with_context(|| format!("invalid repetition count '{}'", runs))?,
                    start: start.to_string(),
                    command: command.join(" "),
                })
            }
            other => bail!("unknown command '{}' (try 'help')", other),
        }
    }
}

/// Run the interactive loop until the user exits.
pub fn run(session: &mut Session, terminal: &Terminal, defaults: &ZoneDefaults) -> Result<()> {
    let settings = session.converter().settings().clone();
    terminal.print_banner(settings.parse_mode.as_str(), settings.offset_source.as_str())?;

    while let Some(line) = terminal.read_input()? {
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                terminal.print_error(&format!("{:#}", e))?;
                continue;
            }
        };
        debug!(?command, "shell command");
        if let Err(e) = execute(session, terminal, defaults, command) {
            terminal.print_error(&format!("{:#}", e))?;
        }
    }
    Ok(())
}

fn execute(
    session: &mut Session,
    terminal: &Terminal,
    defaults: &ZoneDefaults,
    command: ShellCommand,
) -> Result<()> {
    match command {
        ShellCommand::Empty => Ok(()),
        ShellCommand::Help => terminal.print_info(HELP),
        ShellCommand::Convert { cron, from, to } => {
            let from = from.unwrap_or_else(|| defaults.source_zone.clone());
            let to = to.unwrap_or_else(|| defaults.target_zone.clone());
            let record = session.convert(&cron, &from, &to)?;
            terminal.print_conversion(record)
        }
        ShellCommand::Holiday {
            schedule_type,
            time,
            skip_weekends,
            skip_holidays,
        } => {
            let config = HolidaySafeConfig {
                schedule_type,
                time,
                skip_weekends,
                skip_holidays,
                command: String::new(),
            };
            let record = session.plan_holiday_safe(&config)?;
            terminal.print_holiday_schedule(record)
        }
        ShellCommand::Holidays => {
            let dates = session.calendar().dates();
            if dates.is_empty() {
                terminal.print_info("no holidays configured")
            } else {
                terminal.print_info(&dates.join(" "))
            }
        }
        ShellCommand::HolidayAdd(date) => {
            if !session.calendar_mut().add(&date)? {
                terminal.print_info(&format!("{} is already listed", date))?;
            }
            Ok(())
        }
        ShellCommand::HolidayRemove(date) => {
            if !session.calendar_mut().remove(&date)? {
                terminal.print_info(&format!("{} was not listed", date))?;
            }
            Ok(())
        }
        ShellCommand::Repeat {
            interval,
            unit,
            repetitions,
            start,
            command,
        } => {
            let config = RepetitiveJobConfig {
                command,
                start_time: start,
                interval,
                unit,
                repetitions,
                ..RepetitiveJobConfig::default()
            };
            let record = session.plan_repetitive(&config)?;
            terminal.print_repetitive_job(record)
        }
        ShellCommand::History => print_history(session, terminal),
        ShellCommand::Clear => {
            session.clear_history();
            terminal.print_info("history cleared")
        }
    }
}

fn print_history(session: &Session, terminal: &Terminal) -> Result<()> {
    if session.state() == SessionState::Idle {
        return terminal.print_info("no results yet");
    }
    for r in session.conversions().entries() {
        terminal.print_dim(&format!(
            "{}  convert  {} ({} -> {}) => {}",
            r.created_at.format("%H:%M:%S"),
            r.original_cron,
            r.source_timezone,
            r.target_timezone,
            r.converted_cron
        ))?;
    }
    for r in session.holiday_schedules().entries() {
        terminal.print_dim(&format!(
            "{}  holiday  {} {} => {}",
            r.created_at.format("%H:%M:%S"),
            r.schedule_type,
            r.time,
            r.cron
        ))?;
    }
    for r in session.repetitive_jobs().entries() {
        terminal.print_dim(&format!(
            "{}  repeat   {}x every {} {} from {}",
            r.created_at.format("%H:%M:%S"),
            r.repetitions,
            r.interval,
            r.unit,
            r.start_time
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_with_zones() {
        assert_eq!(
            ShellCommand::parse("convert 0 9 * * 1 UTC Asia/Tokyo").unwrap(),
            ShellCommand::Convert {
                cron: "0 9 * * 1".to_string(),
                from: Some("UTC".to_string()),
                to: Some("Asia/Tokyo".to_string()),
            }
        );
    }

    #[test]
    fn convert_needs_five_fields() {
        assert!(ShellCommand::parse("convert 0 9 * *").is_err());
    }

    #[test]
    fn parses_holiday_flags() {
        assert_eq!(
            ShellCommand::parse("holiday monthly 08:15 weekends holidays").unwrap(),
            ShellCommand::Holiday {
                schedule_type: ScheduleType::Monthly,
                time: "08:15".to_string(),
                skip_weekends: true,
                skip_holidays: true,
            }
        );
        assert!(ShellCommand::parse("holiday monthly 08:15 sundays").is_err());
        assert!(ShellCommand::parse("holiday hourly 08:15").is_err());
    }

    #[test]
    fn parses_holiday_list_edits() {
        assert_eq!(ShellCommand::parse("holidays").unwrap(), ShellCommand::Holidays);
        assert_eq!(
            ShellCommand::parse("holidays add 11-28").unwrap(),
            ShellCommand::HolidayAdd("11-28".to_string())
        );
        assert!(ShellCommand::parse("holidays purge").is_err());
    }

    #[test]
    fn parses_repeat_with_multiword_command() {
        assert_eq!(
            ShellCommand::parse("repeat 5 minutes 3 09:00 rsync -a src/ dst/").unwrap(),
            ShellCommand::Repeat {
                interval: 5,
                unit: IntervalUnit::Minutes,
                repetitions: 3,
                start: "09:00".to_string(),
                command: "rsync -a src/ dst/".to_string(),
            }
        );
        assert!(ShellCommand::parse("repeat 5 minutes 3 09:00").is_err());
        assert!(ShellCommand::parse("repeat five minutes 3 09:00 ls").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), ShellCommand::Empty);
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    #[test]
    fn execute_records_history() {
        let mut session = Session::default();
        let terminal = Terminal::new();
        let defaults = ZoneDefaults::default();

        let command = ShellCommand::parse("convert 0 9 * * 1").unwrap();
        execute(&mut session, &terminal, &defaults, command).unwrap();
        let latest = session.conversions().latest().unwrap();
        assert_eq!(latest.target_timezone, "America/New_York");
        assert_eq!(latest.converted_cron, "0 4 1 1 0");

        execute(&mut session, &terminal, &defaults, ShellCommand::Clear).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn execute_rejects_bad_holiday_date() {
        let mut session = Session::default();
        let terminal = Terminal::new();
        let defaults = ZoneDefaults::default();
        let result = execute(
            &mut session,
            &terminal,
            &defaults,
            ShellCommand::HolidayAdd("02-30".to_string()),
        );
        assert!(result.is_err());
    }
}
