use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

use schedkit_engine::{HolidaySafeSchedule, RepetitiveJob, ScheduleConversionRecord, ZoneInfo};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const CRON: Color = Color::Cyan;
    const LABEL: Color = Color::Yellow;
    const SCRIPT: Color = Color::DarkGreen;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Renders engine results and reads shell input.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the shell banner.
    pub fn print_banner(&self, parse_mode: &str, offsets: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("schedkit"),
            ResetColor,
            Print(" - schedule expression workbench\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Parsing: {} | Offsets: {}\n", parse_mode, offsets)),
            Print("Type 'help' for commands, 'exit' or 'quit' to leave.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Read a line of user input with prompt.
    /// Returns None if the user wants to exit or stdin is closed.
    pub fn read_input(&self) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::PROMPT),
            Print("schedkit> "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let trimmed = input.trim().to_string();

        if trimmed == "exit" || trimmed == "quit" {
            return Ok(None);
        }

        Ok(Some(trimmed))
    }

    fn print_field(&self, label: &str, value: &str, color: Color) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::LABEL),
            Print(format!("{:<12}", label)),
            SetForegroundColor(color),
            Print(value),
            ResetColor,
            Print("\n"),
        )?;
        Ok(())
    }

    fn print_script(&self, script: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::SCRIPT),
            Print(script),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_conversion(&self, record: &ScheduleConversionRecord) -> Result<()> {
        self.print_field("original", &record.original_cron, Colors::CRON)?;
        self.print_field(
            "zones",
            &format!("{} -> {}", record.source_timezone, record.target_timezone),
            Color::Reset,
        )?;
        self.print_field("converted", &record.converted_cron, Colors::CRON)?;
        self.print_field("explain", &record.explanation, Color::Reset)
    }

    pub fn print_holiday_schedule(&self, record: &HolidaySafeSchedule) -> Result<()> {
        self.print_field("cron", &record.cron, Colors::CRON)?;
        self.print_field("explain", &record.explanation, Color::Reset)?;
        self.print_field("script", "", Color::Reset)?;
        self.print_script(&record.script)
    }

    pub fn print_repetitive_job(&self, record: &RepetitiveJob) -> Result<()> {
        self.print_field("explain", &record.explanation, Color::Reset)?;
        self.print_field("at", &record.at_command, Colors::CRON)?;
        self.print_field("cron", &record.cron_suggestion, Colors::CRON)?;
        self.print_field("script", "", Color::Reset)?;
        self.print_script(&record.script)
    }

    pub fn print_zones(&self, zones: &[ZoneInfo]) -> Result<()> {
        for zone in zones {
            self.print_field(
                &zone.offset_display(),
                &format!("{:<22} {}", zone.name, zone.label),
                Color::Reset,
            )?;
        }
        Ok(())
    }

    /// Print a dimmed list line, e.g. preview times or history rows.
    pub fn print_dim(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("  {}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("error: {}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Print an informational message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Print(format!("{}\n", msg)))?;
        Ok(())
    }

    /// Print any serializable value as pretty JSON.
    pub fn print_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.print_info(&json)
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}
