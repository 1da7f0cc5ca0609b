use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::settings::ErrorRendering;

pub const HELP: &str = "\
commands:
  start                 start (or restart) the live count
  stop                  stop the live count
  pick <YYYY-MM-DD>     show the total for one day
  add <count> [when]    record steps now or at an RFC 3339 instant
  list <YYYY-MM-DD>     list samples recorded on a day
  grant | revoke        allow or deny step count reads
  errors <collapsed|detailed>
                        choose how failures are shown
  status                print presenter state
  help                  show this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Pick(NaiveDate),
    Add {
        count: f64,
        at: Option<DateTime<Utc>>,
    },
    List(NaiveDate),
    Grant,
    Revoke,
    Errors(ErrorRendering),
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" => ConsoleCommand::Start,
            "stop" => ConsoleCommand::Stop,
            "pick" => ConsoleCommand::Pick(parse_day(arg)?),
            "list" => ConsoleCommand::List(parse_day(arg)?),
            "add" => {
                let raw = arg.ok_or_else(|| anyhow!("add needs a step count"))?;
                let count: f64 = raw
                    .parse()
                    .with_context(|| format!("'{raw}' is not a number"))?;
                let at = match words.next() {
                    None | Some("now") => None,
                    Some(when) => Some(
                        DateTime::parse_from_rfc3339(when)
                            .with_context(|| format!("'{when}' is not an RFC 3339 timestamp"))?
                            .with_timezone(&Utc),
                    ),
                };
                ConsoleCommand::Add { count, at }
            }
            "grant" => ConsoleCommand::Grant,
            "revoke" => ConsoleCommand::Revoke,
            "errors" => match arg {
                Some("collapsed") => ConsoleCommand::Errors(ErrorRendering::Collapsed),
                Some("detailed") => ConsoleCommand::Errors(ErrorRendering::Detailed),
                _ => bail!("errors takes 'collapsed' or 'detailed'"),
            },
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };

        Ok(Some(command))
    }
}

fn parse_day(arg: Option<&str>) -> Result<NaiveDate> {
    let raw = arg.ok_or_else(|| anyhow!("expected a date like 2024-03-10"))?;
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("'{raw}' is not a date"))?;
    if !(0..=9999).contains(&day.year()) {
        bail!("'{raw}' is outside years 0000-9999");
    }
    Ok(day)
}
