//! Line commands for the interactive `session` mode.

use client_core::Field;
use shared::domain::EnvelopeNumber;

pub const HELP: &str = "\
commands:
  list               show available envelopes
  select <number>    pick an envelope to sponsor
  name <text>        set your name
  email <text>       set your email
  address <text>     set your mailing address
  show               show the current draft
  submit             sponsor the selected envelope
  quit               leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Select(EnvelopeNumber),
    Set(Field, String),
    Show,
    Submit,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => SessionCommand::List,
        "select" | "pick" => {
            let number = rest
                .trim_start_matches('#')
                .parse::<i64>()
                .map_err(|_| format!("expected an envelope number, got '{rest}'"))?;
            SessionCommand::Select(EnvelopeNumber(number))
        }
        "name" => SessionCommand::Set(Field::Name, rest.to_string()),
        "email" => SessionCommand::Set(Field::Email, rest.to_string()),
        "address" => SessionCommand::Set(Field::Address, rest.replace("\\n", "\n")),
        "show" => SessionCommand::Show,
        "submit" | "sponsor" => SessionCommand::Submit,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}
