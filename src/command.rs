//! Terminal command parsing: one line of input → one `Command`.

use crate::state::{Flag, IrProtocol, ParseEnumError};
use crate::transition::Transition;

/// Something the user asked the remote to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Press(Transition),
    OpenSettings,
    CloseSettings,
    SelectProtocol(IrProtocol),
    Ask(String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid temperature delta '{0}'")]
    InvalidDelta(String),
    #[error("invalid protocol: {0}")]
    InvalidProtocol(#[from] ParseEnumError),
}

/// Parse one input line.
///
/// # Errors
///
/// Returns a [`CommandError`] for blank, unknown, or malformed lines.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    if head.is_empty() {
        return Err(CommandError::Empty);
    }

    let press = |t: Transition| -> Result<Command, CommandError> { Ok(Command::Press(t)) };
    match head.to_ascii_lowercase().as_str() {
        "power" | "p" => press(Transition::TogglePower),
        "up" | "+" => press(Transition::AdjustTemperature(1)),
        "down" | "-" => press(Transition::AdjustTemperature(-1)),
        "temp" | "t" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("temp"));
            }
            let delta = rest
                .parse::<i32>()
                .map_err(|_| CommandError::InvalidDelta(rest.to_string()))?;
            press(Transition::AdjustTemperature(delta))
        }
        "mode" | "m" => press(Transition::CycleMode),
        "fan" | "f" => press(Transition::CycleFanSpeed),
        "swing" | "swing-v" => press(Transition::ToggleFlag(Flag::SwingVertical)),
        "swing-h" => press(Transition::ToggleFlag(Flag::SwingHorizontal)),
        "health" => press(Transition::ToggleFlag(Flag::Health)),
        "light" => press(Transition::ToggleFlag(Flag::Light)),
        "sleep" => press(Transition::ToggleFlag(Flag::Sleep)),
        "eco" => press(Transition::ToggleFlag(Flag::EnergySaving)),
        "settings" => Ok(Command::OpenSettings),
        "done" | "close" => Ok(Command::CloseSettings),
        "protocol" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("protocol"));
            }
            Ok(Command::SelectProtocol(parse_protocol(rest)?))
        }
        "ask" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("ask"));
            }
            Ok(Command::Ask(rest.to_string()))
        }
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(head.to_string())),
    }
}

/// Accept a 1-based index into the selection list or any protocol name.
fn parse_protocol(raw: &str) -> Result<IrProtocol, ParseEnumError> {
    if let Ok(index) = raw.parse::<usize>() {
        if let Some(protocol) = index.checked_sub(1).and_then(|i| IrProtocol::ALL.get(i)) {
            return Ok(*protocol);
        }
    }
    raw.parse()
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
