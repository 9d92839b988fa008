use crate::error::{DashboardError, Result};
use crate::models::DriveMode;

/// One parsed line of operator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Autopilot(bool),
    Mode(DriveMode),
    /// Raw requested speed; range checking happens at dispatch.
    Speed(f64),
    Stop,
    Detail(bool),
    Clear,
    Help,
    Quit,
    Empty,
}

pub const HELP_TEXT: &[(&str, &str)] = &[
    ("auto <on|off>", "toggle autopilot"),
    ("mode <manual|assisted|autonomous>", "switch drive mode"),
    ("speed <0-120>", "set target speed in km/h"),
    ("stop", "emergency stop"),
    ("detail <on|off>", "toggle detailed display"),
    ("clear", "clear the screen"),
    ("help", "show this list"),
    ("quit | exit", "stop the vehicle and leave"),
];

fn parse_switch(command: &'static str, value: Option<&str>) -> Result<bool> {
    match value {
        None => Err(DashboardError::MissingArgument { command }),
        Some("on" | "true" | "1") => Ok(true),
        Some("off" | "false" | "0") => Ok(false),
        Some(other) => Err(DashboardError::InvalidArgument {
            command,
            value: other.to_string(),
        }),
    }
}

/// Parses a single command line. Verbs are case-insensitive; extra trailing
/// words are ignored.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Empty);
    };
    let arg = words.next();

    match verb.to_ascii_lowercase().as_str() {
        "auto" => parse_switch("auto", arg).map(Command::Autopilot),
        "mode" => {
            let value = arg.ok_or(DashboardError::MissingArgument { command: "mode" })?;
            value
                .parse::<DriveMode>()
                .map(Command::Mode)
                .map_err(|_| DashboardError::InvalidArgument {
                    command: "mode",
                    value: value.to_string(),
                })
        }
        "speed" => {
            let value = arg.ok_or(DashboardError::MissingArgument { command: "speed" })?;
            value
                .parse::<f64>()
                .map(Command::Speed)
                .map_err(|_| DashboardError::InvalidArgument {
                    command: "speed",
                    value: value.to_string(),
                })
        }
        "stop" => Ok(Command::Stop),
        "detail" => parse_switch("detail", arg).map(Command::Detail),
        "clear" => Ok(Command::Clear),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(DashboardError::UnknownCommand(verb.to_string())),
    }
}
