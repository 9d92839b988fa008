pub mod commands;

pub use commands::{parse_command, Command, HELP_TEXT};
