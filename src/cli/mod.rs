//! Command-line entry points and logging

mod commands;
mod logging;

pub use commands::{run_command, Cli, Command};
pub use logging::{log, LogLevel};
