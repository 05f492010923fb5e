//! Archivist CLI library.
//!
//! This library provides the core functionality for the `archivist` command-line
//! interface, including configuration management, command execution, and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use notify::TerminalNotifier;
pub use output::Formatter;
