//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Archivist CLI - Move files nobody touched in a while into an Archive folder.
#[derive(Debug, Parser)]
#[command(name = "archivist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ARCHIVIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (archived names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Archive old files once, right now
    Run(RunArgs),

    /// Archive old files periodically until interrupted
    Watch(WatchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Folder to archive (path or file:// URI); defaults to the configured root
    pub dir: Option<String>,

    /// Archive files older than this many minutes
    #[arg(short = 'm', long)]
    pub older_than_minutes: Option<u64>,

    /// Report what would be archived without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Folder to archive (path or file:// URI); defaults to the configured root
    pub dir: Option<String>,

    /// Hours between passes (at least 15 minutes apart)
    #[arg(short, long)]
    pub interval_hours: Option<u64>,

    /// Run even when the battery is low
    #[arg(long)]
    pub ignore_battery: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Remember the folder to archive
    SetRoot {
        /// Folder path or file:// URI
        dir: String,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    /// Whether the command needs the existing configuration file parsed
    ///
    /// `config init` and `config path` must keep working when the file is
    /// unreadable, since they are how it gets repaired.
    pub fn reads_config(&self) -> bool {
        !matches!(
            self,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { .. } | ConfigAction::Path,
            })
        )
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
