//! Archivist CLI - Move old files into an Archive folder.

use archivist_cli::commands;
use archivist_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> archivist_cli::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, RUST_LOG overrides)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let mut config = if cli.command.reads_config() {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
        Command::Watch(args) => commands::execute_watch(args, &config, &formatter).await?,
        Command::Config(args) => {
            commands::execute_config(args, &mut config, &config_path, &formatter).await?
        }
    }

    Ok(())
}
