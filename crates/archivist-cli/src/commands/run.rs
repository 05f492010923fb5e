//! Run command implementation.

use super::local_root;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use archivist_engine::ArchiveWorker;

/// Execute the run command: one manual pass, constraints ignored.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let root = config.resolve_root(args.dir.as_deref())?;

    let mut archive = config.archive.clone();
    if let Some(minutes) = args.older_than_minutes {
        archive.age_threshold_minutes = minutes;
    }
    if args.dry_run {
        archive.dry_run = true;
    }
    archive.validate()?;

    tracing::debug!("Manual archive pass over {} (threshold {})", root, archive.threshold());

    let worker = ArchiveWorker::new(archive);
    let report = worker.run_once(local_root(root.clone())).await?;

    let output = formatter.format_report(&root, &report)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
