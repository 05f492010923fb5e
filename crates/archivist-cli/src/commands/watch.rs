//! Watch command implementation.

use super::local_root;
use crate::cli::WatchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::notify::TerminalNotifier;
use crate::output::Formatter;
use archivist_engine::{ArchiveWorker, Scheduler};

/// Execute the watch command: periodic passes until Ctrl+C.
pub async fn execute_watch(args: WatchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let root = config.resolve_root(args.dir.as_deref())?;

    let mut archive = config.archive.clone();
    if let Some(hours) = args.interval_hours {
        archive.schedule_interval_hours = hours;
    }
    if args.ignore_battery {
        archive.require_battery_not_low = false;
    }
    archive.validate()?;

    let name = archive.schedule_name.clone();
    let every = archive.schedule_interval();
    let threshold = archive.threshold();

    let worker = ArchiveWorker::new(archive).with_notifier(TerminalNotifier::new(*formatter));
    let mut scheduler = Scheduler::new(worker);
    scheduler.enqueue_unique_periodic(&name, every, local_root(root.clone()));

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Archiving files older than {} in {} every {}m (Ctrl+C to stop)",
            threshold,
            root,
            every.as_secs() / 60
        ))
    );

    tokio::signal::ctrl_c().await?;
    scheduler.cancel_unique(&name);

    tracing::info!("{}", scheduler.worker().metrics().summary());
    eprintln!("{}", formatter.success(&format!("Stopped '{}'", name)));

    Ok(())
}
