//! Background worker running archival passes

use crate::{
    ArchiveConfig, ArchiveError, ArchiveMetrics, Archiver, BatteryNotLow, LogNotifier,
    Notification, Notifier, RunConstraint, Unconstrained,
};
use archivist_domain::{ArchiveReport, DirectoryHandle};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Turns a trigger into a root directory handle
///
/// Resolution happens at the start of every pass, so a folder that became
/// unreachable fails that pass only; the next trigger tries again. Any
/// `Fn() -> Result<D, ArchiveError>` closure is a resolver.
pub trait RootResolver: Send + Sync + 'static {
    /// Handle type produced
    type Handle: DirectoryHandle;

    /// Resolve the root directory for one pass
    fn resolve(&self) -> Result<Self::Handle, ArchiveError>;
}

impl<F, D> RootResolver for F
where
    F: Fn() -> Result<D, ArchiveError> + Send + Sync + 'static,
    D: DirectoryHandle,
{
    type Handle = D;

    fn resolve(&self) -> Result<D, ArchiveError> {
        self()
    }
}

/// Worker that runs the Archiver on demand or on a schedule
///
/// Passes execute on tokio's blocking pool and never overlap: a pass holds
/// the worker's pass lock until it finishes, even if the task awaiting it is
/// cancelled. Cloning a worker shares its lock, notifier and metrics.
///
/// # Examples
///
/// ```no_run
/// use archivist_engine::{ArchiveConfig, ArchiveError, ArchiveWorker};
/// use archivist_store::LocalDirectory;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ArchiveConfig::default();
///     let every = config.schedule_interval();
///     let worker = ArchiveWorker::new(config);
///
///     let resolver = Arc::new(|| {
///         LocalDirectory::open("/home/me/Downloads")
///             .map_err(|e| ArchiveError::RootUnavailable(e.to_string()))
///     });
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(resolver, every).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ArchiveWorker {
    archiver: Arc<Archiver>,
    notifier: Arc<dyn Notifier>,
    constraint: Arc<dyn RunConstraint>,
    metrics: Arc<Mutex<ArchiveMetrics>>,
    pass_lock: Arc<tokio::sync::Mutex<()>>,
}

impl ArchiveWorker {
    /// Create a worker with the given configuration
    ///
    /// Periodic runs are gated on the battery when the configuration asks
    /// for it. Results go to the tracing log until another notifier is set.
    pub fn new(config: ArchiveConfig) -> Self {
        let constraint: Arc<dyn RunConstraint> = if config.require_battery_not_low {
            Arc::new(BatteryNotLow::new(config.min_battery_percent))
        } else {
            Arc::new(Unconstrained)
        };

        Self {
            archiver: Arc::new(Archiver::new(config)),
            notifier: Arc::new(LogNotifier),
            constraint,
            metrics: Arc::new(Mutex::new(ArchiveMetrics::new())),
            pass_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(ArchiveConfig::default())
    }

    /// Replace the notifier
    pub fn with_notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Replace the run constraint
    pub fn with_constraint<C: RunConstraint + 'static>(mut self, constraint: C) -> Self {
        self.constraint = Arc::new(constraint);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ArchiveConfig {
        self.archiver.config()
    }

    /// Snapshot of the cumulative metrics
    pub fn metrics(&self) -> ArchiveMetrics {
        self.with_metrics(|metrics| metrics.clone())
    }

    /// Reset the metrics counters
    pub fn reset_metrics(&self) {
        self.with_metrics(ArchiveMetrics::reset);
    }

    fn with_metrics<T>(&self, f: impl FnOnce(&mut ArchiveMetrics) -> T) -> T {
        let mut metrics = self
            .metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut metrics)
    }

    /// Run a single pass now (manual trigger)
    ///
    /// Run constraints do not apply. Waits for any pass already in progress.
    pub async fn run_once<R>(&self, resolver: Arc<R>) -> Result<ArchiveReport, ArchiveError>
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        let guard = Arc::clone(&self.pass_lock).lock_owned().await;
        let archiver = Arc::clone(&self.archiver);
        let started = Instant::now();

        let outcome = tokio::task::spawn_blocking(move || -> Result<ArchiveReport, ArchiveError> {
            let _guard = guard;
            let root = resolver.resolve()?;
            archiver.run(&root)
        })
        .await
        .map_err(|e| ArchiveError::Worker(e.to_string()))
        .and_then(|result| result);

        self.finish(&outcome, started.elapsed());
        outcome
    }

    /// Record and announce the outcome of a pass
    fn finish(&self, outcome: &Result<ArchiveReport, ArchiveError>, elapsed: Duration) {
        match outcome {
            Ok(report) => {
                self.with_metrics(|metrics| metrics.record_pass(report, elapsed));
                if Notification::is_due(report, self.config().notify_when_empty) {
                    self.notifier.notify(&Notification::for_report(report));
                }
            }
            Err(e) => {
                self.with_metrics(|metrics| metrics.record_failure(elapsed));
                tracing::error!("Archive pass failed: {}", e);
            }
        }
    }

    /// One scheduled attempt: `None` when the constraint skipped it
    async fn scheduled_pass<R>(&self, resolver: &Arc<R>) -> Option<Result<ArchiveReport, ArchiveError>>
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        if !self.constraint.permits() {
            tracing::info!(
                "Skipping scheduled archive pass: {} not met",
                self.constraint.describe()
            );
            self.with_metrics(ArchiveMetrics::record_skip);
            return None;
        }

        Some(self.run_once(Arc::clone(resolver)).await)
    }

    /// Run scheduled passes forever, the first one immediately
    ///
    /// Pass failures are logged and the schedule continues.
    pub async fn periodic<R>(&self, resolver: Arc<R>, every: Duration)
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        let mut ticker = interval(every.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            tracing::debug!("Starting scheduled archive pass");
            let _ = self.scheduled_pass(&resolver).await;
        }
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    pub async fn run<R>(&self, resolver: Arc<R>, every: Duration) -> Result<(), ArchiveError>
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        self.run_until(resolver, every, async {
            tokio::signal::ctrl_c()
                .await
                .map_err(|e| ArchiveError::Worker(e.to_string()))
        })
        .await
    }

    /// Run scheduled passes until `shutdown` completes
    ///
    /// A pass interrupted by shutdown still finishes on the blocking pool.
    pub async fn run_until<R, S>(&self, resolver: Arc<R>, every: Duration, shutdown: S) -> Result<(), ArchiveError>
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
        S: std::future::Future<Output = Result<(), ArchiveError>>,
    {
        tracing::info!("Archive worker started (interval: {:?})", every);

        tokio::select! {
            _ = self.periodic(resolver, every) => {}
            signal = shutdown => {
                signal?;
                tracing::info!("Shutdown signal received, stopping archive worker");
            }
        }

        tracing::info!("Archive worker stopped. Final metrics:\n{}", self.metrics().summary());
        Ok(())
    }

    /// Run for a specific number of cycles (useful for testing)
    ///
    /// Stops at the first pass-level failure.
    pub async fn run_cycles<R>(
        &self,
        resolver: Arc<R>,
        every: Duration,
        cycles: usize,
    ) -> Result<(), ArchiveError>
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        let mut ticker = interval(every.max(Duration::from_millis(1)));

        tracing::info!(
            "Archive worker started for {} cycles (interval: {:?})",
            cycles,
            every
        );

        for cycle in 0..cycles {
            ticker.tick().await;

            match self.scheduled_pass(&resolver).await {
                Some(Ok(report)) => {
                    tracing::info!("Cycle {}/{} completed: {}", cycle + 1, cycles, report.summary());
                }
                Some(Err(e)) => {
                    tracing::error!("Cycle {}/{} failed: {}", cycle + 1, cycles, e);
                    return Err(e);
                }
                None => {
                    tracing::debug!("Cycle {}/{} skipped", cycle + 1, cycles);
                }
            }
        }

        tracing::info!("Archive worker finished {} cycles. Final metrics:\n{}", cycles, self.metrics().summary());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_store::MemoryDirectory;

    #[derive(Default, Clone)]
    struct RecordingNotifier {
        seen: Arc<Mutex<Vec<Notification>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: &Notification) {
            self.seen.lock().unwrap().push(notification.clone());
        }
    }

    struct Never;

    impl RunConstraint for Never {
        fn describe(&self) -> String {
            "never".to_string()
        }

        fn permits(&self) -> bool {
            false
        }
    }

    fn memory_root() -> MemoryDirectory {
        let root = MemoryDirectory::new();
        root.add_file("old-a.txt", "a", 0);
        root.add_file("old-b.txt", "b", 0);
        root
    }

    fn resolver_for(root: &MemoryDirectory) -> Arc<impl RootResolver<Handle = MemoryDirectory>> {
        let root = root.clone();
        Arc::new(move || Ok::<_, ArchiveError>(root.clone()))
    }

    fn worker() -> ArchiveWorker {
        ArchiveWorker::new(ArchiveConfig::default()).with_constraint(Unconstrained)
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = ArchiveWorker::default_config();
        assert_eq!(worker.metrics().pass_count, 0);
        assert_eq!(worker.config().schedule_name, "AUTO_ARCHIVE");
    }

    #[tokio::test]
    async fn test_run_once_notifies() {
        let root = memory_root();
        let notifier = RecordingNotifier::default();
        let worker = worker().with_notifier(notifier.clone());

        let report = worker.run_once(resolver_for(&root)).await.unwrap();

        assert_eq!(report.moved_count(), 2);
        let seen = notifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "Automatic archiving");
        assert_eq!(seen[0].body, "2 files archived");
    }

    #[tokio::test]
    async fn test_run_once_ignores_constraint() {
        let root = memory_root();
        let worker = worker().with_constraint(Never);

        let report = worker.run_once(resolver_for(&root)).await.unwrap();
        assert_eq!(report.moved_count(), 2);
    }

    #[tokio::test]
    async fn test_quiet_when_empty_and_configured() {
        let root = MemoryDirectory::new();
        let notifier = RecordingNotifier::default();
        let worker = ArchiveWorker::new(ArchiveConfig {
            notify_when_empty: false,
            ..Default::default()
        })
        .with_constraint(Unconstrained)
        .with_notifier(notifier.clone());

        worker.run_once(resolver_for(&root)).await.unwrap();
        assert!(notifier.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolution_failure_is_recorded() {
        let worker = worker();
        let resolver = Arc::new(|| {
            Err::<MemoryDirectory, _>(ArchiveError::RootUnavailable("revoked".to_string()))
        });

        let err = worker.run_once(resolver).await.unwrap_err();

        assert!(matches!(err, ArchiveError::RootUnavailable(_)));
        assert_eq!(worker.metrics().failed_passes, 1);
        assert_eq!(worker.metrics().pass_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles() {
        let root = memory_root();
        let worker = worker();

        worker
            .run_cycles(resolver_for(&root), Duration::from_secs(60), 2)
            .await
            .unwrap();

        let metrics = worker.metrics();
        assert_eq!(metrics.pass_count, 2);
        assert_eq!(metrics.files_moved, 2);
        assert!(root.file_names().is_empty());
    }

    #[tokio::test]
    async fn test_constraint_skips_cycle() {
        let root = memory_root();
        let worker = worker().with_constraint(Never);

        worker
            .run_cycles(resolver_for(&root), Duration::from_secs(60), 1)
            .await
            .unwrap();

        assert_eq!(worker.metrics().skipped_runs, 1);
        assert_eq!(worker.metrics().pass_count, 0);
        assert_eq!(root.file_names().len(), 2);
    }

    #[tokio::test]
    async fn test_run_cycles_stops_on_failure() {
        let root = memory_root();
        root.deny_create_directory();
        let worker = worker();

        let err = worker
            .run_cycles(resolver_for(&root), Duration::from_secs(60), 3)
            .await
            .unwrap_err();

        assert!(matches!(err, ArchiveError::ArchiveDirectory(_)));
        assert_eq!(worker.metrics().failed_passes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_shutdown() {
        let root = memory_root();
        let worker = worker();

        let shutdown = async {
            tokio::time::sleep(Duration::from_secs(150)).await;
            Ok(())
        };
        worker
            .run_until(resolver_for(&root), Duration::from_secs(60), shutdown)
            .await
            .unwrap();

        // passes at 0s, 60s and 120s
        assert_eq!(worker.metrics().pass_count, 3);
        assert_eq!(worker.metrics().files_moved, 2);
        assert!(root.subdirectory("Archive").unwrap().contains("old-a.txt"));
    }

    #[tokio::test]
    async fn test_run_until_propagates_signal_error() {
        let root = memory_root();
        let worker = worker();

        let shutdown = async { Err(ArchiveError::Worker("no signal handler".to_string())) };
        let err = worker
            .run_until(resolver_for(&root), Duration::from_secs(60), shutdown)
            .await
            .unwrap_err();

        assert_eq!(err, ArchiveError::Worker("no signal handler".to_string()));
    }

    #[tokio::test]
    async fn test_reset_metrics() {
        let root = memory_root();
        let worker = worker();

        worker.run_once(resolver_for(&root)).await.unwrap();
        assert_eq!(worker.metrics().pass_count, 1);

        worker.reset_metrics();
        assert_eq!(worker.metrics().pass_count, 0);
    }
}
