//! Named registrations of one-shot and periodic archiving work

use crate::{ArchiveWorker, RootResolver, MIN_SCHEDULE_INTERVAL};
use archivist_domain::DirectoryHandle;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Owner of the background tasks driving an [`ArchiveWorker`]
///
/// At most one periodic registration exists per name: enqueuing under a name
/// already in use replaces the old registration. Cancelling stops future
/// passes; a pass already running on the blocking pool runs to completion.
///
/// Must be used from within a tokio runtime. Dropping the scheduler cancels
/// everything it registered.
pub struct Scheduler {
    worker: ArchiveWorker,
    periodic: HashMap<String, JoinHandle<()>>,
}

impl Scheduler {
    /// Create a scheduler driving `worker`
    pub fn new(worker: ArchiveWorker) -> Self {
        Self {
            worker,
            periodic: HashMap::new(),
        }
    }

    /// The worker passes are run on
    pub fn worker(&self) -> &ArchiveWorker {
        &self.worker
    }

    /// Run one pass in the background, ignoring run constraints
    pub fn enqueue_once<R>(&self, resolver: Arc<R>) -> JoinHandle<()>
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        let worker = self.worker.clone();
        tokio::spawn(async move {
            // outcome already logged and counted by the worker
            let _ = worker.run_once(resolver).await;
        })
    }

    /// Register periodic passes under `name`, replacing any existing one
    ///
    /// The first pass starts immediately. Intervals below
    /// [`MIN_SCHEDULE_INTERVAL`] are raised to it.
    pub fn enqueue_unique_periodic<R>(&mut self, name: &str, every: Duration, resolver: Arc<R>)
    where
        R: RootResolver,
        <R::Handle as DirectoryHandle>::Error: Display,
    {
        let every = every.max(MIN_SCHEDULE_INTERVAL);

        if let Some(previous) = self.periodic.remove(name) {
            tracing::info!("Replacing periodic archive work '{}'", name);
            previous.abort();
        }

        let worker = self.worker.clone();
        let handle = tokio::spawn(async move {
            worker.periodic(resolver, every).await;
        });

        tracing::info!("Scheduled periodic archive work '{}' every {:?}", name, every);
        self.periodic.insert(name.to_string(), handle);
    }

    /// Cancel the periodic registration `name`
    ///
    /// Returns `false` when nothing was registered under that name.
    pub fn cancel_unique(&mut self, name: &str) -> bool {
        match self.periodic.remove(name) {
            Some(handle) => {
                handle.abort();
                tracing::info!("Cancelled periodic archive work '{}'", name);
                true
            }
            None => false,
        }
    }

    /// Whether a live periodic registration exists under `name`
    pub fn is_scheduled(&self, name: &str) -> bool {
        self.periodic
            .get(name)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Names of all periodic registrations, sorted
    pub fn scheduled_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.periodic.keys().cloned().collect();
        names.sort();
        names
    }

    /// Cancel every periodic registration
    pub fn cancel_all(&mut self) {
        for (name, handle) in self.periodic.drain() {
            handle.abort();
            tracing::debug!("Cancelled periodic archive work '{}'", name);
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
