//! Archivist Engine
//!
//! Moves stale files out of a folder into an archive subfolder, on demand or
//! on a schedule.
//!
//! # Overview
//!
//! The engine is responsible for:
//! - **Archive passes**: One linear sweep of a root folder's immediate children
//! - **Moving**: Copy-then-delete transfers that never overwrite and clean up after failure
//! - **Scheduling**: Unique named periodic work gated on run constraints
//! - **Notification**: Reporting each pass to a pluggable [`Notifier`]
//!
//! # Architecture
//!
//! [`Archiver`] is synchronous and generic over
//! [`archivist_domain::DirectoryHandle`], so the same pass runs against the
//! local file system or an in-memory tree. [`ArchiveWorker`] runs passes on
//! tokio's blocking pool, one at a time, and keeps [`ArchiveMetrics`].
//! [`Scheduler`] owns the background tasks.
//!
//! # Usage
//!
//! ## One-time Pass
//!
//! ```no_run
//! use archivist_engine::Archiver;
//! use archivist_store::LocalDirectory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = LocalDirectory::open("/home/me/Downloads")?;
//! let archiver = Archiver::default_config();
//!
//! let report = archiver.run(&root)?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Scheduled Work
//!
//! ```no_run
//! use archivist_engine::{ArchiveConfig, ArchiveError, ArchiveWorker, Scheduler};
//! use archivist_store::LocalDirectory;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ArchiveConfig::default();
//!     let name = config.schedule_name.clone();
//!     let every = config.schedule_interval();
//!     let mut scheduler = Scheduler::new(ArchiveWorker::new(config));
//!
//!     let resolver = Arc::new(|| {
//!         LocalDirectory::open("/home/me/Downloads")
//!             .map_err(|e| ArchiveError::RootUnavailable(e.to_string()))
//!     });
//!     scheduler.enqueue_unique_periodic(&name, every, resolver);
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     scheduler.cancel_unique(&name);
//! }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use archivist_engine::ArchiveConfig;
//!
//! // Default: 30 day threshold, daily, only on a healthy battery
//! let config = ArchiveConfig::default();
//!
//! // Quick: 1 minute threshold, for trying things out
//! let config = ArchiveConfig::quick();
//!
//! // Lenient: 90 day threshold, weekly, silent when nothing moved
//! let config = ArchiveConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! The engine can be configured via TOML:
//!
//! ```toml
//! [archive]
//! archive_dir_name = "Archive"
//! age_threshold_minutes = 43200
//! schedule_interval_hours = 24
//! schedule_name = "AUTO_ARCHIVE"
//! require_battery_not_low = true
//! min_battery_percent = 15
//! remove_partial_copies = true
//! notify_when_empty = true
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod constraint;
mod engine;
mod error;
mod metrics;
mod mover;
mod notifier;
mod scheduler;
mod worker;

pub use config::{ArchiveConfig, DEFAULT_SCHEDULE_NAME, MIN_SCHEDULE_INTERVAL};
pub use constraint::{BatteryNotLow, RunConstraint, Unconstrained};
pub use engine::Archiver;
pub use error::ArchiveError;
pub use metrics::ArchiveMetrics;
pub use mover::{ArchiveMover, MoveError};
pub use notifier::{LogNotifier, Notification, Notifier, NOTIFICATION_TITLE};
pub use scheduler::Scheduler;
pub use worker::{ArchiveWorker, RootResolver};
