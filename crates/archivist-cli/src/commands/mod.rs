//! Command implementations.

pub mod config;
pub mod run;
pub mod watch;

pub use self::config::execute_config;
pub use self::run::execute_run;
pub use self::watch::execute_watch;

use archivist_engine::{ArchiveError, RootResolver};
use archivist_store::LocalDirectory;
use std::sync::Arc;

/// Resolve `token` afresh at the start of every pass.
pub(crate) fn local_root(token: String) -> Arc<impl RootResolver<Handle = LocalDirectory>> {
    Arc::new(move || {
        LocalDirectory::from_token(&token)
            .map_err(|e| ArchiveError::RootUnavailable(e.to_string()))
    })
}
