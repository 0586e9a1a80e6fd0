//! Typed failures raised by the dispatcher, the config loader and the session
//! supervisor.
//!
//! Everything else (the rustic collaborators in particular) reports through
//! plain [`anyhow::Error`].  Callers that need to branch on the kind of
//! failure recover it with `err.downcast_ref::<Error>()`.

use std::path::PathBuf;

/// Failures owned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `up`/`down` accept zero or one directory.
    #[error("need 0 or 1 args, not {count}")]
    Usage { count: usize },

    /// The config file is missing or could not be read.
    #[error("error while reading config {}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file was read but is not valid YAML for [`crate::config::Config`].
    #[error("error while parsing config {}", .path.display())]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The status task failed while being shut down.
    ///
    /// Only reported when the foreground operation itself succeeded.
    #[error("status display failed during shutdown")]
    Drain(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}
