use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the watch runtime and its notification source.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
