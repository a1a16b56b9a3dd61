//! Error types for file-watcher-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the watch configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment variable naming the watch directory is unset or empty.
    #[error("Invalid path: environment variable {var} is not set")]
    MissingVar { var: &'static str },

    /// The resolved watch directory does not exist or is not a directory.
    #[error("Invalid path: {}", path.display())]
    InvalidPath { path: PathBuf },
}
