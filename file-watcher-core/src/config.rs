//! Watch configuration: where to watch, how to report, and how to exit.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::ignore::IgnoreList;

/// Environment variable holding the directory to watch.
#[cfg(windows)]
pub const WATCH_DIR_VAR: &str = "USERPROFILE";
#[cfg(not(windows))]
pub const WATCH_DIR_VAR: &str = "HOME";

/// Exit code requested when the first non-ignored event arrives.
///
/// Unix truncates exit statuses to 8 bits, so callers there observe `83`.
pub const TRIGGER_EXIT_CODE: i32 = 80211;

/// Exit code for a missing or nonexistent watch directory.
pub const INVALID_PATH_EXIT_CODE: i32 = 1;

/// Capacity of the channel between the notification source and the handler.
pub const EVENT_BUFFER: usize = 64 * 1024;

pub const TICK: Duration = Duration::from_secs(1);
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the daemon needs to run a single watch.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub root: PathBuf,
    pub ignore: IgnoreList,
    pub event_buffer: usize,
    pub tick: Duration,
    pub heartbeat_interval: Duration,
}

impl WatchConfig {
    /// Build a config for `root` with the built-in ignore list and default timings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: IgnoreList::default(),
            event_buffer: EVENT_BUFFER,
            tick: TICK,
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }

    /// Resolve the watch root from [`WATCH_DIR_VAR`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let root = resolve_watch_root(std::env::var_os(WATCH_DIR_VAR))?;
        Ok(Self::new(root))
    }
}

/// Turn the raw environment value into an absolute, existing directory.
pub fn resolve_watch_root(value: Option<OsString>) -> Result<PathBuf, ConfigError> {
    let value = match value {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ConfigError::MissingVar { var: WATCH_DIR_VAR }),
    };

    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(ConfigError::InvalidPath { path });
    }

    Ok(canonical_or_self(&path))
}

// Backends report canonical paths (e.g. /private/var on macOS), so the root
// announced in logs should match them.
fn canonical_or_self(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
