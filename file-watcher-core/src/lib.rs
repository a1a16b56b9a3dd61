//! file-watcher core library — ignore filter, change events, trigger decision.
//!
//! Public API surface:
//! - [`config`] — watch root resolution, exit codes, timing constants
//! - [`ignore`] — [`IgnoreList`], the case-insensitive substring filter
//! - [`event`] — [`ChangeEvent`] and [`ChangeKind`]
//! - [`trigger`] — [`evaluate`] and the [`Trigger`] returned to the driver
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod event;
pub mod ignore;
pub mod trigger;

pub use config::{WatchConfig, INVALID_PATH_EXIT_CODE, TRIGGER_EXIT_CODE, WATCH_DIR_VAR};
pub use error::ConfigError;
pub use event::{ChangeEvent, ChangeKind};
pub use ignore::IgnoreList;
pub use trigger::{evaluate, Trigger, Verdict};
