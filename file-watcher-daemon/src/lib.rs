//! Watch runtime: notify-backed source + event handler + heartbeat.

mod error;
pub mod source;
mod runtime;

pub use error::DaemonError;
pub use runtime::{
    format_heartbeat, handle_event, init_tracing, run, start_blocking, Heartbeat,
};
pub use source::{rename_destination, Classifier, NotificationSource, RENAME_PAIR_WINDOW};
