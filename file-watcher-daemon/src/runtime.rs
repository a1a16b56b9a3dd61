use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::time::Instant;

use file_watcher_core::{evaluate, ChangeEvent, IgnoreList, Trigger, Verdict, WatchConfig};

use crate::error::{io_err, DaemonError};
use crate::source::{
    rename_destination, Classifier, NotificationSource, RawEvent, RENAME_PAIR_WINDOW,
};

/// Start the watch and block the current thread until the first trigger.
pub fn start_blocking(config: WatchConfig) -> Result<Trigger, DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config))
}

/// Watch `config.root` until a non-ignored event arrives and return it.
///
/// Never returns on its own otherwise; the heartbeat keeps logging until the
/// process is signalled.
pub async fn run(config: WatchConfig) -> Result<Trigger, DaemonError> {
    let (source, events) = NotificationSource::start(&config)?;
    tracing::info!(
        "Monitoring File System Activity on: {}",
        source.root().display()
    );

    let heartbeat_handle = {
        let root = config.root.clone();
        let tick = config.tick;
        let interval = config.heartbeat_interval;
        tokio::spawn(async move { heartbeat_task(root, tick, interval).await })
    };

    let result = watch_task(events, &config.ignore).await;
    heartbeat_handle.abort();
    drop(source);
    result
}

async fn watch_task(
    mut events: mpsc::Receiver<RawEvent>,
    ignore: &IgnoreList,
) -> Result<Trigger, DaemonError> {
    let mut classifier = Classifier::default();

    while let Some(event) = events.recv().await {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "watcher event error");
                continue;
            }
        };

        for change in classifier.classify(event) {
            // A triggering `From` half is still decided on its source path; its
            // partner only supplies the destination for the report.
            let trigger = match (change, classifier.pending_rename()) {
                (ChangeEvent::Renamed { from, to: None }, Some(tracker)) => {
                    if ignore.is_ignored(&from) {
                        continue;
                    }
                    let to = await_rename_destination(&mut events, tracker).await;
                    Some(announce(ChangeEvent::Renamed { from, to }))
                }
                (change, _) => handle_event(&change, ignore),
            };
            if let Some(trigger) = trigger {
                return Ok(trigger);
            }
        }
    }

    Err(DaemonError::ChannelClosed("notification source"))
}

async fn await_rename_destination(
    events: &mut mpsc::Receiver<RawEvent>,
    tracker: Option<usize>,
) -> Option<PathBuf> {
    let deadline = Instant::now() + RENAME_PAIR_WINDOW;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(Ok(event))) => return rename_destination(&event, tracker),
            Ok(Some(Err(err))) => {
                tracing::warn!(error = %err, "watcher event error");
            }
            Ok(None) | Err(_) => return None,
        }
    }
}

/// Handle one change: `None` when suppressed, otherwise the trigger to exit on.
pub fn handle_event(event: &ChangeEvent, ignore: &IgnoreList) -> Option<Trigger> {
    match evaluate(event, ignore) {
        Verdict::Suppress => None,
        Verdict::Trigger => Some(announce(event.clone())),
    }
}

/// Log the triggering change and wrap it as the exit signal.
fn announce(event: ChangeEvent) -> Trigger {
    tracing::info!("{event}");
    Trigger::new(event)
}

/// Elapsed-time accumulator for the periodic "still watching" line.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    previous: Instant,
    interval: Duration,
}

impl Heartbeat {
    pub fn new(start: Instant, interval: Duration) -> Self {
        Self {
            previous: start,
            interval,
        }
    }

    /// True once `interval` has elapsed since the last beat; resets the accumulator.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.duration_since(self.previous) >= self.interval {
            self.previous = now;
            true
        } else {
            false
        }
    }
}

async fn heartbeat_task(root: PathBuf, tick: Duration, interval: Duration) {
    let mut heartbeat = Heartbeat::new(Instant::now(), interval);
    loop {
        tokio::time::sleep(tick).await;
        if heartbeat.poll(Instant::now()) {
            tracing::info!("{}", format_heartbeat(Local::now(), &root));
        }
    }
}

pub fn format_heartbeat(now: DateTime<Local>, root: &Path) -> String {
    format!(
        "[{}] monitoring folder: {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        root.display()
    )
}

/// Install the stdout `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .try_init();
}
