//! Notification source: a recursive `notify` watcher feeding a bounded channel,
//! and the mapping from raw backend events to [`ChangeEvent`]s.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use file_watcher_core::{ChangeEvent, ChangeKind, WatchConfig};

use crate::error::DaemonError;

pub type RawEvent = notify::Result<Event>;

/// How long a triggering `From` half waits for its `To`/`Both` partner.
pub const RENAME_PAIR_WINDOW: Duration = Duration::from_millis(250);

/// Live recursive watch over one directory. Events stop when this is dropped.
pub struct NotificationSource {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl NotificationSource {
    /// Watch `config.root` recursively with no filename filter.
    pub fn start(config: &WatchConfig) -> Result<(Self, mpsc::Receiver<RawEvent>), DaemonError> {
        let (event_tx, event_rx) = mpsc::channel::<RawEvent>(config.event_buffer);

        // Callbacks run on the backend's own thread, outside the tokio runtime.
        let mut watcher = recommended_watcher(move |event: RawEvent| {
            if event_tx.blocking_send(event).is_err() {
                tracing::debug!("event receiver dropped; discarding notification");
            }
        })?;
        watcher.watch(&config.root, RecursiveMode::Recursive)?;
        tracing::debug!(
            path = %config.root.display(),
            buffer = config.event_buffer,
            "recursive watch established",
        );

        Ok((
            Self {
                _watcher: watcher,
                root: config.root.clone(),
            },
            event_rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Turns raw backend events into [`ChangeEvent`]s.
///
/// Backends that split a rename into `From`/`To` halves (and inotify, which
/// follows them with `Both`) get the rename decided once, on the `From` half.
/// A `To` with no matching `From` is a move into the tree and reads as a create.
#[derive(Debug, Default)]
pub struct Classifier {
    pending_from: Option<Option<usize>>,
}

impl Classifier {
    pub fn classify(&mut self, event: Event) -> Vec<ChangeEvent> {
        let tracker = event.tracker();
        let Event { kind, paths, .. } = event;

        if let EventKind::Modify(ModifyKind::Name(mode)) = kind {
            return self.classify_rename(mode, tracker, paths);
        }

        self.pending_from = None;
        let Some(kind) = change_kind(&kind) else {
            tracing::trace!(?kind, "not a change; dropped");
            return Vec::new();
        };
        paths
            .into_iter()
            .map(|path| ChangeEvent::Changed { kind, path })
            .collect()
    }

    /// Tracker of the last `From` half still waiting for its partner.
    pub fn pending_rename(&self) -> Option<Option<usize>> {
        self.pending_from
    }

    fn classify_rename(
        &mut self,
        mode: RenameMode,
        tracker: Option<usize>,
        paths: Vec<PathBuf>,
    ) -> Vec<ChangeEvent> {
        match mode {
            RenameMode::From => {
                self.pending_from = Some(tracker);
                paths
                    .into_iter()
                    .map(|from| ChangeEvent::renamed(from, None))
                    .collect()
            }
            RenameMode::To => {
                if self.pending_from == Some(tracker) {
                    return Vec::new();
                }
                self.pending_from = None;
                paths.into_iter().map(ChangeEvent::created).collect()
            }
            RenameMode::Both => {
                if self.pending_from.take() == Some(tracker) {
                    return Vec::new();
                }
                let mut paths = paths.into_iter();
                match paths.next() {
                    Some(from) => vec![ChangeEvent::renamed(from, paths.next())],
                    None => Vec::new(),
                }
            }
            // FSEvents reports each side of a rename as its own `Any` event
            // with no tracker, so the destination half is filtered on its own.
            RenameMode::Any | RenameMode::Other => {
                self.pending_from = None;
                paths
                    .into_iter()
                    .map(|from| ChangeEvent::renamed(from, None))
                    .collect()
            }
        }
    }
}

/// Destination path when `event` completes the rename started with `tracker`.
pub fn rename_destination(event: &Event, tracker: Option<usize>) -> Option<PathBuf> {
    if event.tracker() != tracker {
        return None;
    }
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.first().cloned(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.get(1).cloned(),
        _ => None,
    }
}

fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Deleted),
        EventKind::Modify(_) | EventKind::Any => Some(ChangeKind::Modified),
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => Some(ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Other => None,
    }
}
