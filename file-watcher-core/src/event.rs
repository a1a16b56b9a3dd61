//! Change events as delivered by the notification source.

use std::fmt;
use std::path::{Path, PathBuf};

/// Category of a single-path change. Only used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "changed",
            ChangeKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One filesystem occurrence under the watch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Changed {
        kind: ChangeKind,
        path: PathBuf,
    },
    /// `to` is `None` when the backend only reported the source half.
    Renamed {
        from: PathBuf,
        to: Option<PathBuf>,
    },
}

impl ChangeEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::Changed {
            kind: ChangeKind::Created,
            path: path.into(),
        }
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::Changed {
            kind: ChangeKind::Modified,
            path: path.into(),
        }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::Changed {
            kind: ChangeKind::Deleted,
            path: path.into(),
        }
    }

    pub fn renamed(from: impl Into<PathBuf>, to: Option<PathBuf>) -> Self {
        Self::Renamed {
            from: from.into(),
            to,
        }
    }

    /// The path the ignore filter is consulted on.
    ///
    /// For renames this is the previous path only; the destination is never
    /// filtered.
    pub fn filter_path(&self) -> &Path {
        match self {
            ChangeEvent::Changed { path, .. } => path,
            ChangeEvent::Renamed { from, .. } => from,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::Changed { kind, path } => {
                write!(f, "File {kind}: {}", path.display())
            }
            ChangeEvent::Renamed {
                from,
                to: Some(to),
            } => write!(f, "File: {} renamed to {}", from.display(), to.display()),
            ChangeEvent::Renamed { from, to: None } => {
                write!(f, "File: {} renamed", from.display())
            }
        }
    }
}
