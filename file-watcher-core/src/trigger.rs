//! Suppress-or-trigger decision for a single change event.

use std::fmt;

use crate::config::TRIGGER_EXIT_CODE;
use crate::event::ChangeEvent;
use crate::ignore::IgnoreList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Suppress,
    Trigger,
}

/// Decide whether `event` ends the watch.
///
/// Renames are decided on their previous path; a rename out of an ignored
/// location still triggers nothing even if the destination is not ignored,
/// and a rename into an ignored location still triggers.
pub fn evaluate(event: &ChangeEvent, ignore: &IgnoreList) -> Verdict {
    if ignore.is_ignored(event.filter_path()) {
        Verdict::Suppress
    } else {
        Verdict::Trigger
    }
}

/// Termination signal handed back to the process driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub event: ChangeEvent,
}

impl Trigger {
    pub fn new(event: ChangeEvent) -> Self {
        Self { event }
    }

    pub fn exit_code(&self) -> i32 {
        TRIGGER_EXIT_CODE
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.event.fmt(f)
    }
}
