//! Case-insensitive substring filter over watched paths.

use std::path::Path;

/// Entries suppressed out of the box: profile caches, temp folders and the
/// registry hive that Windows rewrites constantly.
pub const DEFAULT_IGNORES: &[&str] = &[r"\AppData\", r"\temp\", "ntuser.dat", ".tmp"];

/// Immutable list of lowercase substrings; a path containing any of them is ignored.
///
/// `\` and `/` compare equal, in entries and in candidate paths alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    entries: Vec<String>,
}

impl IgnoreList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| normalize(entry.as_ref()))
                .collect(),
        }
    }

    /// Normalized entries, in construction order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// First entry contained in `path`, if any.
    pub fn matching_entry(&self, path: &str) -> Option<&str> {
        let path = normalize(path);
        self.entries
            .iter()
            .find(|entry| path.contains(entry.as_str()))
            .map(String::as_str)
    }

    /// Whether events on `path` should be suppressed. Logs the suppressed path.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        match self.matching_entry(&path) {
            Some(entry) => {
                tracing::info!(entry, "Ignoring file: {}", path.to_lowercase());
                true
            }
            None => false,
        }
    }
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORES)
    }
}

fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('\\', "/")
}
