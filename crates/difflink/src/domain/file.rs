use std::collections::HashMap;

use serde::Deserialize;

/// One file changed in the pull request.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Repository-relative path (e.g., `src/main.rs`).
    pub path: String,
    /// Base link to the file's diff section, without a line anchor.
    pub url: String,
}

impl FileEntry {
    /// Creates an entry from a path and its diff URL.
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Run-scoped lookup from file path to its [`FileEntry`].
///
/// Built once from the pull request inventory and read-only afterwards.
/// Paths keep the order in which they first appeared; when the inventory
/// repeats a path, the last entry's URL wins.
#[derive(Clone, Debug, Default)]
pub struct FileSet {
    entries: HashMap<String, FileEntry>,
    order: Vec<String>,
}

impl FileSet {
    /// Builds a set from `entries`, skipping entries with an empty path.
    pub fn from_entries(entries: impl IntoIterator<Item = FileEntry>) -> Self {
        let mut file_set = Self::default();

        for entry in entries {
            if entry.path.is_empty() {
                continue;
            }

            if !file_set.entries.contains_key(&entry.path) {
                file_set.order.push(entry.path.clone());
            }
            file_set.entries.insert(entry.path.clone(), entry);
        }

        file_set
    }

    /// Returns the entry registered for `path`.
    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    /// Iterates over known paths in first-seen order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<FileEntry> for FileSet {
    fn from_iter<T: IntoIterator<Item = FileEntry>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}
