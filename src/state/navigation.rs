// Navigation history state.
// Browser-like back/forward stack whose entries record the list selection.

use serde::{Deserialize, Serialize};

/// A history entry: the list index selected at that point, and its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Selected list index, `None` for "no city".
    pub index: Option<usize>,
    pub url: String,
}

impl HistoryEntry {
    pub fn new(index: Option<usize>, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    /// Entry for "no city selected".
    pub fn none(url: impl Into<String>) -> Self {
        Self::new(None, url)
    }

    /// State value as the browser stores it: the index, or -1 for none.
    pub fn state(&self) -> i64 {
        self.index
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(-1)
    }
}

/// Session history with a cursor.
///
/// Always holds at least one entry. Pushing drops every entry after the cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl HistoryStack {
    /// Create a history holding only the given entry.
    pub fn new(root: HistoryEntry) -> Self {
        Self {
            entries: vec![root],
            cursor: 0,
        }
    }

    /// The entry the cursor points at.
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// Add a new entry after the current one and move to it.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    /// Overwrite the current entry.
    pub fn replace(&mut self, entry: HistoryEntry) {
        self.entries[self.cursor] = entry;
    }

    /// Move one entry back. Returns the new current entry, or None if at the start.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.can_go_back() {
            self.cursor -= 1;
            Some(self.current())
        } else {
            None
        }
    }

    /// Move one entry forward. Returns the new current entry, or None if at the end.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.can_go_forward() {
            self.cursor += 1;
            Some(self.current())
        } else {
            None
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of entries.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}
