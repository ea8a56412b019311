//! In-memory history of accepted lines.

/// Chronological list of accepted lines with a recall cursor.
///
/// The cursor sits at `len()` while a fresh line is being edited; recalling
/// moves it towards older entries and back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryLog {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history holding `entries`, with the cursor past the end.
    #[must_use]
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let cursor = entries.len();
        Self { entries, cursor }
    }

    /// Entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current recall position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Appends `line` unless it is blank, then resets the cursor.
    ///
    /// Trailing whitespace is not stored. Returns whether the line was
    /// recorded.
    pub fn push(&mut self, line: &str) -> bool {
        let line = line.trim_end();
        let recorded = !line.trim().is_empty();
        if recorded {
            self.entries.push(line.to_string());
        }
        self.cursor = self.entries.len();
        recorded
    }

    /// Moves one entry back and returns the text to edit.
    pub fn recall_up(&mut self) -> &str {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Moves one entry forward and returns the text to edit; past the newest
    /// entry this is the empty string.
    pub fn recall_down(&mut self) -> &str {
        self.cursor = (self.cursor + 1).min(self.entries.len());
        self.current()
    }

    /// Puts the cursor past the newest entry.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    fn current(&self) -> &str {
        self.entries.get(self.cursor).map_or("", String::as_str)
    }
}
