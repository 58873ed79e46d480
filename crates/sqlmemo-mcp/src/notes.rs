//! Append-only insight log behind the `memo://insights` resource.

/// Ordered, append-only sequence of notes.
///
/// Owned by the dispatcher's state; never shared and never persisted.
#[derive(Debug, Default, Clone)]
pub struct NoteLog {
    entries: Vec<String>,
}

impl NoteLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one note at the end.
    pub fn append(&mut self, note: impl Into<String>) {
        self.entries.push(note.into());
    }

    /// All notes in append order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Notes joined by newline, as served to readers.
    pub fn joined(&self) -> String {
        self.entries.join("\n")
    }
}
