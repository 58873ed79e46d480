//! Process-lifetime state owned by the dispatcher.

use sqlmemo_types::ToolBackend;

use crate::notes::NoteLog;

/// Mutable state handed to every handler.
///
/// Exactly one dispatcher owns it, so handlers get `&mut` access without
/// locking.
pub struct HubState {
    /// Insight notes appended through `append-insight`.
    pub notes: NoteLog,
    /// Relational tool backend.
    pub backend: Box<dyn ToolBackend>,
}

impl HubState {
    /// Creates state with an empty note log.
    pub fn new(backend: Box<dyn ToolBackend>) -> Self {
        Self {
            notes: NoteLog::new(),
            backend,
        }
    }

    /// Gives up the backend so the caller can close it.
    pub fn into_backend(self) -> Box<dyn ToolBackend> {
        self.backend
    }
}

impl std::fmt::Debug for HubState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubState")
            .field("notes", &self.notes)
            .finish_non_exhaustive()
    }
}
