use notehub_core::{FetchNotesParams, Note, NotesPage};

pub mod cache;
pub mod debounce;

use cache::DEFAULT_GC_TIME;
pub use cache::{DehydratedState, QueryCache, QueryStatus};
pub use debounce::{Debounce, DEFAULT_DEBOUNCE};

/// Session-wide caches for the notes list and single notes
#[derive(Default)]
pub struct QueryClient {
    pub notes: QueryCache<FetchNotesParams, NotesPage>,
    pub note: QueryCache<String, Note>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every list query stale after a mutation.
    pub fn invalidate_notes(&self) -> usize {
        self.notes.invalidate(|_| true)
    }

    pub fn forget_note(&self, id: &str) {
        self.note.remove(|key| key == id);
    }

    pub fn gc(&self) {
        self.notes.gc(DEFAULT_GC_TIME);
        self.note.gc(DEFAULT_GC_TIME);
    }
}
