#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

pub mod models;
pub mod validation;

// Re-export commonly used types
pub use models::{
    CreateNotePayload, FetchNotesParams, Note, NoteTag, NotesPage, ParseTagError,
    DEFAULT_PER_PAGE,
};
pub use validation::{Field, FieldError, NoteDraft, ValidationErrors};
