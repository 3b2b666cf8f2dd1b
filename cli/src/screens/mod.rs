pub mod details;
pub mod notes;

pub use details::NoteDetailsScreen;
pub use notes::{Flow, NotesScreen, NotesSettings};
