pub mod store;
pub mod types;

pub use store::{FileNoteStore, InMemoryNoteStore, NoteStore};
pub use types::{Note, NoteCategory};
