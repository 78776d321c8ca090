//! Core domain types, errors, and output formatting for extracting
//! speaker notes from OpenDocument presentations.

pub mod error;
pub mod format;
pub mod types;

pub use error::{Error, Result};
pub use format::NotesFormatter;
pub use types::{DocumentKind, NotesDocument, OutputMode, SlideNotes};
