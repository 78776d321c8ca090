//! OpenDocument Presentation backend for speaker-notes extraction.
//!
//! Reads `.odp` / `.otp` packages, which are ZIP archives containing XML
//! documents, and pulls the presenter notes out of `content.xml`.

pub mod archive;
pub mod parser;

pub use archive::{read_member, OdpArchive, OdpParts};
pub use parser::{ExtractedNotes, NotesExtractor, OdpParser};
