//! Output markers for extracted notes.
//!
//! In bracketed mode every page gets its own start and end comment. In
//! speech-markup mode the whole output is wrapped once in an SSML
//! `<speak>` document and pages carry no markers.

use crate::types::{NotesDocument, OutputMode};

/// XML declaration opening a speech-markup document.
pub const SPEECH_XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Root element opening a speech-markup document.
pub const SPEECH_ROOT_START: &str =
    r#"<speak version="1.1" xmlns="http://www.w3.org/2001/10/synthesis">"#;

/// Root element closing a speech-markup document.
pub const SPEECH_ROOT_END: &str = "</speak>";

/// Formatter producing the marker lines around extracted notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotesFormatter {
    mode: OutputMode,
}

impl NotesFormatter {
    /// Create a formatter for the given output mode.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Lines emitted once before anything else.
    pub fn prologue(&self) -> Vec<String> {
        match self.mode {
            OutputMode::Bracketed => Vec::new(),
            OutputMode::SpeechMarkup => vec![
                SPEECH_XML_DECLARATION.to_string(),
                SPEECH_ROOT_START.to_string(),
            ],
        }
    }

    /// Lines emitted once after everything else.
    pub fn epilogue(&self) -> Vec<String> {
        match self.mode {
            OutputMode::Bracketed => Vec::new(),
            OutputMode::SpeechMarkup => vec![SPEECH_ROOT_END.to_string()],
        }
    }

    /// Marker opening the given 1-based page, if the mode has one.
    pub fn page_start(&self, page: usize) -> Option<String> {
        match self.mode {
            OutputMode::Bracketed => Some(format!("<!-- page {} start -->", page)),
            OutputMode::SpeechMarkup => None,
        }
    }

    /// Marker closing the given 1-based page, if the mode has one.
    pub fn page_end(&self, page: usize) -> Option<String> {
        match self.mode {
            OutputMode::Bracketed => Some(format!("<!-- page {} end -->", page)),
            OutputMode::SpeechMarkup => None,
        }
    }

    /// Render grouped notes into the full output line sequence.
    ///
    /// Produces the same lines the streaming extractor emits for a
    /// well-formed document.
    pub fn render(&self, document: &NotesDocument) -> Vec<String> {
        let mut lines = self.prologue();

        for slide in &document.slides {
            lines.extend(self.page_start(slide.number));
            lines.extend(slide.paragraphs.iter().cloned());
            lines.extend(self.page_end(slide.number));
        }

        lines.extend(self.epilogue());
        lines
    }
}
