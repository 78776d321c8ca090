//! Domain types for representing extracted speaker notes.

use serde::{Deserialize, Serialize};

/// MIME type declared by an OpenDocument Presentation (.odp).
pub const MIME_PRESENTATION: &str = "application/vnd.oasis.opendocument.presentation";

/// MIME type declared by an OpenDocument Presentation template (.otp).
pub const MIME_PRESENTATION_TEMPLATE: &str =
    "application/vnd.oasis.opendocument.presentation-template";

/// The kind of document named by the package's `mimetype` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// A regular presentation.
    Presentation,
    /// A presentation template.
    PresentationTemplate,
}

impl DocumentKind {
    /// Match a MIME declaration against the recognized presentation subtypes.
    ///
    /// Comparison is exact apart from surrounding whitespace.
    pub fn from_mimetype(mimetype: &str) -> Option<Self> {
        match mimetype.trim() {
            MIME_PRESENTATION => Some(Self::Presentation),
            MIME_PRESENTATION_TEMPLATE => Some(Self::PresentationTemplate),
            _ => None,
        }
    }

    /// The MIME type string for this kind.
    pub fn mimetype(&self) -> &'static str {
        match self {
            Self::Presentation => MIME_PRESENTATION,
            Self::PresentationTemplate => MIME_PRESENTATION_TEMPLATE,
        }
    }
}

/// How extracted notes are wrapped on output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Each page bracketed by `<!-- page N start -->` / `<!-- page N end -->`.
    #[default]
    Bracketed,
    /// The whole output wrapped once in a single SSML `<speak>` element.
    SpeechMarkup,
}

/// Speaker notes of a single slide page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideNotes {
    /// 1-based page number.
    pub number: usize,

    /// Non-empty notes paragraphs, in document order.
    pub paragraphs: Vec<String>,
}

impl SlideNotes {
    /// Create an empty notes entry for the given page.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            paragraphs: Vec::new(),
        }
    }

    /// Append a notes paragraph.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.paragraphs.push(text.into());
    }
}

/// Speaker notes of a whole presentation, grouped per page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    /// Pages in document order, including pages without notes.
    pub slides: Vec<SlideNotes>,
}

impl NotesDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to the document.
    pub fn add_slide(&mut self, slide: SlideNotes) {
        self.slides.push(slide);
    }

    /// All notes paragraphs, flattened in document order.
    pub fn all_paragraphs(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.paragraphs.iter().map(String::as_str))
            .collect()
    }
}
