//! Speaker-notes extraction from ODP `content.xml`.
//!
//! The content stream is scanned once, front to back. A small state
//! machine tracks the current page, whether we are inside a notes frame
//! (`draw:frame` with `presentation:class="notes"`), and the text of the
//! paragraph being read. Every non-empty notes paragraph becomes one
//! output line.

use crate::archive::{self, OdpParts};
use odp_notes_core::{
    DocumentKind, Error, NotesDocument, NotesFormatter, OutputMode, Result, SlideNotes,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::io::{Read, Seek};
use std::path::Path;

/// ODF namespace URIs.
mod xmlns {
    pub const DRAW: &[u8] = b"urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";
    pub const TEXT: &[u8] = b"urn:oasis:names:tc:opendocument:xmlns:text:1.0";
    pub const PRESENTATION: &[u8] = b"urn:oasis:names:tc:opendocument:xmlns:presentation:1.0";
}

/// `presentation:class` value marking a notes frame.
const NOTES_CLASS: &str = "notes";

/// Upper bound on the spaces a single `text:s` expands to.
const MAX_SPACES: usize = 1024;

/// Elements the extractor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// `draw:page`
    Page,
    /// `draw:frame`
    Frame,
    /// `text:p` or `text:h`
    Paragraph,
    /// `text:s`
    Space,
    /// `text:tab`
    Tab,
    /// `text:line-break`
    LineBreak,
    Other,
}

impl Tag {
    fn classify(ns: &ResolveResult, local_name: &[u8]) -> Self {
        match ns {
            ResolveResult::Bound(Namespace(xmlns::DRAW)) => match local_name {
                b"page" => Self::Page,
                b"frame" => Self::Frame,
                _ => Self::Other,
            },
            ResolveResult::Bound(Namespace(xmlns::TEXT)) => match local_name {
                b"p" | b"h" => Self::Paragraph,
                b"s" => Self::Space,
                b"tab" => Self::Tab,
                b"line-break" => Self::LineBreak,
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }
}

/// Result of extracting notes from one presentation.
#[derive(Debug, Clone)]
pub struct ExtractedNotes {
    /// Kind of document the package declared.
    pub kind: DocumentKind,

    /// Output lines in emission order, markers included.
    pub lines: Vec<String>,

    /// The same notes grouped per page, without markers.
    pub document: NotesDocument,
}

/// Mutable state of a single extraction pass.
#[derive(Debug)]
struct ExtractionState {
    formatter: NotesFormatter,
    page_number: usize,
    in_notes: bool,
    paragraph_depth: usize,
    text_buffer: String,
    /// Next whitespace in character data is dropped (paragraph start, or
    /// right after a collapsed space).
    skip_space: bool,
    /// The buffer ends with a space produced by collapsing.
    trailing_collapsed: bool,
    output_lines: Vec<String>,
    document: NotesDocument,
}

impl ExtractionState {
    fn new(formatter: NotesFormatter) -> Self {
        Self {
            formatter,
            page_number: 0,
            in_notes: false,
            paragraph_depth: 0,
            text_buffer: String::new(),
            skip_space: true,
            trailing_collapsed: false,
            output_lines: formatter.prologue(),
            document: NotesDocument::new(),
        }
    }

    /// Whether character data should currently be collected.
    fn accumulating(&self) -> bool {
        self.in_notes && self.paragraph_depth > 0
    }

    fn start_page(&mut self) {
        if self.in_notes {
            log::warn!(
                "Notes frame on page {} was never closed; resetting",
                self.page_number
            );
        }
        // Also guards against a notes frame leaking out of a broken page.
        self.in_notes = false;

        self.page_number += 1;
        self.output_lines
            .extend(self.formatter.page_start(self.page_number));
        self.document.add_slide(SlideNotes::new(self.page_number));
        log::trace!("Page {} start", self.page_number);
    }

    fn end_page(&mut self) {
        self.output_lines
            .extend(self.formatter.page_end(self.page_number));
        self.in_notes = false;
    }

    fn start_frame(&mut self, is_notes: bool) {
        if is_notes {
            self.in_notes = true;
            self.clear_buffer();
        }
    }

    fn end_frame(&mut self) {
        self.in_notes = false;
    }

    fn start_paragraph(&mut self) {
        self.paragraph_depth += 1;
        self.skip_space = true;
    }

    fn end_paragraph(&mut self) {
        self.paragraph_depth = self.paragraph_depth.saturating_sub(1);

        if !self.in_notes {
            return;
        }

        if self.trailing_collapsed {
            self.text_buffer.pop();
        }
        let text = std::mem::take(&mut self.text_buffer);
        self.clear_buffer();
        if text.trim().is_empty() {
            return;
        }

        self.current_slide().add_paragraph(text.clone());
        self.output_lines.push(text);
    }

    fn clear_buffer(&mut self) {
        self.text_buffer.clear();
        self.skip_space = true;
        self.trailing_collapsed = false;
    }

    /// Append text taken literally (`text:s`, `text:tab`).
    fn push_text(&mut self, text: &str) {
        if self.accumulating() && !text.is_empty() {
            self.text_buffer.push_str(text);
            self.skip_space = false;
            self.trailing_collapsed = false;
        }
    }

    /// Append character data, collapsing XML whitespace runs to one space
    /// and dropping it at the start and end of a paragraph.
    fn push_character_data(&mut self, text: &str) {
        if !self.accumulating() {
            return;
        }

        for c in text.chars() {
            if matches!(c, ' ' | '\t' | '\n' | '\r') {
                if !self.skip_space {
                    self.text_buffer.push(' ');
                    self.skip_space = true;
                    self.trailing_collapsed = true;
                }
            } else {
                self.text_buffer.push(c);
                self.skip_space = false;
                self.trailing_collapsed = false;
            }
        }
    }

    /// Notes outside any page are kept under page 0.
    fn current_slide(&mut self) -> &mut SlideNotes {
        if self.document.slides.is_empty() {
            self.document.add_slide(SlideNotes::new(0));
        }
        let last = self.document.slides.len() - 1;
        &mut self.document.slides[last]
    }

    fn finish(mut self) -> (Vec<String>, NotesDocument) {
        self.output_lines.extend(self.formatter.epilogue());
        log::debug!(
            "Found {} pages, {} notes paragraphs",
            self.page_number,
            self.document.all_paragraphs().len()
        );
        (self.output_lines, self.document)
    }
}

/// Streaming extractor for presentation notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotesExtractor {
    formatter: NotesFormatter,
}

impl NotesExtractor {
    /// Create an extractor emitting markers for the given output mode.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            formatter: NotesFormatter::new(mode),
        }
    }

    /// Extract notes given the package's MIME declaration and content stream.
    ///
    /// Fails with [`Error::UnsupportedFormat`] before looking at the content
    /// when the declaration is not a presentation type.
    pub fn extract(&self, mimetype: &[u8], content: &[u8]) -> Result<ExtractedNotes> {
        let kind = detect_kind(mimetype)?;
        let (lines, document) = self.scan(content)?;

        Ok(ExtractedNotes {
            kind,
            lines,
            document,
        })
    }

    /// Scan a content stream, returning output lines and grouped notes.
    ///
    /// On malformed XML nothing accumulated so far is returned.
    pub fn scan(&self, content: &[u8]) -> Result<(Vec<String>, NotesDocument)> {
        log::debug!("Scanning content stream ({} bytes)", content.len());

        let mut reader = NsReader::from_reader(content);
        reader.expand_empty_elements(true).check_end_names(true);

        let mut state = ExtractionState::new(self.formatter);
        let mut depth = 0usize;
        let mut seen_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    seen_root = true;

                    let (ns, local) = reader.resolve_element(e.name());
                    match Tag::classify(&ns, local.as_ref()) {
                        Tag::Page => state.start_page(),
                        Tag::Frame => {
                            let is_notes = is_notes_frame(&reader, e)?;
                            state.start_frame(is_notes);
                        }
                        Tag::Paragraph => state.start_paragraph(),
                        Tag::Space if state.accumulating() => {
                            let count = space_count(&reader, e)?;
                            state.push_text(&" ".repeat(count));
                        }
                        Tag::Tab => state.push_text("\t"),
                        Tag::LineBreak => state.push_text(" "),
                        Tag::Space | Tag::Other => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    depth = depth.saturating_sub(1);

                    let (ns, local) = reader.resolve_element(e.name());
                    match Tag::classify(&ns, local.as_ref()) {
                        Tag::Page => state.end_page(),
                        Tag::Frame => state.end_frame(),
                        Tag::Paragraph => state.end_paragraph(),
                        _ => {}
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if state.accumulating() {
                        let text = e.unescape().map_err(|err| malformed(&reader, err))?;
                        state.push_character_data(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if state.accumulating() {
                        let raw = e.into_inner();
                        let text =
                            std::str::from_utf8(&raw).map_err(|err| malformed(&reader, err))?;
                        state.push_character_data(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(malformed(&reader, e)),
                _ => {}
            }
        }

        if !seen_root {
            return Err(Error::MalformedDocument("no root element found".to_string()));
        }
        if depth != 0 {
            return Err(Error::MalformedDocument(format!(
                "unexpected end of document with {} unclosed element(s)",
                depth
            )));
        }

        Ok(state.finish())
    }
}

/// Parser for ODP packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdpParser {
    extractor: NotesExtractor,
}

impl OdpParser {
    /// Create a parser for the given output mode.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            extractor: NotesExtractor::new(mode),
        }
    }

    /// Parse an ODP package from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<ExtractedNotes> {
        let OdpParts { mimetype, content } = archive::read_parts(reader)?;
        self.extractor.extract(&mimetype, &content)
    }

    /// Parse an ODP package from a file on disk.
    pub fn parse_file(&self, path: &Path) -> Result<ExtractedNotes> {
        let OdpParts { mimetype, content } =
            archive::OdpArchive::from_path(path)?.into_parts()?;
        self.extractor.extract(&mimetype, &content)
    }
}

/// Match the MIME declaration against the presentation subtypes.
fn detect_kind(mimetype: &[u8]) -> Result<DocumentKind> {
    let declared = String::from_utf8_lossy(mimetype);
    let kind = std::str::from_utf8(mimetype)
        .ok()
        .and_then(DocumentKind::from_mimetype)
        .ok_or_else(|| Error::UnsupportedFormat(declared.trim().to_string()))?;

    log::debug!("Document kind: {:?} ({})", kind, kind.mimetype());
    Ok(kind)
}

/// Whether a `draw:frame` start tag carries `presentation:class="notes"`.
fn is_notes_frame(reader: &NsReader<&[u8]>, e: &BytesStart) -> Result<bool> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        let (ns, local) = reader.resolve_attribute(attr.key);

        if ns == ResolveResult::Bound(Namespace(xmlns::PRESENTATION))
            && local.as_ref() == b"class"
        {
            let value = attr
                .unescape_value()
                .map_err(|err| malformed(reader, err))?;
            return Ok(value == NOTES_CLASS);
        }
    }

    Ok(false)
}

/// Number of spaces a `text:s` element stands for (`text:c`, default 1).
///
/// A `text:c` that is not a non-negative integer also counts as 1; larger
/// counts are capped at `MAX_SPACES`.
fn space_count(reader: &NsReader<&[u8]>, e: &BytesStart) -> Result<usize> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        let (ns, local) = reader.resolve_attribute(attr.key);

        if ns == ResolveResult::Bound(Namespace(xmlns::TEXT)) && local.as_ref() == b"c" {
            let value = attr
                .unescape_value()
                .map_err(|err| malformed(reader, err))?;
            let count = value.trim().parse::<u64>().unwrap_or(1);
            return Ok(count.min(MAX_SPACES as u64) as usize);
        }
    }

    Ok(1)
}

fn malformed(reader: &NsReader<&[u8]>, err: impl std::fmt::Display) -> Error {
    Error::MalformedDocument(format!(
        "XML error at byte {}: {}",
        reader.buffer_position(),
        err
    ))
}
