//! hOCR document parser using quick-xml.
//!
//! Node roles come from the `class` attribute. The walk is best-effort:
//! unknown elements are transparent, characters outside a word and words
//! outside a line are dropped, and lines that hang directly off the body
//! (the legacy flat shape) are gathered into a synthetic page so both
//! shapes produce the same `Document -> Page -> Line` tree.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Character, Document, Line, LineKind, NodeRole, Page, Word};
use crate::properties::Properties;

const PAGE_CLASS: &str = "ocr_page";
const WORD_CLASS: &str = "ocrx_word";
const CHAR_CLASS: &str = "ocrx_cinfo";

/// HTML elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// hOCR document parser.
pub struct HocrParser<'a> {
    data: Cow<'a, [u8]>,
}

impl<'a> HocrParser<'a> {
    /// Create a parser over borrowed bytes.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
        }
    }

    /// Parse the bytes into a fresh document tree.
    ///
    /// Input without a single element is not markup and fails with
    /// [`Error::MalformedDocument`].
    pub fn parse(&self) -> Result<Document> {
        let mut reader = Reader::from_reader(self.data.as_ref());
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = false;

        let mut builder = TreeBuilder::default();
        let mut elements = 0usize;
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    elements += 1;
                    if !is_void(e.name()) {
                        builder.open(&e);
                    }
                }
                Ok(Event::Empty(e)) => {
                    elements += 1;
                    if !is_void(e.name()) {
                        builder.open(&e);
                        builder.close();
                    }
                }
                Ok(Event::End(e)) => {
                    if !is_void_end(&e) {
                        builder.close();
                    }
                }
                Ok(Event::Text(e)) => builder.text(&unescape_text(&e)),
                Ok(Event::CData(e)) => builder.text(&String::from_utf8_lossy(&e)),
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::MalformedDocument(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
        }

        if elements == 0 {
            return Err(Error::MalformedDocument(
                "no markup elements found".to_string(),
            ));
        }

        let document = builder.finish();
        log::debug!(
            "Parsed hOCR: {} pages, {} lines, {} words",
            document.page_count(),
            document.line_count(),
            document.word_count()
        );
        Ok(document)
    }
}

impl HocrParser<'static> {
    /// Read an hOCR file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self {
            data: Cow::Owned(data),
        })
    }

    /// Read an hOCR document from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self {
            data: Cow::Owned(data),
        })
    }
}

/// What an open element turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Plain,
    Page,
    Line,
    Word,
    Char,
    Dropped,
}

/// Element attributes relevant to hOCR.
#[derive(Default)]
struct Attrs {
    id: String,
    classes: Vec<String>,
    title: String,
}

impl Attrs {
    fn read(e: &BytesStart<'_>) -> Self {
        let mut attrs = Attrs::default();
        for attr in e.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(Cow::into_owned)
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            match attr.key.local_name().as_ref() {
                b"id" => attrs.id = value,
                b"class" => {
                    attrs.classes = value.split_whitespace().map(str::to_string).collect()
                }
                b"title" => attrs.title = value,
                _ => {}
            }
        }
        attrs
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn line_kind(&self) -> Option<LineKind> {
        self.classes.iter().find_map(|c| LineKind::from_class(c))
    }

    /// First class in the hOCR namespace (`ocr_*` / `ocrx_*`).
    fn hocr_class(&self) -> Option<&str> {
        self.classes
            .iter()
            .map(String::as_str)
            .find(|c| c.starts_with("ocr"))
    }
}

/// Incrementally assembles the tree from start/end/text events.
#[derive(Default)]
struct TreeBuilder {
    document: Document,
    loose: Option<Page>,
    page: Option<Page>,
    line: Option<Line>,
    word: Option<Word>,
    ch: Option<Character>,
    stack: Vec<Frame>,
    dropped: usize,
}

impl TreeBuilder {
    fn open(&mut self, e: &BytesStart<'_>) {
        let frame = self.classify(e);
        if frame == Frame::Dropped {
            self.dropped += 1;
        }
        self.stack.push(frame);
    }

    fn classify(&mut self, e: &BytesStart<'_>) -> Frame {
        if self.dropped > 0 {
            return Frame::Dropped;
        }

        let attrs = Attrs::read(e);
        let Some(class) = attrs.hocr_class().map(str::to_string) else {
            return Frame::Plain;
        };

        if attrs.has_class(PAGE_CLASS) {
            if self.page.is_some() {
                return Frame::Plain;
            }
            if let Some(loose) = self.loose.take() {
                self.document.add_page(loose);
            }
            self.page = Some(Page::new(attrs.id, Properties::parse(&attrs.title)));
            return Frame::Page;
        }

        if let Some(kind) = attrs.line_kind() {
            if self.line.is_some() {
                return Frame::Plain;
            }
            let id = if attrs.id.is_empty() {
                self.synthetic_line_id()
            } else {
                attrs.id
            };
            self.line = Some(Line {
                id,
                kind,
                properties: Properties::parse(&attrs.title),
                text: String::new(),
                words: Vec::new(),
            });
            return Frame::Line;
        }

        if self.line.is_none() {
            if attrs.has_class(WORD_CLASS) || attrs.has_class(CHAR_CLASS) {
                log::debug!("Dropping {} '{}' outside of a line", class, attrs.id);
                return Frame::Dropped;
            }
            // Containers such as ocr_carea and ocr_par.
            return Frame::Plain;
        }

        if self.word.is_none() {
            if attrs.has_class(CHAR_CLASS) {
                log::debug!("Dropping {} outside of a word", CHAR_CLASS);
                return Frame::Dropped;
            }
            let role = if attrs.has_class(WORD_CLASS) {
                NodeRole::Word
            } else {
                NodeRole::Other(class)
            };
            let mut word = Word::new(role, String::new())
                .with_properties(Properties::parse(&attrs.title));
            word.id = attrs.id;
            self.word = Some(word);
            return Frame::Word;
        }

        if self.ch.is_none() {
            let role = if attrs.has_class(CHAR_CLASS) {
                NodeRole::Character
            } else {
                NodeRole::Other(class)
            };
            let mut ch = Character::new(role, String::new());
            ch.properties = Properties::parse(&attrs.title);
            self.ch = Some(ch);
            return Frame::Char;
        }

        Frame::Plain
    }

    fn synthetic_line_id(&self) -> String {
        let page = self.page.as_ref().or(self.loose.as_ref());
        let line_no = page.map_or(0, |p| p.lines.len()) + 1;
        format!("line_{}_{}", self.document.pages.len() + 1, line_no)
    }

    fn close(&mut self) {
        match self.stack.pop() {
            Some(Frame::Page) => self.close_page(),
            Some(Frame::Line) => self.close_line(),
            Some(Frame::Word) => self.close_word(),
            Some(Frame::Char) => self.close_char(),
            Some(Frame::Dropped) => self.dropped -= 1,
            Some(Frame::Plain) | None => {}
        }
    }

    fn close_char(&mut self) {
        if let (Some(ch), Some(word)) = (self.ch.take(), self.word.as_mut()) {
            word.add_char(ch);
        }
    }

    fn close_word(&mut self) {
        self.close_char();
        if let (Some(word), Some(line)) = (self.word.take(), self.line.as_mut()) {
            line.add_word(word);
        }
    }

    fn close_line(&mut self) {
        self.close_word();
        let Some(line) = self.line.take() else {
            return;
        };
        match self.page.as_mut() {
            Some(page) => page.add_line(line),
            None => self.loose.get_or_insert_with(Page::default).add_line(line),
        }
    }

    fn close_page(&mut self) {
        self.close_line();
        if let Some(page) = self.page.take() {
            self.document.add_page(page);
        }
    }

    fn text(&mut self, text: &str) {
        if self.dropped > 0 || text.is_empty() {
            return;
        }
        if let Some(ch) = self.ch.as_mut() {
            ch.text.push_str(text);
            return;
        }
        if text.trim().is_empty() {
            return;
        }
        if let Some(word) = self.word.as_mut() {
            word.text.push_str(text);
        } else if let Some(line) = self.line.as_mut() {
            line.text.push_str(text);
        }
    }

    fn finish(mut self) -> Document {
        self.close_page();
        self.close_line();
        if let Some(loose) = self.loose.take() {
            self.document.add_page(loose);
        }
        self.document
    }
}

fn is_void(name: QName<'_>) -> bool {
    let name = name.local_name();
    let name = String::from_utf8_lossy(name.as_ref()).to_ascii_lowercase();
    VOID_ELEMENTS.contains(&name.as_str())
}

/// XHTML writes void elements as `<img ...></img>`; the start was never
/// pushed, so the end must not pop.
fn is_void_end(e: &BytesEnd<'_>) -> bool {
    is_void(e.name())
}

/// Text with XML and HTML5 named entities resolved.
fn unescape_text(e: &BytesText<'_>) -> String {
    e.unescape_with(resolve_html5_entity)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned())
}
