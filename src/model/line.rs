//! Line-level types.

use super::Word;
use crate::properties::{AttributeError, BBox, Properties};
use serde::{Deserialize, Serialize};

/// The hOCR class that marked an element as a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// `ocr_line`
    #[default]
    Line,
    /// `ocrx_line`
    XLine,
    /// `ocr_header`
    Header,
    /// `ocr_textfloat`
    TextFloat,
    /// `ocr_caption`
    Caption,
}

impl LineKind {
    /// Map an hOCR class name to a line kind.
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "ocr_line" => Some(Self::Line),
            "ocrx_line" => Some(Self::XLine),
            "ocr_header" => Some(Self::Header),
            "ocr_textfloat" => Some(Self::TextFloat),
            "ocr_caption" => Some(Self::Caption),
            _ => None,
        }
    }

    /// The hOCR class name of this kind.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Line => "ocr_line",
            Self::XLine => "ocrx_line",
            Self::Header => "ocr_header",
            Self::TextFloat => "ocr_textfloat",
            Self::Caption => "ocr_caption",
        }
    }
}

/// A line of text on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Identifier, unique within the document
    pub id: String,

    /// Which line class the element carried
    pub kind: LineKind,

    /// Parsed `title` clauses
    pub properties: Properties,

    /// Character data directly inside the line, outside any word
    pub text: String,

    /// Word nodes, including placeholders
    pub words: Vec<Word>,
}

impl Line {
    /// Create a new empty line.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the parsed properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Set the directly stated text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a word to the line.
    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Line bounding box.
    pub fn bbox(&self) -> Result<BBox, AttributeError> {
        self.properties.bbox()
    }

    /// Words carrying recognized text (`ocrx_word`).
    pub fn ordinary_words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| w.is_ordinary())
    }

    /// Get the reconstructed text of the line.
    pub fn plain_text(&self) -> String {
        crate::render::line_text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeRole;

    #[test]
    fn test_line_kind_classes() {
        for kind in [
            LineKind::Line,
            LineKind::XLine,
            LineKind::Header,
            LineKind::TextFloat,
            LineKind::Caption,
        ] {
            assert_eq!(LineKind::from_class(kind.class_name()), Some(kind));
        }
        assert_eq!(LineKind::from_class("ocr_par"), None);
    }

    #[test]
    fn test_ordinary_words_skip_placeholders() {
        let mut line = Line::new("line_1_1");
        line.add_word(Word::new(NodeRole::Word, "Hel"));
        line.add_word(Word::new(NodeRole::Other("ocr_glyph".into()), "?"));
        line.add_word(Word::new(NodeRole::Word, "lo"));

        let texts: Vec<_> = line.ordinary_words().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["Hel", "lo"]);
    }

    #[test]
    fn test_line_bbox() {
        let line = Line::new("l").with_properties(Properties::parse("bbox 5 6 70 18; baseline 0 -3"));
        assert_eq!(line.bbox().unwrap(), BBox::new(5, 6, 70, 18));
    }
}
