//! Page-level types.

use super::{Line, Word};
use crate::properties::{AttributeError, BBox, Properties};
use serde::{Deserialize, Serialize};

/// A single `ocr_page` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Element `id`, empty for the synthetic page of flat documents
    pub id: String,

    /// Parsed `title` clauses
    pub properties: Properties,

    /// Lines in reading order
    pub lines: Vec<Line>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(id: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            properties,
            lines: Vec::new(),
        }
    }

    /// Add a line to the page.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Source image path as written in the `image` clause.
    pub fn image_ref(&self) -> Option<String> {
        self.properties.image()
    }

    /// Page bounding box.
    pub fn bbox(&self) -> Result<BBox, AttributeError> {
        self.properties.bbox()
    }

    /// Physical page number from `ppageno`.
    pub fn page_number(&self) -> Option<u32> {
        self.properties.page_number()
    }

    /// All ordinary words on the page, in reading order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.ordinary_words())
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(crate::render::line_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
