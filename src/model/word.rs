//! Word and character types.

use crate::properties::{AttributeError, BBox, Properties};
use serde::{Deserialize, Serialize};

/// The role an element plays, derived from its hOCR class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// `ocrx_word`: a word with recognized text
    Word,
    /// `ocrx_cinfo`: a recognized character
    Character,
    /// Any other hOCR class found at word or character level
    Other(String),
}

/// A word node inside a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Element `id`, may be empty
    pub id: String,

    /// Ordinary word or placeholder
    pub role: NodeRole,

    /// Parsed `title` clauses
    pub properties: Properties,

    /// Recognized text; may be empty
    pub text: String,

    /// Character nodes, present only with character-level recognition
    pub chars: Vec<Character>,
}

impl Word {
    /// Create a word with the given role and text.
    pub fn new(role: NodeRole, text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            role,
            properties: Properties::default(),
            text: text.into(),
            chars: Vec::new(),
        }
    }

    /// Set the parsed properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Add a character to the word.
    pub fn add_char(&mut self, ch: Character) {
        self.chars.push(ch);
    }

    /// True for `ocrx_word` nodes.
    pub fn is_ordinary(&self) -> bool {
        self.role == NodeRole::Word
    }

    /// Word bounding box.
    pub fn bbox(&self) -> Result<BBox, AttributeError> {
        self.properties.bbox()
    }

    /// Characters carrying recognized text (`ocrx_cinfo`).
    pub fn ordinary_chars(&self) -> impl Iterator<Item = &Character> {
        self.chars.iter().filter(|c| c.role == NodeRole::Character)
    }
}

/// A character node inside a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Ordinary character or placeholder
    pub role: NodeRole,

    /// Parsed `title` clauses
    pub properties: Properties,

    /// Recognized text, usually a single grapheme
    pub text: String,
}

impl Character {
    /// Create a character with the given role and text.
    pub fn new(role: NodeRole, text: impl Into<String>) -> Self {
        Self {
            role,
            properties: Properties::default(),
            text: text.into(),
        }
    }
}
