//! Rendering module for converting hOCR documents to output formats.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{line_text, to_text};
