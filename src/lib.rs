//! # hocrkit
//!
//! hOCR parsing and line extraction for OCR training data.
//!
//! This library reads hOCR output of OCR engines, reconstructs the text of
//! each line, aggregates word confidence, and cuts per-line images out of
//! the page scan.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hocrkit::{extract_line_details, ExtractOptions};
//!
//! fn main() -> hocrkit::Result<()> {
//!     let extraction = extract_line_details("0001.hocr", &ExtractOptions::default())?;
//!     for warning in &extraction.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!     let written = extraction.save_all("lines")?;
//!     println!("{} lines written", written);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Both document shapes**: page-nested and legacy flat hOCR
//! - **Text fallback**: line text, else word text, else character text
//! - **Word-weighted confidence**: per line, page, and document
//! - **Zero-copy line crops**: views into one decoded grayscale page
//! - **Parallel batches**: Rayon across many hOCR files

pub mod confidence;
pub mod dehyphenate;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod properties;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use confidence::{document_confidence, line_confidence, page_confidence, word_confidence};
pub use dehyphenate::{dehyphenate, DehyphenateReport};
pub use error::{Error, Result};
pub use extract::{
    extract_files, extract_lines, Canvas, ErrorMode, ExtractOptions, Extraction, ImageSource,
    LineDetail, LineImage, Warning,
};
pub use model::{Character, Document, Line, LineKind, NodeRole, Page, Word};
pub use parser::HocrParser;
pub use properties::{AttributeError, BBox, Properties};
pub use render::{line_text, JsonFormat};
pub use source::DocumentSource;

use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse an hOCR file and return the document tree.
///
/// # Example
///
/// ```no_run
/// use hocrkit::parse_file;
///
/// let doc = parse_file("0001.hocr").unwrap();
/// println!("Lines: {}", doc.line_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    HocrParser::open(path)?.parse()
}

/// Parse hOCR from bytes.
///
/// # Example
///
/// ```
/// let doc = hocrkit::parse_bytes(b"<div class='ocr_page'><span class='ocr_line'>Hi</span></div>").unwrap();
/// assert_eq!(doc.plain_text(), "Hi");
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    HocrParser::from_bytes(data).parse()
}

/// Parse hOCR from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    HocrParser::from_reader(reader)?.parse()
}

/// Extract the text of an hOCR file, one line per row.
///
/// # Example
///
/// ```no_run
/// let text = hocrkit::extract_text("0001.hocr").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(render::to_text(&doc))
}

/// Mean word confidence of an hOCR file, as a percentage.
///
/// # Example
///
/// ```no_run
/// let conf = hocrkit::average_confidence("0001.hocr").unwrap();
/// println!("{:.0}", conf);
/// ```
pub fn average_confidence<P: AsRef<Path>>(path: P) -> Result<f64> {
    let doc = parse_file(path)?;
    document_confidence(&doc)
}

/// Parse an hOCR file and extract its line details.
pub fn extract_line_details<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Extraction> {
    extract::extract_file(path, options)
}

/// Builder for parsing and extracting hOCR documents.
///
/// # Example
///
/// ```no_run
/// use hocrkit::Hocrkit;
///
/// let extraction = Hocrkit::new()
///     .with_sibling_image()
///     .with_default_confidence(0.0)
///     .parse("0001.hocr")?
///     .extract_lines()?;
/// # Ok::<(), hocrkit::Error>(())
/// ```
pub struct Hocrkit {
    options: ExtractOptions,
}

impl Hocrkit {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Fail on the first per-line error.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Extract text and confidence only.
    pub fn text_only(mut self) -> Self {
        self.options = self.options.text_only();
        self
    }

    /// Use one image for every page.
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_image(path);
        self
    }

    /// Use the image next to the hOCR file.
    pub fn with_sibling_image(mut self) -> Self {
        self.options = self.options.with_sibling_image();
        self
    }

    /// Substitute a confidence for lines without usable words.
    pub fn with_default_confidence(mut self, conf: f64) -> Self {
        self.options = self.options.with_default_confidence(conf);
        self
    }

    /// Parse an hOCR file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<HocrkitResult> {
        let path = path.as_ref();
        Ok(HocrkitResult {
            document: parse_file(path)?,
            source: DocumentSource::from_path(path),
            options: self.options,
        })
    }

    /// Parse hOCR bytes; relative image references resolve against `source`.
    pub fn parse_bytes(self, data: &[u8], source: DocumentSource) -> Result<HocrkitResult> {
        Ok(HocrkitResult {
            document: parse_bytes(data)?,
            source,
            options: self.options,
        })
    }
}

impl Default for Hocrkit {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing an hOCR document.
pub struct HocrkitResult {
    /// The parsed document
    pub document: Document,
    /// Where the document came from
    pub source: DocumentSource,
    /// Extraction options to use
    options: ExtractOptions,
}

impl HocrkitResult {
    /// Text of all lines, newline-joined.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Document tree as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Mean word confidence, as a percentage.
    pub fn confidence(&self) -> Result<f64> {
        document_confidence(&self.document)
    }

    /// Extract line details using the builder's options.
    pub fn extract_lines(&self) -> Result<Extraction> {
        extract_lines(&self.document, &self.source, &self.options)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"<html><body>
        <div class='ocr_page' id='page_1' title='image "0001.png"; bbox 0 0 50 50'>
          <span class='ocr_line' id='line_1_1' title='bbox 0 0 50 10'>
            <span class='ocrx_word' title='bbox 0 0 20 10; x_wconf 90'>Gallia</span>
            <span class='ocrx_word' title='bbox 25 0 50 10; x_wconf 70'>est</span>
          </span>
        </div></body></html>"#;

    #[test]
    fn test_hocrkit_builder() {
        let kit = Hocrkit::new()
            .strict()
            .with_sibling_image()
            .with_default_confidence(0.5);

        assert_eq!(kit.options.error_mode, ErrorMode::Strict);
        assert_eq!(kit.options.image_source, ImageSource::Sibling);
        assert_eq!(kit.options.default_confidence, Some(0.5));
    }

    #[test]
    fn test_hocrkit_builder_default() {
        let kit = Hocrkit::default();
        assert_eq!(kit.options.error_mode, ErrorMode::Lenient);
        assert!(kit.options.load_images);
    }

    #[test]
    fn test_parse_bytes() {
        let doc = parse_bytes(SAMPLE).unwrap();
        assert_eq!(doc.plain_text(), "Gallia est");
        assert!((document_confidence(&doc).unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_reader() {
        let doc = parse_reader(SAMPLE).unwrap();
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn test_result_wrapper_without_image() {
        let result = Hocrkit::new()
            .parse_bytes(SAMPLE, DocumentSource::in_memory("0001", "/nonexistent"))
            .unwrap();
        assert_eq!(result.to_text(), "Gallia est");

        let extraction = result.extract_lines().unwrap();
        assert_eq!(extraction.lines.len(), 1);
        assert_eq!(extraction.lines[0].file_stem(), "0001_line_1_1");
        assert!(extraction.lines[0].image.is_none());
        assert!((extraction.lines[0].avg_conf.unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/0001.hocr");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
