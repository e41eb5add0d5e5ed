//! Flattened per-line output of an extraction.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::LineImage;
use crate::error::Result;

/// One exported line: identity, text, confidence, and an optional crop.
#[derive(Debug, Clone, Serialize)]
pub struct LineDetail {
    /// Line identifier from the hOCR document
    pub name: String,

    /// Name of the source document
    pub ocr_name: String,

    /// Reconstructed line text
    pub text: String,

    /// Mean word confidence, 0.0..=1.0; `None` when the line has no
    /// usable word confidence and no default was configured
    pub avg_conf: Option<f64>,

    /// Cropped line image; `None` when the page image was unavailable
    /// or the line geometry was unusable
    #[serde(skip)]
    pub image: Option<LineImage>,
}

impl LineDetail {
    /// Base file name shared by the exported image and text.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.ocr_name, self.name)
    }

    /// Check whether a line image is attached.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Write `<ocr_name>_<name>.png` and `.txt` into `dir`.
    ///
    /// Lines without an image are not written; returns the text path of the
    /// written pair, or `None` when nothing was written.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let Some(image) = &self.image else {
            return Ok(None);
        };
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let stem = self.file_stem();
        image.save_png(dir.join(format!("{}.png", stem)))?;
        let text_path = dir.join(format!("{}.txt", stem));
        fs::write(&text_path, &self.text)?;
        Ok(Some(text_path))
    }
}

/// Something that went wrong for part of a document without stopping it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The page image could not be read; its lines have no image.
    ImageUnreadable {
        /// Page identifier
        page: String,
        /// Decoder or I/O message
        reason: String,
    },
    /// A line's crop could not be taken; the line has no image.
    LineImage {
        /// Line identifier
        line: String,
        /// Why the crop failed
        reason: String,
    },
    /// A line's confidence could not be computed.
    Confidence {
        /// Line identifier
        line: String,
        /// Why the aggregation failed
        reason: String,
        /// Whether the line was kept with the default confidence
        substituted: bool,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ImageUnreadable { page, reason } => {
                write!(f, "page '{}': no line images, {}", page, reason)
            }
            Warning::LineImage { line, reason } => {
                write!(f, "line '{}': no image, {}", line, reason)
            }
            Warning::Confidence {
                line,
                reason,
                substituted,
            } => {
                let action = if *substituted { "using default" } else { "no confidence" };
                write!(f, "line '{}': {}, {}", line, reason, action)
            }
        }
    }
}

/// Lines extracted from one document, with the warnings raised on the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    /// Extracted lines in document order
    pub lines: Vec<LineDetail>,
    /// Per-page and per-line problems
    pub warnings: Vec<Warning>,
}

impl Extraction {
    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write every line that has both an image and text into `dir`.
    ///
    /// Returns the number of lines written.
    pub fn save_all(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut written = 0;
        for line in self.lines.iter().filter(|l| !l.text.is_empty()) {
            if line.save(dir)?.is_some() {
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(name: &str) -> LineDetail {
        LineDetail {
            name: name.to_string(),
            ocr_name: "0001".to_string(),
            text: "text".to_string(),
            avg_conf: Some(0.5),
            image: None,
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(detail("line_1_4").file_stem(), "0001_line_1_4");
    }

    #[test]
    fn test_save_without_image_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let line = detail("line_1_1");
        assert!(line.save(dir.path()).unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::Confidence {
            line: "line_1_1".into(),
            reason: "no words".into(),
            substituted: false,
        };
        assert_eq!(warning.to_string(), "line 'line_1_1': no words, no confidence");
    }

    #[test]
    fn test_line_detail_json_skips_image() {
        let json = serde_json::to_string(&detail("l")).unwrap();
        assert!(json.contains("\"avg_conf\":0.5"));
        assert!(!json.contains("image"));

        let unset = LineDetail {
            avg_conf: None,
            ..detail("l")
        };
        let json = serde_json::to_string(&unset).unwrap();
        assert!(json.contains("\"avg_conf\":null"));
    }
}
