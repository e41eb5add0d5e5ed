//! Extraction options and configuration.

use std::path::PathBuf;

/// Options for extracting line details from hOCR documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-line failures
    pub error_mode: ErrorMode,

    /// Where page images come from
    pub image_source: ImageSource,

    /// Whether to decode page images and crop lines at all
    pub load_images: bool,

    /// Confidence substituted for lines whose confidence cannot be computed
    pub default_confidence: Option<f64>,

    /// Whether to use parallel processing for multi-file batches
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable strict mode (fail on the first per-line error).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable lenient mode (keep failing lines with a warning).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the image source.
    pub fn with_image_source(mut self, source: ImageSource) -> Self {
        self.image_source = source;
        self
    }

    /// Use one image for every page instead of the `image` clause.
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_source = ImageSource::Path(path.into());
        self
    }

    /// Use the image next to each hOCR file (`0001.hocr` -> `0001.png`).
    pub fn with_sibling_image(mut self) -> Self {
        self.image_source = ImageSource::Sibling;
        self
    }

    /// Extract text and confidence only, without decoding images.
    pub fn text_only(mut self) -> Self {
        self.load_images = false;
        self
    }

    /// Substitute `conf` (0.0..=1.0) when a line's confidence cannot be computed.
    pub fn with_default_confidence(mut self, conf: f64) -> Self {
        self.default_confidence = Some(conf);
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            image_source: ImageSource::Embedded,
            load_images: true,
            default_confidence: None,
            parallel: true,
        }
    }
}

/// Error handling mode for per-line failures during extraction.
///
/// Unreadable page images never fail extraction in either mode; the
/// lines of that page are returned without images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first line error
    Strict,
    /// Record a warning for the line and continue
    #[default]
    Lenient,
}

/// Where the image of a page is read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSource {
    /// The page's `image` clause, resolved in the document directory;
    /// falls back to the sibling image when the clause is missing
    #[default]
    Embedded,
    /// The document path with its hOCR suffix replaced by `.png`
    Sibling,
    /// An explicit image used for every page
    Path(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .strict()
            .text_only()
            .with_default_confidence(0.0)
            .sequential();

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(!options.load_images);
        assert_eq!(options.default_confidence, Some(0.0));
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.image_source, ImageSource::Embedded);
        assert!(options.load_images);
        assert!(options.parallel);
    }

    #[test]
    fn test_image_overrides() {
        let options = ExtractOptions::new().with_image("scan.png");
        assert_eq!(options.image_source, ImageSource::Path(PathBuf::from("scan.png")));

        let options = ExtractOptions::new().with_sibling_image();
        assert_eq!(options.image_source, ImageSource::Sibling);
    }
}
