//! hOCR source files: document names and companion image paths.

use std::path::{Path, PathBuf};

/// File suffixes recognized as hOCR documents.
pub const HOCR_SUFFIXES: &[&str] = &["hocr", "html", "xhtml", "htm"];

/// Suffix used for companion page images.
pub const IMAGE_SUFFIX: &str = "png";

/// Where an hOCR document came from.
///
/// The name prefixes exported line files; the directory anchors relative
/// image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    /// Document name, the file name without its hOCR suffix
    pub name: String,
    /// Directory containing the document
    pub dir: PathBuf,
    /// Path of the document itself, when read from disk
    pub path: Option<PathBuf>,
}

impl DocumentSource {
    /// Describe an hOCR file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            name: document_name(path),
            dir: path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            path: Some(path.to_path_buf()),
        }
    }

    /// Describe an in-memory document; relative image paths resolve in `dir`.
    pub fn in_memory(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            path: None,
        }
    }

    /// The image next to the document, by suffix convention.
    pub fn sibling_image(&self) -> PathBuf {
        match &self.path {
            Some(path) => sibling_image_path(path),
            None => self.dir.join(format!("{}.{}", self.name, IMAGE_SUFFIX)),
        }
    }

    /// Resolve an `image` clause: its file name, placed in the document directory.
    pub fn resolve_image_ref(&self, image_ref: &str) -> PathBuf {
        let file_name = image_ref
            .rsplit(&['/', '\\'][..])
            .next()
            .unwrap_or(image_ref);
        self.dir.join(file_name)
    }
}

/// Strip a recognized hOCR suffix from a file name.
pub fn document_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if is_hocr_suffix(ext) => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file_name),
        _ => file_name,
    }
}

/// Replace a recognized hOCR suffix with the image suffix.
///
/// `book/0001.hocr` becomes `book/0001.png`; unrecognized suffixes are kept
/// and the image suffix is appended.
pub fn sibling_image_path(path: &Path) -> PathBuf {
    let name = document_name(path);
    path.with_file_name(format!("{}.{}", name, IMAGE_SUFFIX))
}

/// Check whether a file suffix denotes an hOCR document.
pub fn is_hocr_suffix(ext: &str) -> bool {
    HOCR_SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(ext))
}

/// Check whether a path looks like an hOCR document.
pub fn is_hocr_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(is_hocr_suffix)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("book/0001.hocr")), "0001");
        assert_eq!(document_name(Path::new("0002.HTML")), "0002");
        assert_eq!(document_name(Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_sibling_image_path() {
        assert_eq!(
            sibling_image_path(Path::new("book/0001.hocr")),
            PathBuf::from("book/0001.png")
        );
        assert_eq!(
            sibling_image_path(Path::new("scan.v2.hocr")),
            PathBuf::from("scan.v2.png")
        );
    }

    #[test]
    fn test_resolve_image_ref_uses_document_dir() {
        let source = DocumentSource::from_path("out/book/0001.hocr");
        assert_eq!(source.name, "0001");
        assert_eq!(
            source.resolve_image_ref("/tmp/tesseract/0001.png"),
            PathBuf::from("out/book/0001.png")
        );
        assert_eq!(
            source.resolve_image_ref("0001.png"),
            PathBuf::from("out/book/0001.png")
        );
    }

    #[test]
    fn test_in_memory_sibling() {
        let source = DocumentSource::in_memory("page", "scans");
        assert_eq!(source.sibling_image(), PathBuf::from("scans/page.png"));
    }

    #[test]
    fn test_is_hocr_path() {
        assert!(is_hocr_path(Path::new("a.hocr")));
        assert!(is_hocr_path(Path::new("a.xhtml")));
        assert!(!is_hocr_path(Path::new("a.png")));
        assert!(!is_hocr_path(Path::new("hocr")));
    }
}
