//! Error types for hocrkit library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::properties::{AttributeError, BBox};

/// Result type alias for hocrkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during hOCR processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The byte stream could not be read as markup at all.
    #[error("Malformed hOCR document: {0}")]
    MalformedDocument(String),

    /// A `title` clause needed by an operation is missing or malformed.
    #[error("Malformed attribute: {0}")]
    MalformedAttribute(#[from] AttributeError),

    /// Confidence was requested for a line or page without any words.
    #[error("No words to compute confidence for in {0}")]
    NoWords(String),

    /// A crop rectangle is degenerate or lies outside the page image.
    #[error("Invalid geometry {bbox} for image of {width}x{height}")]
    InvalidGeometry {
        /// The offending box
        bbox: BBox,
        /// Canvas width in pixels
        width: u32,
        /// Canvas height in pixels
        height: u32,
    },

    /// The companion page image is missing or could not be decoded.
    #[error("Unreadable image {path}: {reason}")]
    ImageUnreadable {
        /// Path that was tried
        path: PathBuf,
        /// Decoder or I/O message
        reason: String,
    },

    /// Error during rendering (JSON, PNG).
    #[error("Rendering error: {0}")]
    Render(String),
}
