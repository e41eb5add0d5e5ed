//! Decoded page images and line crops.
//!
//! A [`Canvas`] is decoded once per page and frozen behind an [`Arc`]. Each
//! [`LineImage`] holds a clone of that `Arc` plus its rectangle, so line
//! crops are views: no pixels are copied until a crop is exported, and the
//! page canvas stays alive for as long as any of its line images does.

use std::path::Path;
use std::sync::Arc;

use image::{imageops, DynamicImage, GrayImage, ImageFormat, ImageReader, SubImage};

use crate::error::{Error, Result};
use crate::properties::BBox;

/// A decoded single-channel 8-bit page image.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Arc<GrayImage>,
}

impl Canvas {
    /// Decode an image file and convert it to 8-bit grayscale.
    ///
    /// The format is sniffed from the file content, so a scan saved with
    /// the wrong extension still decodes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = decode(path).map_err(|reason| Error::ImageUnreadable {
            path: path.to_path_buf(),
            reason,
        })?;
        log::debug!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );
        Ok(Self::from_gray(decoded.into_luma8()))
    }

    /// Wrap an already decoded grayscale image.
    pub fn from_gray(image: GrayImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The full page image.
    pub fn image(&self) -> &GrayImage {
        &self.pixels
    }

    /// Take a view of the rectangle `bbox`.
    ///
    /// Fails with [`Error::InvalidGeometry`] when the box is degenerate or
    /// reaches outside the canvas.
    pub fn crop(&self, bbox: BBox) -> Result<LineImage> {
        if bbox.is_degenerate() || !bbox.fits_within(self.width(), self.height()) {
            return Err(Error::InvalidGeometry {
                bbox,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(LineImage {
            canvas: self.clone(),
            bounds: bbox,
        })
    }
}

fn decode(path: &Path) -> std::result::Result<DynamicImage, String> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())
}

/// A line-sized view into a page [`Canvas`].
#[derive(Debug, Clone)]
pub struct LineImage {
    canvas: Canvas,
    bounds: BBox,
}

impl LineImage {
    /// The rectangle of the page this view covers.
    pub fn bounds(&self) -> BBox {
        self.bounds
    }

    /// View width in pixels.
    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    /// View height in pixels.
    pub fn height(&self) -> u32 {
        self.bounds.height()
    }

    /// Borrow the pixels of this line from the page canvas.
    pub fn view(&self) -> SubImage<&GrayImage> {
        imageops::crop_imm(
            self.canvas.image(),
            self.bounds.x0 as u32,
            self.bounds.y0 as u32,
            self.width(),
            self.height(),
        )
    }

    /// Copy the line pixels into an owned image.
    pub fn to_image(&self) -> GrayImage {
        self.view().to_image()
    }

    /// Write the line as an 8-bit grayscale PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => Error::Io(io),
                other => Error::Render(format!("PNG encoding of {}: {}", path.display(), other)),
            })
    }
}
