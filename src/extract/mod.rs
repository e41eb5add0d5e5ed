//! Line extraction: text, confidence, and cropped images per line.
//!
//! Each page image is decoded at most once; every line of the page is then
//! cut from the shared canvas as a view. Problems with one page image or
//! one line are recorded as [`Warning`]s and never stop the rest of the
//! document, unless [`ErrorMode::Strict`] is requested.

mod canvas;
mod detail;
mod options;

pub use canvas::{Canvas, LineImage};
pub use detail::{Extraction, LineDetail, Warning};
pub use options::{ErrorMode, ExtractOptions, ImageSource};

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::confidence;
use crate::error::{Error, Result};
use crate::model::{Document, Line, Page};
use crate::parser::HocrParser;
use crate::render;
use crate::source::DocumentSource;

/// Extract line details from a parsed document.
///
/// Returns an error only for per-line failures in strict mode; unreadable
/// page images always degrade to lines without images.
pub fn extract_lines(
    doc: &Document,
    source: &DocumentSource,
    options: &ExtractOptions,
) -> Result<Extraction> {
    let mut extraction = Extraction::default();

    for page in &doc.pages {
        let canvas = if options.load_images {
            load_canvas(page, source, &options.image_source, &mut extraction.warnings)
        } else {
            None
        };

        for line in &page.lines {
            let detail = extract_line(
                line,
                canvas.as_ref(),
                source,
                options,
                &mut extraction.warnings,
            )?;
            extraction.lines.push(detail);
        }
    }

    Ok(extraction)
}

/// Parse an hOCR file and extract its lines.
pub fn extract_file(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Extraction> {
    let path = path.as_ref();
    let doc = HocrParser::open(path)?.parse()?;
    extract_lines(&doc, &DocumentSource::from_path(path), options)
}

/// Extract several hOCR files, in parallel unless disabled.
///
/// Results are returned in input order; one failing file never affects the
/// others.
pub fn extract_files<P>(paths: &[P], options: &ExtractOptions) -> Vec<(PathBuf, Result<Extraction>)>
where
    P: AsRef<Path> + Sync,
{
    let run = |path: &P| {
        let path = path.as_ref();
        (path.to_path_buf(), extract_file(path, options))
    };

    if options.parallel {
        paths.par_iter().map(run).collect()
    } else {
        paths.iter().map(run).collect()
    }
}

/// The image file a page should be read from.
pub fn page_image_path(page: &Page, source: &DocumentSource, image_source: &ImageSource) -> PathBuf {
    match image_source {
        ImageSource::Path(path) => path.clone(),
        ImageSource::Sibling => source.sibling_image(),
        ImageSource::Embedded => match page.image_ref() {
            Some(image_ref) => source.resolve_image_ref(&image_ref),
            None => source.sibling_image(),
        },
    }
}

fn load_canvas(
    page: &Page,
    source: &DocumentSource,
    image_source: &ImageSource,
    warnings: &mut Vec<Warning>,
) -> Option<Canvas> {
    let path = page_image_path(page, source, image_source);
    match Canvas::open(&path) {
        Ok(canvas) => Some(canvas),
        Err(e) => {
            push_warning(
                warnings,
                Warning::ImageUnreadable {
                    page: page.id.clone(),
                    reason: e.to_string(),
                },
            );
            None
        }
    }
}

fn extract_line(
    line: &Line,
    canvas: Option<&Canvas>,
    source: &DocumentSource,
    options: &ExtractOptions,
    warnings: &mut Vec<Warning>,
) -> Result<LineDetail> {
    let avg_conf = match confidence::line_confidence(line) {
        Ok(conf) => Some(conf),
        Err(e)
            if options.default_confidence.is_none() && options.error_mode == ErrorMode::Strict =>
        {
            return Err(e)
        }
        Err(e) => {
            push_warning(
                warnings,
                Warning::Confidence {
                    line: line.id.clone(),
                    reason: e.to_string(),
                    substituted: options.default_confidence.is_some(),
                },
            );
            options.default_confidence
        }
    };

    let image = match canvas {
        None => None,
        Some(canvas) => match line.bbox().map_err(Error::from).and_then(|b| canvas.crop(b)) {
            Ok(image) => Some(image),
            Err(e) if options.error_mode == ErrorMode::Strict => return Err(e),
            Err(e) => {
                push_warning(
                    warnings,
                    Warning::LineImage {
                        line: line.id.clone(),
                        reason: e.to_string(),
                    },
                );
                None
            }
        },
    };

    Ok(LineDetail {
        name: line.id.clone(),
        ocr_name: source.name.clone(),
        text: render::line_text(line),
        avg_conf,
        image,
    })
}

fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    log::warn!("{}", warning);
    warnings.push(warning);
}
