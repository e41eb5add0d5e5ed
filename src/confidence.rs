//! Word, line, page, and document confidence.
//!
//! Word confidences are `x_wconf` percentages. Line confidence is the mean
//! of its words normalized to `0.0..=1.0`; page and document confidence
//! are the mean over every individual word, kept as a percentage. Only
//! ordinary `ocrx_word` nodes take part.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Document, Line, Page, Word};

/// Confidence of a single word as a percentage in `0..=100`.
pub fn word_confidence(word: &Word) -> Result<f64> {
    Ok(word.properties.confidence()?)
}

/// Mean word confidence of a line, normalized to `0.0..=1.0`.
///
/// Returns [`Error::NoWords`] for a line without ordinary words.
pub fn line_confidence(line: &Line) -> Result<f64> {
    let mean = mean(line.ordinary_words())
        .ok_or_else(|| Error::NoWords(format!("line '{}'", line.id)))??;
    Ok(mean / 100.0)
}

/// Mean confidence over every word on a page, as a percentage.
pub fn page_confidence(page: &Page) -> Result<f64> {
    mean(page.words()).ok_or_else(|| Error::NoWords(format!("page '{}'", page.id)))?
}

/// Mean confidence over every word in a document, as a percentage.
pub fn document_confidence(doc: &Document) -> Result<f64> {
    mean(doc.words()).ok_or_else(|| Error::NoWords("document".to_string()))?
}

/// Word-weighted mean, `None` when there are no words.
fn mean<'a>(words: impl Iterator<Item = &'a Word>) -> Option<Result<f64>> {
    let mut total = 0.0;
    let mut count = 0usize;
    for word in words {
        match word_confidence(word) {
            Ok(conf) => total += conf,
            Err(e) => return Some(Err(e)),
        }
        count += 1;
    }
    (count > 0).then(|| Ok(total / count as f64))
}

/// Summary of word confidences, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceStats {
    /// Number of words considered
    pub words: usize,
    /// Mean confidence (percentage)
    pub mean: f64,
    /// Lowest word confidence
    pub min: f64,
    /// Highest word confidence
    pub max: f64,
}

/// Summarize the confidence of a set of words.
pub fn summarize<'a>(words: impl IntoIterator<Item = &'a Word>) -> Result<ConfidenceStats> {
    let mut stats = ConfidenceStats {
        words: 0,
        mean: 0.0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
    let mut total = 0.0;
    for word in words {
        let conf = word_confidence(word)?;
        total += conf;
        stats.min = stats.min.min(conf);
        stats.max = stats.max.max(conf);
        stats.words += 1;
    }
    if stats.words == 0 {
        return Err(Error::NoWords("selection".to_string()));
    }
    stats.mean = total / stats.words as f64;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeRole;
    use crate::properties::Properties;

    fn word(conf: &str) -> Word {
        Word::new(NodeRole::Word, "w").with_properties(Properties::parse(&format!(
            "bbox 0 0 1 1; x_wconf {conf}"
        )))
    }

    fn line(id: &str, confs: &[&str]) -> Line {
        let mut line = Line::new(id);
        for conf in confs {
            line.add_word(word(conf));
        }
        line
    }

    #[test]
    fn test_word_confidence() {
        assert_eq!(word_confidence(&word("93")).unwrap(), 93.0);
        let bare = Word::new(NodeRole::Word, "w");
        assert!(matches!(
            word_confidence(&bare),
            Err(Error::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_line_confidence_is_normalized_mean() {
        let l = line("l", &["90", "80", "40"]);
        let conf = line_confidence(&l).unwrap();
        assert!((conf - 0.7).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&conf));
    }

    #[test]
    fn test_line_without_words() {
        let l = Line::new("empty").with_text("text only");
        assert!(matches!(line_confidence(&l), Err(Error::NoWords(_))));
    }

    #[test]
    fn test_placeholders_do_not_count() {
        let mut l = line("l", &["60"]);
        l.add_word(Word::new(NodeRole::Other("ocr_glyph".into()), "?"));
        assert!((line_confidence(&l).unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_word_fails_line() {
        let l = line("l", &["60", "n/a"]);
        assert!(matches!(
            line_confidence(&l),
            Err(Error::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_page_confidence_weights_words() {
        let mut page = Page::new("p", Properties::default());
        page.add_line(line("a", &["100"]));
        page.add_line(line("b", &["40", "40", "40"]));

        // (100 + 40 * 3) / 4 = 55, while the mean of line means would be 70.
        let conf = page_confidence(&page).unwrap();
        assert!((conf - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_without_words() {
        let mut page = Page::new("p", Properties::default());
        page.add_line(Line::new("a"));
        assert!(matches!(page_confidence(&page), Err(Error::NoWords(_))));
    }

    #[test]
    fn test_document_confidence_spans_pages() {
        let mut doc = Document::new();
        let mut first = Page::new("p1", Properties::default());
        first.add_line(line("a", &["90", "70"]));
        let mut second = Page::new("p2", Properties::default());
        second.add_line(line("b", &["20"]));
        doc.add_page(first);
        doc.add_page(second);

        assert!((document_confidence(&doc).unwrap() - 60.0).abs() < 1e-9);
        assert!(matches!(
            document_confidence(&Document::new()),
            Err(Error::NoWords(_))
        ));
    }

    #[test]
    fn test_summarize() {
        let l = line("l", &["10", "50", "90"]);
        let stats = summarize(l.ordinary_words()).unwrap();
        assert_eq!(stats.words, 3);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 90.0);
        assert!((stats.mean - 50.0).abs() < 1e-9);
        assert!(summarize(std::iter::empty()).is_err());
    }
}
