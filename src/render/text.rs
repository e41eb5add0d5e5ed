//! Plain text rendering for hOCR documents.
//!
//! OCR engines fill different tiers of the hOCR tree, so a line's text is
//! taken from the most specific tier that actually carries content: the
//! line's own text, then its words, then its characters.

use crate::model::{Document, Line};

/// Reconstruct the text of one line.
///
/// Never fails; a line without any content yields an empty string. The
/// result has no trailing whitespace.
pub fn line_text(line: &Line) -> String {
    if has_text(&line.text) {
        return line.text.trim_end().to_string();
    }

    let words = line
        .ordinary_words()
        .map(|w| w.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();
    if !words.is_empty() {
        return words.join(" ");
    }

    let words = line
        .ordinary_words()
        .map(|w| w.ordinary_chars().map(|c| c.text.as_str()).collect::<String>())
        .filter(|t| has_text(t))
        .collect::<Vec<_>>();
    words.join(" ").trim_end().to_string()
}

/// Convert a document to plain text, one line per row, in document order.
pub fn to_text(doc: &Document) -> String {
    doc.lines().map(line_text).collect::<Vec<_>>().join("\n")
}

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Character, NodeRole, Page, Word};
    use crate::properties::Properties;

    fn word(text: &str) -> Word {
        Word::new(NodeRole::Word, text)
    }

    #[test]
    fn test_direct_text_wins() {
        let mut line = Line::new("l").with_text("Hello");
        line.add_word(word("Other"));
        assert_eq!(line_text(&line), "Hello");
    }

    #[test]
    fn test_falls_back_to_words() {
        let mut line = Line::new("l").with_text("  \n ");
        line.add_word(word("Hel"));
        line.add_word(word("lo"));
        assert_eq!(line_text(&line), "Hel lo");
    }

    #[test]
    fn test_falls_back_to_characters() {
        let mut w = word("");
        w.add_char(Character::new(NodeRole::Character, "H"));
        w.add_char(Character::new(NodeRole::Character, "i"));
        let mut line = Line::new("l");
        line.add_word(w);
        assert_eq!(line_text(&line), "Hi");
    }

    #[test]
    fn test_characters_space_joined_between_words() {
        let mut line = Line::new("l");
        for text in ["ab", "c"] {
            let mut w = word("");
            for ch in text.chars() {
                w.add_char(Character::new(NodeRole::Character, ch.to_string()));
            }
            line.add_word(w);
        }
        assert_eq!(line_text(&line), "ab c");
    }

    #[test]
    fn test_placeholders_are_ignored() {
        let mut line = Line::new("l");
        line.add_word(Word::new(NodeRole::Other("ocr_glyph".into()), "#"));
        let mut w = word("");
        w.add_char(Character::new(NodeRole::Other("ocr_glyph".into()), "x"));
        line.add_word(w);
        assert_eq!(line_text(&line), "");
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let line = Line::new("l").with_text("  indented  ");
        assert_eq!(line_text(&line), "  indented");
    }

    #[test]
    fn test_empty_words_are_skipped() {
        let mut line = Line::new("l");
        line.add_word(word(""));
        line.add_word(word("rest"));
        assert_eq!(line_text(&line), "rest");
    }

    #[test]
    fn test_to_text() {
        let mut doc = Document::new();
        let mut page = Page::new("p", Properties::default());
        page.add_line(Line::new("a").with_text("first"));
        page.add_line(Line::new("b"));
        page.add_line(Line::new("c").with_text("third"));
        doc.add_page(page);

        assert_eq!(to_text(&doc), "first\n\nthird");
    }
}
