//! Word-level dehyphenation of an hOCR document tree.
//!
//! When the last word of a line ends in a hyphen, the first word of the
//! following line is appended to it (without the hyphen) and left behind
//! as an empty word. Lines are followed across page boundaries in document
//! order. A continuation that fills its whole line and itself ends in a
//! hyphen keeps the join going into the line after it. Words split at
//! character level (`ocrx_cinfo` children) are not joined; they are
//! counted in [`DehyphenateReport::skipped_char_level`].

use serde::Serialize;

use crate::model::{Document, Line, Word};

/// Characters treated as a line-end hyphen.
pub const HYPHENS: &[char] = &['-', '\u{ac}', '\u{2e17}'];

/// What a dehyphenation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DehyphenateReport {
    /// Number of words joined across a line break
    pub joined: usize,
    /// Hyphenated words left alone because they carry character nodes
    pub skipped_char_level: usize,
}

/// Join hyphen-broken words across consecutive lines, in place.
pub fn dehyphenate(doc: &mut Document) -> DehyphenateReport {
    let mut report = DehyphenateReport::default();
    let mut lines: Vec<&mut Line> = doc
        .pages
        .iter_mut()
        .flat_map(|page| page.lines.iter_mut())
        .collect();

    // Word still waiting for its continuation after absorbing a whole line.
    let mut carry: Option<(usize, usize)> = None;

    for i in 1..lines.len() {
        let (before, after) = lines.split_at_mut(i);
        let next = &mut *after[0];

        let (line_idx, word_idx) = match carry.take() {
            Some(pos) => pos,
            None => match last_word_index(&*before[i - 1]) {
                Some(w) => (i - 1, w),
                None => continue,
            },
        };
        let Line { id, words, .. } = &mut *before[line_idx];
        let last = &mut words[word_idx];

        if !ends_with_hyphen(&word_text(last)) {
            continue;
        }
        if !last.chars.is_empty() {
            log::warn!(
                "Line '{}': character-level hyphen joining is not implemented, leaving word as is",
                id
            );
            report.skipped_char_level += 1;
            continue;
        }

        let Some(first_idx) = first_word_index(next) else {
            continue;
        };
        let whole_line = last_word_index(next) == Some(first_idx);
        let first = &mut next.words[first_idx];
        if first.text.trim().is_empty() {
            continue;
        }

        let head = last.text.trim_end().trim_end_matches(HYPHENS).to_string();
        last.text = head + first.text.trim();
        first.text.clear();
        report.joined += 1;

        if whole_line && ends_with_hyphen(&last.text) {
            carry = Some((line_idx, word_idx));
        }
    }

    if report.joined > 0 {
        log::debug!("Joined {} hyphenated words", report.joined);
    }
    report
}

fn last_word_index(line: &Line) -> Option<usize> {
    line.words.iter().rposition(|w| w.is_ordinary())
}

fn first_word_index(line: &Line) -> Option<usize> {
    line.words.iter().position(|w| w.is_ordinary())
}

fn word_text(word: &Word) -> String {
    if word.text.trim().is_empty() {
        word.ordinary_chars().map(|c| c.text.as_str()).collect()
    } else {
        word.text.clone()
    }
}

fn ends_with_hyphen(text: &str) -> bool {
    text.trim_end().ends_with(HYPHENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Character, NodeRole, Page};
    use crate::properties::Properties;

    fn line(id: &str, words: &[&str]) -> Line {
        let mut line = Line::new(id);
        for w in words {
            line.add_word(Word::new(NodeRole::Word, *w));
        }
        line
    }

    fn doc(pages: Vec<Vec<Line>>) -> Document {
        let mut doc = Document::new();
        for lines in pages {
            let mut page = Page::new("p", Properties::default());
            for l in lines {
                page.add_line(l);
            }
            doc.add_page(page);
        }
        doc
    }

    #[test]
    fn test_joins_across_lines() {
        let mut d = doc(vec![vec![
            line("a", &["arma", "vi-"]),
            line("b", &["rumque", "cano"]),
        ]]);
        let report = dehyphenate(&mut d);

        assert_eq!(report.joined, 1);
        assert_eq!(d.pages[0].lines[0].words[1].text, "virumque");
        // The consumed word stays in the tree, empty.
        assert_eq!(d.pages[0].lines[1].words.len(), 2);
        assert_eq!(d.pages[0].lines[1].words[0].text, "");
        assert_eq!(d.plain_text(), "arma virumque\ncano");
    }

    #[test]
    fn test_joins_across_pages() {
        let mut d = doc(vec![vec![line("a", &["Troi\u{ac}"])], vec![line("b", &["ae"])]]);
        assert_eq!(dehyphenate(&mut d).joined, 1);
        assert_eq!(d.pages[0].lines[0].words[0].text, "Troiae");
    }

    #[test]
    fn test_join_carries_over_single_word_lines() {
        let mut d = doc(vec![vec![
            line("a", &["arma", "vi-"]),
            line("b", &["rum-"]),
            line("c", &["que", "cano"]),
        ]]);
        let report = dehyphenate(&mut d);

        assert_eq!(report.joined, 2);
        assert_eq!(d.pages[0].lines[0].words[1].text, "virumque");
        assert_eq!(d.pages[0].lines[1].words[0].text, "");
        assert_eq!(d.pages[0].lines[2].words[0].text, "");
        assert_eq!(d.pages[0].lines[2].words[1].text, "cano");
    }

    #[test]
    fn test_last_line_hyphen_is_kept() {
        let mut d = doc(vec![vec![line("a", &["qui"]), line("b", &["pri-"])]]);
        assert_eq!(dehyphenate(&mut d).joined, 0);
        assert_eq!(d.pages[0].lines[1].words[0].text, "pri-");
    }

    #[test]
    fn test_skips_empty_next_line() {
        let mut d = doc(vec![vec![line("a", &["pri-"]), line("b", &[]), line("c", &["mus"])]]);
        assert_eq!(dehyphenate(&mut d).joined, 0);
    }

    #[test]
    fn test_character_level_is_reported() {
        let mut word = Word::new(NodeRole::Word, "");
        for ch in ["a", "b", "-"] {
            word.add_char(Character::new(NodeRole::Character, ch));
        }
        let mut first = Line::new("a");
        first.add_word(word);
        let mut d = doc(vec![vec![first, line("b", &["cd"])]]);

        let report = dehyphenate(&mut d);
        assert_eq!(report.joined, 0);
        assert_eq!(report.skipped_char_level, 1);
        assert_eq!(d.pages[0].lines[1].words[0].text, "cd");
    }
}
