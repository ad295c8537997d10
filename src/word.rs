//! Word-boundary scanning.
//!
//! A thin cursor over UAX#14 line-break opportunities, computed once per
//! paragraph with the `unicode-linebreak` crate and converted from byte
//! offsets to char indices. The breaker consumes boundaries strictly left
//! to right, so the cursor only ever moves forward; a locale switch re-seeds
//! it at the start of the new run.
//!
//! Soft-hyphen opportunities are deliberately withheld: breaking at U+00AD
//! must surface a hyphen glyph, which is the hyphenator's department, so
//! the word scanner treats soft hyphens as word-interior.

use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A space that separates words and participates in justification.
pub fn is_word_space(c: char) -> bool {
    matches!(c, ' ' | '\u{00A0}')
}

/// A space that is elided when a line ends on it.
pub fn is_line_end_space(c: char) -> bool {
    matches!(c,
        '\n' | ' ' | '\u{1680}'
        | '\u{2000}'..='\u{2006}' | '\u{2008}'..='\u{200A}'
        | '\u{2028}' | '\u{205F}' | '\u{3000}')
}

#[derive(Debug, Clone, Copy)]
struct Boundary {
    /// Char offset where the next segment may start.
    offset: usize,
    /// 0 for mandatory breaks and breaks after a line-end space; 1 for
    /// intra-word opportunities (after an explicit hyphen, between
    /// ideographs), which cost a hyphen-penalty multiple to take.
    badness: u32,
    /// `offset` with the trailing line-end spaces before it stripped; the
    /// end of the word for hyphenation purposes.
    trimmed_end: usize,
}

/// Iterator-style word breaker with a mutable cursor.
#[derive(Debug)]
pub struct WordBreaker {
    text_len: usize,
    boundaries: Vec<Boundary>,
    /// Index into `boundaries` of the current (upcoming) boundary.
    cursor: usize,
    /// Char offset of the previous boundary; start of the current word.
    last: usize,
}

impl WordBreaker {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();

        // linebreaks() reports byte offsets; map them back to char indices.
        let mut byte_to_char = vec![0usize; text.len() + 1];
        for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
            byte_to_char[byte_idx] = char_idx;
        }
        byte_to_char[text.len()] = chars.len();

        let mut boundaries = Vec::new();
        for (byte_offset, opportunity) in linebreaks(text) {
            let offset = byte_to_char[byte_offset];
            let mandatory = opportunity == BreakOpportunity::Mandatory;
            if !mandatory && offset > 0 && chars[offset - 1] == '\u{00AD}' {
                continue;
            }
            let after_space = offset > 0 && is_line_end_space(chars[offset - 1]);
            let mut trimmed_end = offset;
            while trimmed_end > 0 && is_line_end_space(chars[trimmed_end - 1]) {
                trimmed_end -= 1;
            }
            boundaries.push(Boundary {
                offset,
                badness: if mandatory || after_space { 0 } else { 1 },
                trimmed_end,
            });
        }

        WordBreaker { text_len: chars.len(), boundaries, cursor: 0, last: 0 }
    }

    /// Re-seed the cursor for a run breaking under `locale`, returning the
    /// first boundary strictly after `start`. UAX#14 opportunities are
    /// locale-independent, so only the position changes; the locale decides
    /// the hyphenator upstream.
    pub fn following_with_locale(&mut self, _locale: Option<&str>, start: usize) -> usize {
        self.last = start;
        self.cursor = self.boundaries.partition_point(|b| b.offset <= start);
        self.current()
    }

    /// Advance past the current boundary and return the next one.
    pub fn next(&mut self) -> usize {
        self.last = self.current();
        if self.cursor < self.boundaries.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// The current word: previous boundary up to the current one, with
    /// trailing line-end spaces stripped.
    pub fn word_range(&self) -> Range<usize> {
        let end = match self.boundaries.get(self.cursor) {
            Some(b) => b.trimmed_end,
            None => self.text_len,
        };
        self.last..end.max(self.last)
    }

    /// Badness of breaking at the current boundary.
    pub fn break_badness(&self) -> u32 {
        self.boundaries.get(self.cursor).map_or(0, |b| b.badness)
    }

    fn current(&self) -> usize {
        self.boundaries.get(self.cursor).map_or(self.text_len, |b| b.offset)
    }
}
