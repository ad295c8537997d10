//! Directional-run extraction.
//!
//! The breaker itself never resolves bidi: it consumes runs whose direction
//! is already known. This module is the convenience in front of that — it
//! runs UAX#9 via `unicode-bidi` and reports contiguous same-level spans as
//! `(char range, is_rtl)` pairs for callers that start from plain text.
//! Visual reordering of broken lines is the renderer's job, not ours.

use crate::style::Direction;
use std::ops::Range;
use unicode_bidi::{BidiInfo, Level};

/// Split `text` into directional runs covering the whole paragraph.
///
/// Pure-LTR text yields a single LTR run. `direction` controls the
/// paragraph-level embedding: `Ltr`/`Rtl` force it, `Auto` detects it from
/// the first strong character.
pub fn directional_runs(text: &str, direction: Direction) -> Vec<(Range<usize>, bool)> {
    if text.is_empty() {
        return vec![];
    }

    let para_level = match direction {
        Direction::Ltr => Some(Level::ltr()),
        Direction::Rtl => Some(Level::rtl()),
        Direction::Auto => None,
    };
    let bidi_info = BidiInfo::new(text, para_level);

    // Each paragraph of a document is broken separately, so only the first
    // bidi paragraph matters here.
    let paragraph = match bidi_info.paragraphs.first() {
        Some(p) => p,
        None => return vec![],
    };

    // The levels array is indexed by byte position; collapse it to one
    // level per char.
    let mut char_levels: Vec<Level> = Vec::with_capacity(text.len());
    for (byte_idx, _) in text.char_indices() {
        if byte_idx >= paragraph.range.start && byte_idx < paragraph.range.end {
            char_levels.push(bidi_info.levels[byte_idx]);
        }
    }
    if char_levels.is_empty() {
        return vec![];
    }

    let mut runs = Vec::new();
    let mut run_start = 0;
    for i in 1..char_levels.len() {
        if char_levels[i] != char_levels[run_start] {
            runs.push((run_start..i, char_levels[run_start].is_rtl()));
            run_start = i;
        }
    }
    runs.push((run_start..char_levels.len(), char_levels[run_start].is_rtl()));
    runs
}
