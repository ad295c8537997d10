//! Measured-paragraph model.
//!
//! The breaker does not shape text; it consumes measurements somebody else
//! produced. A `MeasuredText` carries one advance and one vertical extent
//! per code point (zero advance marks positions that are not grapheme
//! boundaries: combining sequences, the interior of replacement spans) plus
//! the directional/style runs that partition the paragraph.
//!
//! The per-line target width comes from a `LineWidth` oracle so shaped
//! regions (drop caps, exclusion zones) can vary it line by line.

use crate::bidi;
use crate::error::BreakError;
use crate::hyphen::{EndHyphenEdit, StartHyphenEdit};
use crate::style::Direction;
use std::ops::Range;

/// Paint metrics of a run, as far as the breaker cares: enough to scale
/// penalties with the font and to price a hyphen glyph.
#[derive(Debug, Clone, Copy)]
pub struct Paint {
    /// Font size in layout units.
    pub size: f32,
    /// Horizontal glyph scale.
    pub scale_x: f32,
    /// Advance of the hyphen glyph at this paint.
    pub hyphen_width: f32,
}

/// Vertical extent of a code point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub ascent: f32,
    pub descent: f32,
}

impl Extent {
    /// Grow to cover `other` as well.
    pub fn extend_by(&mut self, other: &Extent) {
        self.ascent = self.ascent.max(other.ascent);
        self.descent = self.descent.max(other.descent);
    }
}

/// A contiguous range of the paragraph sharing direction, locale, and paint.
#[derive(Debug, Clone)]
pub struct Run {
    /// Char range within the paragraph.
    pub range: Range<usize>,
    pub is_rtl: bool,
    /// BCP-47 tag driving word breaking and hyphenation; `None` falls back
    /// to the default hyphenation locale.
    pub locale: Option<String>,
    pub paint: Paint,
    /// Whether words of this run may be probed for hyphenation points.
    pub hyphenation: bool,
}

impl Run {
    pub fn can_hyphenate(&self) -> bool {
        self.hyphenation
    }

    /// Advance of a hyphenated fragment with the requested edits applied.
    ///
    /// `widths` is the full paragraph advance array; `piece` the fragment's
    /// char range. An inserted hyphen adds the paint's hyphen advance; a
    /// replaced code point (soft hyphen) trades its own advance for the
    /// hyphen's.
    pub fn measure_hyphen_piece(
        &self,
        widths: &[f32],
        piece: Range<usize>,
        start_edit: StartHyphenEdit,
        end_edit: EndHyphenEdit,
    ) -> f32 {
        let mut width: f64 = widths[piece.clone()].iter().map(|w| *w as f64).sum();
        if start_edit == StartHyphenEdit::InsertHyphen {
            width += self.paint.hyphen_width as f64;
        }
        match end_edit {
            EndHyphenEdit::NoEdit => {}
            EndHyphenEdit::InsertHyphen => width += self.paint.hyphen_width as f64,
            EndHyphenEdit::ReplaceWithHyphen => {
                if piece.end > piece.start {
                    width -= widths[piece.end - 1] as f64;
                }
                width += self.paint.hyphen_width as f64;
            }
        }
        width as f32
    }
}

/// A paragraph with per-code-point measurements and its runs.
#[derive(Debug, Clone)]
pub struct MeasuredText {
    /// Advance per code point; 0.0 where the position is not a grapheme
    /// boundary.
    pub widths: Vec<f32>,
    /// Vertical extent per code point.
    pub extents: Vec<Extent>,
    /// Non-empty, disjoint, in-order ranges covering the paragraph.
    pub runs: Vec<Run>,
}

impl MeasuredText {
    /// Build a measured paragraph, validating that the measurement arrays
    /// are parallel to `text`.
    pub fn new(
        text: &str,
        widths: Vec<f32>,
        extents: Vec<Extent>,
        runs: Vec<Run>,
    ) -> Result<Self, BreakError> {
        let expected = text.chars().count();
        if widths.len() != expected {
            return Err(BreakError::MismatchedMetrics { expected, actual: widths.len() });
        }
        if extents.len() != expected {
            return Err(BreakError::MismatchedMetrics { expected, actual: extents.len() });
        }
        Ok(MeasuredText { widths, extents, runs })
    }

    /// Build a measured paragraph whose runs come from bidi analysis of
    /// `text`, all sharing one locale and paint.
    pub fn with_direction(
        text: &str,
        widths: Vec<f32>,
        extents: Vec<Extent>,
        direction: Direction,
        locale: Option<&str>,
        paint: Paint,
        hyphenation: bool,
    ) -> Result<Self, BreakError> {
        let runs = bidi::directional_runs(text, direction)
            .into_iter()
            .map(|(range, is_rtl)| Run {
                range,
                is_rtl,
                locale: locale.map(str::to_owned),
                paint,
                hyphenation,
            })
            .collect();
        Self::new(text, widths, extents, runs)
    }
}

/// Per-line target width oracle.
pub trait LineWidth {
    /// Target width of the given 0-based line.
    fn width_at(&self, line_number: usize) -> f32;
    /// The narrowest width any line can have; words wider than this trigger
    /// desperate break candidates.
    fn min_width(&self) -> f32;
}

/// The common case: every line has the same target width.
#[derive(Debug, Clone, Copy)]
pub struct ConstantLineWidth(pub f32);

impl LineWidth for ConstantLineWidth {
    fn width_at(&self, _line_number: usize) -> f32 {
        self.0
    }

    fn min_width(&self) -> f32 {
        self.0
    }
}

/// Explicit widths for the first lines, then a rest width (text flowing
/// around a float, first-line indents).
#[derive(Debug, Clone)]
pub struct TabulatedLineWidth {
    firsts: Vec<f32>,
    rest: f32,
}

impl TabulatedLineWidth {
    pub fn new(firsts: Vec<f32>, rest: f32) -> Self {
        TabulatedLineWidth { firsts, rest }
    }
}

impl LineWidth for TabulatedLineWidth {
    fn width_at(&self, line_number: usize) -> f32 {
        self.firsts.get(line_number).copied().unwrap_or(self.rest)
    }

    fn min_width(&self) -> f32 {
        self.firsts.iter().fold(self.rest, |acc, w| acc.min(*w))
    }
}
