//! Breaking options.
//!
//! The small set of knobs a caller turns: which total-fit strategy to use,
//! how eager hyphenation should be, and the paragraph direction hint used
//! when splitting text into directional runs.

use serde::{Deserialize, Serialize};

/// How the optimizer scores the last line of the paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakStrategy {
    /// The last line may be arbitrarily short at no cost; hyphenating into
    /// it is penalized extra. Best for body text.
    HighQuality,
    /// The last line is scored like any other, which evens out line lengths.
    /// Best for short blocks such as headlines and captions.
    Balanced,
}

impl Default for BreakStrategy {
    fn default() -> Self {
        BreakStrategy::HighQuality
    }
}

/// How eagerly words are probed for hyphenation points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HyphenationFrequency {
    /// Never probe the hyphenator. Desperate breaks can still fire for
    /// words wider than the narrowest line.
    None,
    /// Probe the hyphenator but quadruple the hyphen penalty, so hyphens
    /// appear only when they buy a clearly better layout.
    Normal,
    /// Probe the hyphenator at the base penalty.
    Full,
}

impl Default for HyphenationFrequency {
    fn default() -> Self {
        HyphenationFrequency::Normal
    }
}

/// Paragraph-level base direction for directional-run splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Ltr,
    Rtl,
    /// Detect from the first strong character.
    Auto,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Auto
    }
}
