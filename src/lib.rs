//! # parabreak
//!
//! Total-fit line breaking for a text-layout engine.
//!
//! Greedy breakers decide each line in isolation and leave the damage —
//! loose lines, rivers, a stranded last word — to the lines below. parabreak
//! instead scores every way of breaking the paragraph at once and returns
//! the cheapest one: squared leftover width per line, plus penalties for
//! hyphens, desperate mid-word breaks, and sheer line count.
//!
//! The crate deliberately does *not* shape text. It consumes a paragraph
//! somebody already measured — one advance and one vertical extent per code
//! point, plus directional/style runs — and a per-line width oracle, and
//! returns break offsets with per-line widths, extents, and hyphen-edit
//! flags.
//!
//! ## Architecture
//!
//! ```text
//! text + measurements
//!       ↓
//!   [word]     — UAX#14 boundary cursor, space classes
//!   [hyphen]   — soft/explicit hyphens, dictionary patterns, edit flags
//!       ↓
//!   [optimal]  — candidate enumeration → dynamic program → lines
//!       ↓
//! LineBreakResult (break points, widths, extents, hyphen edits)
//! ```
//!
//! [`measure`] holds the input model (`MeasuredText`, `Run`, the
//! `LineWidth` oracle) and [`bidi`] splits plain text into directional runs
//! for callers that don't already have them.

pub mod bidi;
pub mod error;
pub mod hyphen;
pub mod measure;
pub mod optimal;
pub mod style;
pub mod word;

pub use error::BreakError;
pub use measure::{ConstantLineWidth, Extent, LineWidth, MeasuredText, Paint, Run, TabulatedLineWidth};
pub use optimal::{break_line_optimal, LineBreakResult};
pub use style::{BreakStrategy, Direction, HyphenationFrequency};
