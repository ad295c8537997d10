//! Hyphenation classification and hyphen edits.
//!
//! A hyphenator maps a word to one classification per char: whether a line
//! may end just before that char, and which glyph edit the break implies on
//! each side. Soft hyphens override everything; explicit hyphens come next;
//! dictionary patterns (the `hypher` crate) handle plain alphabetic words.
//!
//! The per-line "edit" pair — what happens at the end of the broken line
//! and at the start of the next — is packed into a single flag byte so the
//! break result can carry it in one parallel array.

use hypher::Lang;

/// The soft hyphen, U+00AD: an invisible marker that becomes a hyphen glyph
/// only when a line breaks at it.
pub const CHAR_SOFT_HYPHEN: char = '\u{00AD}';

/// Classification of one position inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyphenationType {
    /// Not a legal break position.
    DontBreak,
    /// Break here and insert a hyphen glyph at the end of the line.
    BreakAndInsertHyphen,
    /// Break here without editing either side (explicit hyphens, desperate
    /// breaks).
    BreakAndDontInsertHyphen,
    /// Break here and replace the preceding code point with a hyphen glyph
    /// (soft hyphens).
    BreakAndReplaceWithHyphen,
    /// Break here and repeat the hyphen at the start of the next line
    /// (Polish and Slovenian orthography for explicit hyphens).
    BreakAndInsertHyphenAtNextLine,
}

/// Glyph edit applied at the start of a line that begins mid-word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartHyphenEdit {
    NoEdit = 0,
    InsertHyphen = 1,
}

/// Glyph edit applied at the end of a line that breaks mid-word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndHyphenEdit {
    NoEdit = 0,
    InsertHyphen = 1,
    ReplaceWithHyphen = 2,
}

/// Edit applied at the end of the line that breaks at a position of this
/// type.
pub fn edit_for_this_line(ty: HyphenationType) -> EndHyphenEdit {
    match ty {
        HyphenationType::BreakAndInsertHyphen => EndHyphenEdit::InsertHyphen,
        HyphenationType::BreakAndReplaceWithHyphen => EndHyphenEdit::ReplaceWithHyphen,
        _ => EndHyphenEdit::NoEdit,
    }
}

/// Edit applied at the start of the line that follows a break of this type.
pub fn edit_for_next_line(ty: HyphenationType) -> StartHyphenEdit {
    match ty {
        HyphenationType::BreakAndInsertHyphenAtNextLine => StartHyphenEdit::InsertHyphen,
        _ => StartHyphenEdit::NoEdit,
    }
}

const END_EDIT_BITS: u8 = 3;

/// Pack a start/end edit pair into one flag byte: the end edit occupies the
/// low bits, the start edit the bits above them.
pub fn pack_hyphen_edit(start: StartHyphenEdit, end: EndHyphenEdit) -> u8 {
    ((start as u8) << END_EDIT_BITS) | end as u8
}

/// Start edit of a packed flag byte.
pub fn start_hyphen_edit(flags: u8) -> StartHyphenEdit {
    if flags >> END_EDIT_BITS == StartHyphenEdit::InsertHyphen as u8 {
        StartHyphenEdit::InsertHyphen
    } else {
        StartHyphenEdit::NoEdit
    }
}

/// End edit of a packed flag byte.
pub fn end_hyphen_edit(flags: u8) -> EndHyphenEdit {
    match flags & ((1 << END_EDIT_BITS) - 1) {
        x if x == EndHyphenEdit::InsertHyphen as u8 => EndHyphenEdit::InsertHyphen,
        x if x == EndHyphenEdit::ReplaceWithHyphen as u8 => EndHyphenEdit::ReplaceWithHyphen,
        _ => EndHyphenEdit::NoEdit,
    }
}

// Words outside this length band are never pattern-hyphenated: short words
// have no useful interior, and no dictionary carries longer entries.
const MIN_PATTERN_WORD_LEN: usize = 4;
const MAX_PATTERN_WORD_LEN: usize = 45;

/// Per-word hyphenation for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Hyphenator {
    lang: Option<Lang>,
    repeats_explicit_hyphen: bool,
}

impl Hyphenator {
    /// Classify every position of `word`. The result has the same length as
    /// `word`; entry *i* describes breaking immediately before char *i*, so
    /// entry 0 is always `DontBreak`.
    pub fn hyphenate(&self, word: &[char]) -> Vec<HyphenationType> {
        let mut out = vec![HyphenationType::DontBreak; word.len()];
        if word.len() < 2 {
            return out;
        }

        // Soft hyphens are authorial break points and take precedence over
        // everything, including patterns.
        if word.contains(&CHAR_SOFT_HYPHEN) {
            for i in 1..word.len() {
                if word[i - 1] == CHAR_SOFT_HYPHEN {
                    out[i] = HyphenationType::BreakAndReplaceWithHyphen;
                }
            }
            return out;
        }

        // Explicit hyphens inside a word: break after them without editing,
        // except where the orthography repeats the hyphen on the next line.
        let mut has_explicit_hyphen = false;
        for i in 1..word.len() {
            if matches!(word[i - 1], '-' | '\u{2010}') {
                out[i] = if self.repeats_explicit_hyphen {
                    HyphenationType::BreakAndInsertHyphenAtNextLine
                } else {
                    HyphenationType::BreakAndDontInsertHyphen
                };
                has_explicit_hyphen = true;
            }
        }
        if has_explicit_hyphen {
            return out;
        }

        let lang = match self.lang {
            Some(lang) => lang,
            None => return out,
        };
        if word.len() < MIN_PATTERN_WORD_LEN
            || word.len() > MAX_PATTERN_WORD_LEN
            || !word.iter().all(|c| c.is_alphabetic())
        {
            return out;
        }

        let text: String = word.iter().collect();
        let mut offset = 0;
        for syllable in hypher::hyphenate(&text, lang) {
            if offset > 0 && offset < word.len() {
                out[offset] = HyphenationType::BreakAndInsertHyphen;
            }
            offset += syllable.chars().count();
        }
        out
    }
}

/// The locale → hyphenator registry.
pub struct HyphenatorMap;

impl HyphenatorMap {
    /// Resolve a BCP-47 tag to a hyphenator. Unknown languages get a
    /// patternless hyphenator that still honors soft and explicit hyphens;
    /// an absent locale defaults to English.
    pub fn lookup(locale: Option<&str>) -> Hyphenator {
        let tag = match locale {
            Some(tag) => tag,
            None => {
                return Hyphenator { lang: Some(Lang::English), repeats_explicit_hyphen: false }
            }
        };
        let primary = tag.split('-').next().unwrap_or(tag).to_lowercase();
        Hyphenator {
            lang: lang_for_primary(&primary),
            repeats_explicit_hyphen: matches!(primary.as_str(), "pl" | "sl"),
        }
    }
}

/// Map a BCP-47 primary language subtag to a `hypher` pattern set.
fn lang_for_primary(primary: &str) -> Option<Lang> {
    match primary {
        "af" => Some(Lang::Afrikaans),
        "sq" => Some(Lang::Albanian),
        "be" => Some(Lang::Belarusian),
        "bg" => Some(Lang::Bulgarian),
        "ca" => Some(Lang::Catalan),
        "hr" => Some(Lang::Croatian),
        "cs" => Some(Lang::Czech),
        "da" => Some(Lang::Danish),
        "nl" => Some(Lang::Dutch),
        "en" => Some(Lang::English),
        "et" => Some(Lang::Estonian),
        "fi" => Some(Lang::Finnish),
        "fr" => Some(Lang::French),
        "ka" => Some(Lang::Georgian),
        "de" => Some(Lang::German),
        "el" => Some(Lang::Greek),
        "hu" => Some(Lang::Hungarian),
        "is" => Some(Lang::Icelandic),
        "it" => Some(Lang::Italian),
        "ku" => Some(Lang::Kurmanji),
        "la" => Some(Lang::Latin),
        "lt" => Some(Lang::Lithuanian),
        "mn" => Some(Lang::Mongolian),
        "nb" | "nn" | "no" => Some(Lang::Norwegian),
        "pl" => Some(Lang::Polish),
        "pt" => Some(Lang::Portuguese),
        "ru" => Some(Lang::Russian),
        "sr" => Some(Lang::Serbian),
        "sk" => Some(Lang::Slovak),
        "sl" => Some(Lang::Slovenian),
        "es" => Some(Lang::Spanish),
        "sv" => Some(Lang::Swedish),
        "tr" => Some(Lang::Turkish),
        "tk" => Some(Lang::Turkmen),
        "uk" => Some(Lang::Ukrainian),
        _ => None,
    }
}
