//! Random glyph generation

use rand::Rng;

/// First and last printable, non-space ASCII code point
const ASCII_FIRST: u8 = 33;
const ASCII_LAST: u8 = 126;

/// Characters a streak is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphSet {
    /// `!` through `~`
    Ascii,
    /// `A-Z` and `a-z`
    Letters,
}

impl GlyphSet {
    pub fn from_letters_only(letters_only: bool) -> Self {
        if letters_only {
            GlyphSet::Letters
        } else {
            GlyphSet::Ascii
        }
    }

    /// Pick one glyph uniformly from the set
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> char {
        match self {
            GlyphSet::Ascii => char::from(rng.gen_range(ASCII_FIRST..=ASCII_LAST)),
            GlyphSet::Letters => {
                // case first, then the letter, like the classic animation did
                let base = if rng.gen_bool(0.5) { b'A' } else { b'a' };
                char::from(base + rng.gen_range(0..26u8))
            }
        }
    }
}
