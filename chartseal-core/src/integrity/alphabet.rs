//! Index alphabet used to keep protected paths and config keys out of plain text
//!
//! A token is a list of small indices into an ordered character table. Decoding
//! maps each index to its character and concatenates the result in order.

use crate::integrity::error::SealError;
use std::borrow::Cow;
use std::collections::HashSet;

/// Lowercase, uppercase, digits, then the path symbols `\ / . - _`
///
/// Index 62 is the backslash every bundled path is separated with.
pub const STANDARD_CHARSET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789\\/.-_";

/// Largest alphabet a `u8` index can address
const MAX_ALPHABET_LEN: usize = u8::MAX as usize + 1;

/// Ordered, immutable table of unique characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a character table
    pub fn new(charset: &str) -> Result<Self, SealError> {
        let chars: Vec<char> = charset.chars().collect();

        if chars.is_empty() {
            return Err(SealError::InvalidAlphabet {
                reason: "alphabet is empty".to_string(),
            });
        }

        if chars.len() > MAX_ALPHABET_LEN {
            return Err(SealError::InvalidAlphabet {
                reason: format!(
                    "alphabet has {} characters, at most {} are addressable",
                    chars.len(),
                    MAX_ALPHABET_LEN
                ),
            });
        }

        let mut seen = HashSet::with_capacity(chars.len());
        for ch in &chars {
            if !seen.insert(*ch) {
                return Err(SealError::InvalidAlphabet {
                    reason: format!("duplicate character {ch:?}"),
                });
            }
        }

        Ok(Alphabet { chars })
    }

    /// The alphabet every bundled token is written against
    pub fn standard() -> Self {
        Alphabet {
            chars: STANDARD_CHARSET.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, if the index is in range
    pub fn char_at(&self, index: u8) -> Option<char> {
        self.chars.get(usize::from(index)).copied()
    }

    /// Position of `ch` in the table
    pub fn index_of(&self, ch: char) -> Option<u8> {
        self.chars
            .iter()
            .position(|c| *c == ch)
            .and_then(|pos| u8::try_from(pos).ok())
    }

    /// Decode a sequence of indices into a string
    ///
    /// Fails on the first index that falls outside the table. Tokens are
    /// build-time constants, so a failure here means the table and the token
    /// disagree.
    pub fn decode(&self, indices: &[u8]) -> Result<String, SealError> {
        indices
            .iter()
            .map(|&index| {
                self.char_at(index).ok_or(SealError::IndexOutOfRange {
                    index: usize::from(index),
                    len: self.len(),
                })
            })
            .collect()
    }

    /// Inverse of [`Alphabet::decode`], for producing new tokens
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, SealError> {
        text.chars()
            .map(|ch| self.index_of(ch).ok_or(SealError::UnencodableCharacter { ch }))
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::standard()
    }
}

/// A path or key fragment stored as alphabet indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedToken(Cow<'static, [u8]>);

impl EncodedToken {
    /// Wrap a compile-time index table
    pub const fn from_static(indices: &'static [u8]) -> Self {
        EncodedToken(Cow::Borrowed(indices))
    }

    /// Encode a plain string against `alphabet`
    pub fn encode(alphabet: &Alphabet, text: &str) -> Result<Self, SealError> {
        Ok(EncodedToken(Cow::Owned(alphabet.encode(text)?)))
    }

    pub fn indices(&self) -> &[u8] {
        &self.0
    }

    pub fn decode(&self, alphabet: &Alphabet) -> Result<String, SealError> {
        alphabet.decode(&self.0)
    }
}
