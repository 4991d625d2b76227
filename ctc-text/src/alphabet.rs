//! Bidirectional mapping between alphabet characters and class indices.

use crate::error::{AlphabetError, CodecError, Result};
use std::collections::{BTreeSet, HashMap};

/// Reserved CTC blank character (U+03F5).
pub const BLANK: char = 'ϵ';

/// Immutable character/index mapping.
///
/// Characters are sorted by code point before indices are assigned, so the
/// same character set always yields the same index space `[0, size)`. Column
/// `i` of a probability matrix scores character `i` of this map.
///
/// A map built with [`AlphabetMap::with_blank`] also records the CTC blank
/// index, which the decoders in [`crate::ctc`] require.
#[derive(Clone, Debug)]
pub struct AlphabetMap {
    chars: Vec<char>,
    indices: HashMap<char, usize>,
    blank: Option<usize>,
}

impl AlphabetMap {
    /// Build a map without a blank symbol.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError::Empty`] for an empty character set and
    /// [`AlphabetError::DuplicateCharacters`] naming every repeated character.
    pub fn new<I>(chars: I) -> Result<Self>
    where
        I: IntoIterator<Item = char>,
    {
        let mut chars: Vec<char> = chars.into_iter().collect();

        if chars.is_empty() {
            return Err(AlphabetError::Empty.into());
        }

        chars.sort_unstable();

        let duplicates: BTreeSet<char> = chars
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();

        if !duplicates.is_empty() {
            return Err(AlphabetError::DuplicateCharacters { chars: duplicates }.into());
        }

        Ok(Self::from_sorted(chars, None))
    }

    /// Build a CTC map, locating `blank` among `chars`.
    ///
    /// # Errors
    ///
    /// Same as [`AlphabetMap::new`], plus [`AlphabetError::MissingBlankSymbol`]
    /// when `blank` is not one of `chars`.
    pub fn with_blank<I>(chars: I, blank: char) -> Result<Self>
    where
        I: IntoIterator<Item = char>,
    {
        let mut map = Self::new(chars)?;

        let index = map
            .position(blank)
            .ok_or(AlphabetError::MissingBlankSymbol { blank })?;

        map.blank = Some(index);
        Ok(map)
    }

    /// Space and lowercase ASCII letters.
    pub fn simple() -> Self {
        Self::from_sorted(simple_chars().collect(), None)
    }

    /// Space, lowercase ASCII letters and the [`BLANK`] symbol (last index).
    pub fn simple_ctc() -> Self {
        let chars: Vec<char> = simple_chars().chain([BLANK]).collect();
        let blank = chars.len() - 1;
        Self::from_sorted(chars, Some(blank))
    }

    fn from_sorted(chars: Vec<char>, blank: Option<usize>) -> Self {
        let indices = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        Self {
            chars,
            indices,
            blank,
        }
    }

    /// Index of `c`, if it belongs to the alphabet.
    pub fn position(&self, c: char) -> Option<usize> {
        self.indices.get(&c).copied()
    }

    /// Index of `c`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownCharacters`] if `c` is not in the alphabet.
    pub fn index_of(&self, c: char) -> Result<usize> {
        self.position(c).ok_or_else(|| {
            CodecError::UnknownCharacters {
                text: c.to_string(),
                chars: BTreeSet::from([c]),
            }
            .into()
        })
    }

    /// Character at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfRange`] if `index >= size()`.
    pub fn char_at(&self, index: usize) -> Result<char> {
        self.chars.get(index).copied().ok_or_else(|| {
            CodecError::IndexOutOfRange {
                index,
                size: self.size(),
            }
            .into()
        })
    }

    /// Number of characters, blank included.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Index of the CTC blank symbol.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError::NoBlankSymbol`] for maps built without a blank.
    pub fn blank_index(&self) -> Result<usize> {
        self.blank.ok_or_else(|| AlphabetError::NoBlankSymbol.into())
    }

    /// Whether the map carries a blank symbol.
    pub fn has_blank(&self) -> bool {
        self.blank.is_some()
    }

    /// Characters in index order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

fn simple_chars() -> impl Iterator<Item = char> {
    std::iter::once(' ').chain('a'..='z')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn sorts_by_code_point() {
        let map = AlphabetMap::new(['c', 'a', ' ', 'b']).unwrap();

        assert_eq!(map.chars(), &[' ', 'a', 'b', 'c']);
        assert_eq!(map.index_of(' ').unwrap(), 0);
        assert_eq!(map.index_of('c').unwrap(), 3);
        assert_eq!(map.char_at(2).unwrap(), 'b');
    }

    #[test]
    fn views_are_inverse() {
        let map = AlphabetMap::simple_ctc();

        for index in 0..map.size() {
            let c = map.char_at(index).unwrap();
            assert_eq!(map.index_of(c).unwrap(), index);
        }
    }

    #[test]
    fn rejects_duplicates() {
        let err = AlphabetMap::new(['a', 'b', 'a', 'c', 'c']).unwrap_err();

        assert!(matches!(
            err,
            Error::Alphabet(AlphabetError::DuplicateCharacters { ref chars })
            if chars == &BTreeSet::from(['a', 'c'])
        ));
    }

    #[test]
    fn rejects_empty() {
        let err = AlphabetMap::new(Vec::new()).unwrap_err();

        assert!(matches!(err, Error::Alphabet(AlphabetError::Empty)));
    }

    #[test]
    fn locates_blank() {
        let map = AlphabetMap::with_blank(['b', BLANK, 'a'], BLANK).unwrap();

        assert_eq!(map.blank_index().unwrap(), 2);
        assert!(map.has_blank());
    }

    #[test]
    fn missing_blank() {
        let err = AlphabetMap::with_blank(['a', 'b'], BLANK).unwrap_err();

        assert!(matches!(
            err,
            Error::Alphabet(AlphabetError::MissingBlankSymbol { blank: BLANK })
        ));
    }

    #[test]
    fn plain_map_has_no_blank() {
        let map = AlphabetMap::simple();

        assert_eq!(map.size(), 27);
        assert!(matches!(
            map.blank_index(),
            Err(Error::Alphabet(AlphabetError::NoBlankSymbol))
        ));
    }

    #[test]
    fn simple_ctc_layout() {
        let map = AlphabetMap::simple_ctc();

        assert_eq!(map.size(), 28);
        assert_eq!(map.index_of(' ').unwrap(), 0);
        assert_eq!(map.index_of('a').unwrap(), 1);
        assert_eq!(map.index_of('z').unwrap(), 26);
        assert_eq!(map.blank_index().unwrap(), 27);
    }

    #[test]
    fn lookup_failures() {
        let map = AlphabetMap::simple();

        assert!(matches!(
            map.index_of('#'),
            Err(Error::Codec(CodecError::UnknownCharacters { .. }))
        ));
        assert!(matches!(
            map.char_at(27),
            Err(Error::Codec(CodecError::IndexOutOfRange {
                index: 27,
                size: 27
            }))
        ));
    }
}
