//! Text normalization and character-level encoding.

use crate::alphabet::AlphabetMap;
use crate::error::{CodecError, Result};
use ndarray::{Array1, Array2, Axis};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize text before encoding.
///
/// Lower-cases, replaces every character that is neither a word character nor
/// whitespace with a space, collapses whitespace runs to one space and trims
/// both ends. `"Don't  stop!"` becomes `"don t stop"`.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = NON_WORD.replace_all(&lowered, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

/// Index sequence produced by [`TextCodec::encode`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedSequence(Vec<usize>);

impl EncodedSequence {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// Batch of one: a `(1, len)` array of target indices.
    pub fn to_array(&self) -> Array2<i64> {
        Array1::from_iter(self.0.iter().map(|&i| i as i64)).insert_axis(Axis(0))
    }
}

impl AsRef<[usize]> for EncodedSequence {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

/// Encodes text to indices and back using a shared [`AlphabetMap`].
///
/// Decoding here is a plain lookup. Blank removal and repeat collapsing
/// belong to [`crate::ctc`].
#[derive(Clone, Debug)]
pub struct TextCodec {
    alphabet: Arc<AlphabetMap>,
}

impl TextCodec {
    pub fn new(alphabet: Arc<AlphabetMap>) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &AlphabetMap {
        &self.alphabet
    }

    /// Normalize and encode `text`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownCharacters`] carrying the normalized text
    /// and every character missing from the alphabet.
    pub fn encode(&self, text: &str) -> Result<EncodedSequence> {
        let text = normalize(text);
        let mut unknown = BTreeSet::new();

        let indices: Vec<usize> = text
            .chars()
            .filter_map(|c| {
                let index = self.alphabet.position(c);
                if index.is_none() {
                    unknown.insert(c);
                }
                index
            })
            .collect();

        if !unknown.is_empty() {
            tracing::debug!(?unknown, "unknown characters in text");
            return Err(CodecError::UnknownCharacters {
                text,
                chars: unknown,
            }
            .into());
        }

        Ok(EncodedSequence(indices))
    }

    /// Map each index to its character.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfRange`] on the first invalid index.
    pub fn decode(&self, indices: &[usize]) -> Result<String> {
        indices.iter().map(|&i| self.alphabet.char_at(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    fn codec() -> TextCodec {
        TextCodec::new(Arc::new(AlphabetMap::simple()))
    }

    #[test]
    fn splits_on_punctuation() {
        assert_eq!(normalize("Don't"), "don t");
        assert_eq!(normalize("  Hello,\tWORLD!!\n"), "hello world");
        assert_eq!(normalize("snake_case 42"), "snake_case 42");
        assert_eq!(normalize("?!"), "");
    }

    #[test]
    fn unicode_case_mapping_is_stable() {
        for text in ["İSTANBUL", "STRAẞE", "ΟΔΟΣ. ΣΑΣ", "Cafe\u{301}!", "ǅungla"] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once, "{text}");
        }
        assert_eq!(normalize("ΟΔΟΣ."), "οδο\u{3c2}");
    }

    #[test]
    fn encodes_through_normalization() {
        let encoded = codec().encode("Hi, you").unwrap();

        assert_eq!(encoded.as_slice(), &[8, 9, 0, 25, 15, 21]);
    }

    #[test]
    fn reports_all_unknown_characters() {
        let err = codec().encode("ab 1 c_2").unwrap_err();

        match err {
            Error::Codec(CodecError::UnknownCharacters { text, chars }) => {
                assert_eq!(text, "ab 1 c_2");
                assert_eq!(chars, BTreeSet::from(['1', '2', '_']));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_text() {
        let codec = codec();
        let encoded = codec.encode("").unwrap();

        assert!(encoded.is_empty());
        assert_eq!(codec.decode(encoded.as_slice()).unwrap(), "");
    }

    #[test]
    fn decode_rejects_out_of_range() {
        let err = codec().decode(&[1, 27]).unwrap_err();

        assert!(matches!(
            err,
            Error::Codec(CodecError::IndexOutOfRange {
                index: 27,
                size: 27
            })
        ));
    }

    #[test]
    fn batch_row() {
        let array = codec().encode("abc").unwrap().to_array();

        assert_eq!(array.shape(), &[1, 3]);
        assert_eq!(array[[0, 2]], 3);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "\\PC{0,48}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn round_trips_alphabet_text(text in "[a-zA-Z \t]{0,48}") {
            let codec = codec();
            let encoded = codec.encode(&text).unwrap();
            prop_assert_eq!(codec.decode(encoded.as_slice()).unwrap(), normalize(&text));
        }
    }
}
