//! Storage for alphabet-encoded sequences.
//!
//! Training data is stored in an [`EncodedSequence`], which only ever
//! contains symbols of the alphabet. Sequences to be scanned are stored in
//! a [`MaskedSequence`], where characters outside of the alphabet are kept
//! as masked positions that do not contribute to any score.

use std::cmp::PartialEq;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::ops::Index;
use std::str::FromStr;

use super::abc::Alphabet;
use super::abc::Symbol;
use super::err::InvalidInput;

// --- EncodedSequence ---------------------------------------------------------

/// A biological sequence encoded with an alphabet.
#[derive(Clone, Debug)]
pub struct EncodedSequence<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: Vec<A::Symbol>,
}

impl<A: Alphabet> EncodedSequence<A> {
    /// Create a new encoded sequence.
    pub fn new(data: Vec<A::Symbol>) -> Self {
        Self {
            data,
            alphabet: std::marker::PhantomData,
        }
    }

    /// Create a new encoded sequence from a textual representation.
    ///
    /// Fails on the first character that is not part of the alphabet.
    pub fn encode<S: AsRef<str>>(sequence: S) -> Result<Self, InvalidInput> {
        sequence
            .as_ref()
            .chars()
            .enumerate()
            .map(|(i, c)| A::Symbol::from_char(c).map_err(|e| InvalidInput::from((i, e))))
            .collect::<Result<_, _>>()
            .map(Self::new)
    }

    /// Return the number of symbols in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return whether the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the symbols in the sequence.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, A::Symbol> {
        self.data.iter()
    }
}

impl<A: Alphabet> AsRef<EncodedSequence<A>> for EncodedSequence<A> {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<A: Alphabet> AsRef<[<A as Alphabet>::Symbol]> for EncodedSequence<A> {
    fn as_ref(&self) -> &[<A as Alphabet>::Symbol] {
        self.data.as_slice()
    }
}

impl<A: Alphabet> Default for EncodedSequence<A> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<A: Alphabet> Display for EncodedSequence<A> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for c in self.data.iter() {
            write!(f, "{}", c.as_char())?;
        }
        Ok(())
    }
}

impl<A: Alphabet> FromStr for EncodedSequence<A> {
    type Err = InvalidInput;
    fn from_str(seq: &str) -> Result<Self, Self::Err> {
        Self::encode(seq)
    }
}

impl<A: Alphabet> From<Vec<A::Symbol>> for EncodedSequence<A> {
    fn from(data: Vec<A::Symbol>) -> Self {
        Self::new(data)
    }
}

impl<A: Alphabet> Index<usize> for EncodedSequence<A> {
    type Output = A::Symbol;
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a, A: Alphabet> IntoIterator for &'a EncodedSequence<A> {
    type Item = &'a A::Symbol;
    type IntoIter = std::slice::Iter<'a, A::Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<A, S> PartialEq<S> for EncodedSequence<A>
where
    A: Alphabet,
    S: AsRef<[<A as Alphabet>::Symbol]>,
{
    fn eq(&self, other: &S) -> bool {
        self.data.as_slice() == other.as_ref()
    }
}

// --- MaskedSequence ----------------------------------------------------------

/// A sequence to be scanned, where unknown characters are masked.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedSequence<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: Vec<Option<A::Symbol>>,
}

impl<A: Alphabet> MaskedSequence<A> {
    /// Create a new masked sequence.
    pub fn new(data: Vec<Option<A::Symbol>>) -> Self {
        Self {
            data,
            alphabet: std::marker::PhantomData,
        }
    }

    /// Encode a textual sequence, masking characters outside the alphabet.
    pub fn encode<S: AsRef<str>>(sequence: S) -> Self {
        sequence
            .as_ref()
            .chars()
            .map(|c| A::Symbol::from_char(c).ok())
            .collect::<Vec<_>>()
            .into()
    }

    /// Encode a raw ASCII sequence, masking bytes outside the alphabet.
    pub fn encode_bytes<S: AsRef<[u8]>>(sequence: S) -> Self {
        sequence
            .as_ref()
            .iter()
            .map(|&c| A::Symbol::from_ascii(c).ok())
            .collect::<Vec<_>>()
            .into()
    }

    /// Return the number of positions in the sequence, masked or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return whether the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of masked positions.
    pub fn masked(&self) -> usize {
        self.data.iter().filter(|x| x.is_none()).count()
    }

    /// Iterate over the positions of the sequence.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Option<A::Symbol>> {
        self.data.iter()
    }
}

impl<A: Alphabet> AsRef<MaskedSequence<A>> for MaskedSequence<A> {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<A: Alphabet> AsRef<[Option<A::Symbol>]> for MaskedSequence<A> {
    fn as_ref(&self) -> &[Option<A::Symbol>] {
        self.data.as_slice()
    }
}

impl<A: Alphabet> Default for MaskedSequence<A> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<A: Alphabet> From<Vec<Option<A::Symbol>>> for MaskedSequence<A> {
    fn from(data: Vec<Option<A::Symbol>>) -> Self {
        Self::new(data)
    }
}

impl<A: Alphabet> From<EncodedSequence<A>> for MaskedSequence<A> {
    fn from(seq: EncodedSequence<A>) -> Self {
        Self::new(seq.data.into_iter().map(Some).collect())
    }
}

impl<A: Alphabet> FromStr for MaskedSequence<A> {
    type Err = std::convert::Infallible;
    fn from_str(seq: &str) -> Result<Self, Self::Err> {
        Ok(Self::encode(seq))
    }
}

impl<A: Alphabet> Index<usize> for MaskedSequence<A> {
    type Output = Option<A::Symbol>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a, A: Alphabet> IntoIterator for &'a MaskedSequence<A> {
    type Item = &'a Option<A::Symbol>;
    type IntoIter = std::slice::Iter<'a, Option<A::Symbol>>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
