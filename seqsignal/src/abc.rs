//! Digital encoding for nucleotide sequences using an alphabet.

use std::fmt::Debug;

use generic_array::ArrayLength;
use generic_array::GenericArray;
use typenum::consts::U4;
use typenum::marker_traits::NonZero;
use typenum::marker_traits::Unsigned;

use super::err::InvalidInput;
use super::err::InvalidSymbol;

/// The null probability used when none is given, `1/4` for nucleotides.
pub const DEFAULT_NULL_PROBABILITY: f64 = 0.25;

/// The pseudocount added to every cell when none is given.
pub const DEFAULT_PSEUDOCOUNT: f64 = 1.0;

// --- Symbol ------------------------------------------------------------------

/// A symbol from a biological alphabet.
pub trait Symbol: Sized + Copy + Eq + Debug + Send + Sync {
    /// View this symbol as a zero-based index.
    fn as_index(&self) -> usize;
    /// View this symbol as a string character.
    fn as_char(&self) -> char {
        self.as_ascii() as char
    }
    /// Parse a string character into a symbol.
    fn from_char(c: char) -> Result<Self, InvalidSymbol> {
        if c.is_ascii() {
            Self::from_ascii(c as u8)
        } else {
            Err(InvalidSymbol(c))
        }
    }
    /// View this symbol as an ASCII charater.
    fn as_ascii(&self) -> u8;
    /// Parse an ASCII character into a symbol.
    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol>;
}

// --- Alphabet ----------------------------------------------------------------

/// A closed biological alphabet with a fixed symbol-to-index mapping.
pub trait Alphabet: Debug + Copy + Default + Send + Sync + 'static {
    type Symbol: Symbol;
    type K: Unsigned + NonZero + ArrayLength + PartialEq + Debug;

    /// Get all the symbols of this alphabet, in index order.
    fn symbols() -> &'static [Self::Symbol];

    /// Get a string with all symbols from this alphabet, in index order.
    fn as_str() -> &'static str;
}

// --- DNA ---------------------------------------------------------------------

/// The DNA alphabet composed of the 4 deoxyribonucleotides.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dna;

impl Alphabet for Dna {
    type Symbol = Nucleotide;
    type K = U4;

    fn symbols() -> &'static [Nucleotide] {
        &[Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T]
    }

    fn as_str() -> &'static str {
        "ACGT"
    }
}

/// A deoxyribonucleotide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Nucleotide {
    /// Adenine.
    A = 0,
    /// Cytosine.
    C = 1,
    /// Guanine.
    G = 2,
    /// Thymine.
    T = 3,
}

impl From<Nucleotide> for char {
    fn from(n: Nucleotide) -> char {
        n.as_char()
    }
}

impl Symbol for Nucleotide {
    fn as_index(&self) -> usize {
        *self as usize
    }

    fn as_ascii(&self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::C => b'C',
            Nucleotide::G => b'G',
            Nucleotide::T => b'T',
        }
    }

    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol> {
        match c {
            b'A' => Ok(Nucleotide::A),
            b'C' => Ok(Nucleotide::C),
            b'G' => Ok(Nucleotide::G),
            b'T' => Ok(Nucleotide::T),
            _ => Err(InvalidSymbol(c as char)),
        }
    }
}

// --- Background --------------------------------------------------------------

/// The null model of an alphabet, giving the probability of each symbol
/// in the absence of signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Background<A: Alphabet> {
    frequencies: GenericArray<f64, A::K>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> Background<A> {
    /// Create a new background with the given frequencies.
    ///
    /// The array must contain valid frequencies, i.e. real numbers in
    /// `(0, 1]` that sum to one.
    pub fn new<F>(frequencies: F) -> Result<Self, InvalidInput>
    where
        F: Into<GenericArray<f64, A::K>>,
    {
        let frequencies = frequencies.into();
        let mut sum = 0.0;
        for &f in frequencies.iter() {
            if !(f > 0.0 && f <= 1.0) {
                return Err(InvalidInput::parameter("background frequency", f));
            }
            sum += f;
        }
        if (sum - 1.0).abs() > 1e-6 {
            return Err(InvalidInput::parameter("background total", sum));
        }
        Ok(Self {
            frequencies,
            alphabet: std::marker::PhantomData,
        })
    }

    /// Create a new background where every symbol has the same probability.
    ///
    /// Unlike [`Background::new`], the probabilities are not required to
    /// sum to one, so that a single null probability can be used to rescale
    /// frequencies of any alphabet.
    ///
    /// # Example
    /// ```
    /// # use seqsignal::abc::*;
    /// let bg = Background::<Dna>::constant(0.25).unwrap();
    /// assert_eq!(bg, Background::uniform());
    /// assert!(Background::<Dna>::constant(0.0).is_err());
    /// ```
    pub fn constant(probability: f64) -> Result<Self, InvalidInput> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(InvalidInput::parameter("null probability", probability));
        }
        Ok(Self {
            frequencies: (0..A::K::USIZE).map(|_| probability).collect(),
            alphabet: std::marker::PhantomData,
        })
    }

    /// Create a new background with uniform frequencies of `1/K`.
    ///
    /// # Note
    /// The `Default` implementation for `Background` uses uniform frequencies.
    ///
    /// # Example
    /// ```
    /// # use seqsignal::abc::*;
    /// let bg = Background::<Dna>::uniform();
    /// assert_eq!(bg.frequencies(), &[0.25, 0.25, 0.25, 0.25]);
    /// ```
    pub fn uniform() -> Self {
        let p = 1.0 / A::K::USIZE as f64;
        Self {
            frequencies: (0..A::K::USIZE).map(|_| p).collect(),
            alphabet: std::marker::PhantomData,
        }
    }

    /// A reference to the raw background frequencies.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }
}

#[cfg(feature = "sampling")]
impl<A: Alphabet> Background<A> {
    /// Sample a random sequence of the given length from the background.
    pub fn sample<R: rand::Rng>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<crate::EncodedSequence<A>, InvalidInput> {
        use rand::distributions::Distribution;

        let dist = rand_distr::WeightedIndex::<f64>::new(self.frequencies.iter())
            .map_err(|_| InvalidInput::InvalidWeights { row: 0 })?;
        let symbols = A::symbols();
        Ok((0..length)
            .map(|_| symbols[dist.sample(rng)])
            .collect::<Vec<_>>()
            .into())
    }
}

impl<A: Alphabet> AsRef<[f64]> for Background<A> {
    fn as_ref(&self) -> &[f64] {
        self.frequencies()
    }
}

impl<A: Alphabet> Default for Background<A> {
    fn default() -> Self {
        Self::uniform()
    }
}

// --- Pseudocounts ------------------------------------------------------------

/// A structure for storing the pseudocounts over an alphabet.
#[derive(Clone, Debug, PartialEq)]
pub struct Pseudocounts<A: Alphabet> {
    counts: GenericArray<f64, A::K>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> Pseudocounts<A> {
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Check that every pseudocount is finite and non-negative.
    pub(crate) fn validate(&self) -> Result<(), InvalidInput> {
        match self.counts.iter().find(|&&x| !(x.is_finite() && x >= 0.0)) {
            Some(&x) => Err(InvalidInput::parameter("pseudocount", x)),
            None => Ok(()),
        }
    }
}

impl<A: Alphabet> Default for Pseudocounts<A> {
    fn default() -> Self {
        Self::from(DEFAULT_PSEUDOCOUNT)
    }
}

impl<A: Alphabet> From<GenericArray<f64, A::K>> for Pseudocounts<A> {
    fn from(counts: GenericArray<f64, A::K>) -> Self {
        Self {
            alphabet: std::marker::PhantomData,
            counts,
        }
    }
}

impl<A: Alphabet> From<f64> for Pseudocounts<A> {
    fn from(count: f64) -> Self {
        Self {
            counts: (0..A::K::USIZE).map(|_| count).collect(),
            alphabet: std::marker::PhantomData,
        }
    }
}

impl<A: Alphabet> AsRef<[f64]> for Pseudocounts<A> {
    fn as_ref(&self) -> &[f64] {
        &self.counts
    }
}
