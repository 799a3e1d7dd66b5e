//! Count, frequency and scoring matrices built from example motifs.

use log::debug;

use super::abc::Alphabet;
use super::abc::Background;
use super::abc::Pseudocounts;
use super::abc::Symbol;
use super::abc::DEFAULT_NULL_PROBABILITY;
use super::abc::DEFAULT_PSEUDOCOUNT;
use super::dense::DenseMatrix;
use super::err::InvalidInput;
use super::seq::EncodedSequence;
use super::seq::MaskedSequence;

// --- CountMatrix -------------------------------------------------------------

/// A matrix storing symbol occurences at each position.
#[derive(Clone, Debug, PartialEq)]
pub struct CountMatrix<A: Alphabet> {
    /// The alphabet of the count matrix.
    alphabet: std::marker::PhantomData<A>,
    /// The actual counts for each position of the motif.
    data: DenseMatrix<u32, A::K>,
    /// The number of sequences from which this count matrix was obtained.
    n: u32,
}

impl<A: Alphabet> CountMatrix<A> {
    /// Create a new count matrix without checking the contents.
    fn new_unchecked(data: DenseMatrix<u32, A::K>, n: u32) -> Self {
        Self {
            alphabet: std::marker::PhantomData,
            n,
            data,
        }
    }

    /// Create a new count matrix from the given data.
    ///
    /// The matrix must contain count data for at least one position, for
    /// sequences of the same length, i.e. rows should all sum to the same
    /// non-zero value.
    pub fn new(data: DenseMatrix<u32, A::K>) -> Result<Self, InvalidInput> {
        let mut sums = data.iter().map(|row| row.iter().sum::<u32>());
        let n = sums.next().ok_or(InvalidInput::EmptyMotif)?;
        if n == 0 {
            return Err(InvalidInput::EmptyMotifs);
        }
        if let Some((i, s)) = sums.enumerate().find(|&(_, s)| s != n) {
            return Err(InvalidInput::InconsistentTotals {
                position: i + 1,
                total: s,
                expected: n,
            });
        }
        Ok(Self::new_unchecked(data, n))
    }

    /// Create a new count matrix from the given sequences.
    ///
    /// All sequences must be non-empty and have the same length.
    pub fn from_sequences<I>(sequences: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<EncodedSequence<A>>,
    {
        let mut n = 0;
        let mut data: Option<DenseMatrix<u32, A::K>> = None;
        for (index, seq) in sequences.into_iter().enumerate() {
            let seq = seq.as_ref();
            let d = data.get_or_insert_with(|| DenseMatrix::new(seq.len()));
            if seq.len() != d.rows() {
                return Err(InvalidInput::LengthMismatch {
                    index,
                    length: seq.len(),
                    expected: d.rows(),
                });
            }
            for (i, x) in seq.iter().enumerate() {
                d[i][x.as_index()] += 1;
            }
            n += 1;
        }
        match data {
            None => Err(InvalidInput::EmptyMotifs),
            Some(matrix) if matrix.rows() == 0 => Err(InvalidInput::EmptyMotif),
            Some(matrix) => {
                debug!(
                    "counted {} motifs of length {} over {:?}",
                    n,
                    matrix.rows(),
                    A::as_str()
                );
                Ok(Self::new_unchecked(matrix, n))
            }
        }
    }

    /// Create a new count matrix from textual motifs.
    ///
    /// Motifs are validated before their lengths are compared, so that an
    /// invalid character is always reported as such.
    pub fn from_motifs<I>(motifs: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<str>,
    {
        let encoded = motifs
            .into_iter()
            .map(EncodedSequence::<A>::encode)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_sequences(encoded)
    }

    /// The length of the motif encoded in this count matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Return whether the matrix has no position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The number of sequences this count matrix was built from.
    #[inline]
    pub fn sequences(&self) -> u32 {
        self.n
    }

    /// The raw counts from the count matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }

    /// Add pseudocounts to every cell of the count matrix.
    pub fn pseudocounted<P>(&self, pseudo: P) -> Result<DenseMatrix<f64, A::K>, InvalidInput>
    where
        P: Into<Pseudocounts<A>>,
    {
        let p = pseudo.into();
        p.validate()?;
        let mut weights = self.data.map(f64::from);
        for row in weights.iter_mut() {
            for (x, &c) in row.iter_mut().zip(p.counts()) {
                *x += c;
            }
        }
        Ok(weights)
    }

    /// Build a probability matrix from this count matrix using pseudo-counts.
    ///
    /// Every cell must be strictly positive once pseudocounts are added, so
    /// that log-likelihoods stay finite. A null pseudocount is thus only
    /// valid when every symbol was observed at every position.
    pub fn to_freq<P>(&self, pseudo: P) -> Result<FrequencyMatrix<A>, InvalidInput>
    where
        P: Into<Pseudocounts<A>>,
    {
        let mut probas = self.pseudocounted(pseudo)?;
        for (position, row) in probas.iter().enumerate() {
            if let Some(j) = row.iter().position(|&x| x <= 0.0) {
                return Err(InvalidInput::NullFrequency {
                    symbol: A::symbols()[j].as_char(),
                    position,
                });
            }
        }
        for row in probas.iter_mut() {
            let s: f64 = row.iter().sum();
            row.iter_mut().for_each(|x| *x /= s);
        }
        Ok(FrequencyMatrix {
            alphabet: std::marker::PhantomData,
            data: probas,
        })
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<u32, A::K>> for CountMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }
}

impl<A: Alphabet> FromIterator<EncodedSequence<A>> for Result<CountMatrix<A>, InvalidInput> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = EncodedSequence<A>>,
    {
        CountMatrix::from_sequences(iter)
    }
}

// --- FrequencyMatrix ---------------------------------------------------------

/// A matrix storing symbol frequencies at each position.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyMatrix<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> FrequencyMatrix<A> {
    /// The length of the motif encoded in this frequency matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Return whether the matrix has no position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The symbol frequencies at each position.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// Convert to a scoring matrix using the given background frequencies.
    ///
    /// Each cell is the natural logarithm of the ratio between the symbol
    /// frequency and its background frequency. A uniform background is
    /// used when `None` is given.
    pub fn to_scoring<B>(&self, background: B) -> ScoringMatrix<A>
    where
        B: Into<Option<Background<A>>>,
    {
        let bg = background.into().unwrap_or_default();
        let mut data = self.data.clone();
        for row in data.iter_mut() {
            for (x, &f) in row.iter_mut().zip(bg.frequencies()) {
                *x = (*x / f).ln();
            }
        }
        ScoringMatrix {
            background: bg,
            data,
        }
    }
}

#[cfg(feature = "sampling")]
impl<A: Alphabet> FrequencyMatrix<A> {
    /// Sample a motif instance, drawing each position independently.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> Result<EncodedSequence<A>, InvalidInput> {
        use rand::distributions::Distribution;

        let symbols = A::symbols();
        self.data
            .iter()
            .enumerate()
            .map(|(row, weights)| {
                rand_distr::WeightedIndex::<f64>::new(weights)
                    .map(|dist| symbols[dist.sample(rng)])
                    .map_err(|_| InvalidInput::InvalidWeights { row })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(EncodedSequence::new)
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for FrequencyMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}

// --- ScoringMatrix -----------------------------------------------------------

/// A matrix storing log-likelihood ratios of symbol occurences at each position.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringMatrix<A: Alphabet> {
    background: Background<A>,
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> ScoringMatrix<A> {
    /// Build a scoring matrix from motifs with the given parameters.
    ///
    /// Shorthand for [`ScoringMatrixBuilder`] with explicit settings.
    pub fn build<I>(motifs: I, pseudocount: f64, null_probability: f64) -> Result<Self, InvalidInput>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<str>,
    {
        ScoringMatrixBuilder::new()
            .pseudocount(pseudocount)
            .null_probability(null_probability)
            .build(motifs)
    }

    /// The length of the motif encoded in this scoring matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Return whether the matrix has no position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The log-likelihoods of the position weight matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// The background frequencies of the position weight matrix.
    #[inline]
    pub fn background(&self) -> &Background<A> {
        &self.background
    }

    /// Compute the lowest score any window can reach.
    pub fn min_score(&self) -> f64 {
        self.data
            .iter()
            .map(|row| row.iter().cloned().fold(f64::INFINITY, f64::min))
            .sum()
    }

    /// Compute the highest score any window can reach.
    pub fn max_score(&self) -> f64 {
        self.data
            .iter()
            .map(|row| row.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
            .sum()
    }

    /// Score the window starting at `position`, skipping masked symbols.
    ///
    /// # Panics
    ///
    /// Panics if the window does not fit in the sequence.
    #[inline]
    pub fn score_position(&self, seq: &MaskedSequence<A>, position: usize) -> f64 {
        let window: &[Option<A::Symbol>] = seq.as_ref();
        self.data
            .iter()
            .zip(&window[position..position + self.len()])
            .filter_map(|(row, x)| x.map(|s| row[s.as_index()]))
            .sum()
    }
}

impl<A: Alphabet> AsRef<ScoringMatrix<A>> for ScoringMatrix<A> {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for ScoringMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}

// --- ScoringMatrixBuilder ----------------------------------------------------

/// A builder for scoring matrices, holding the model parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringMatrixBuilder {
    pseudocount: f64,
    null_probability: f64,
}

impl ScoringMatrixBuilder {
    /// Create a new builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the pseudocount added to every count.
    pub fn pseudocount(&mut self, pseudocount: f64) -> &mut Self {
        self.pseudocount = pseudocount;
        self
    }

    /// Change the background probability of every symbol.
    pub fn null_probability(&mut self, null_probability: f64) -> &mut Self {
        self.null_probability = null_probability;
        self
    }

    /// Build a scoring matrix from the given motifs.
    pub fn build<A, I>(&self, motifs: I) -> Result<ScoringMatrix<A>, InvalidInput>
    where
        A: Alphabet,
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<str>,
    {
        let background = Background::<A>::constant(self.null_probability)?;
        let pssm = CountMatrix::<A>::from_motifs(motifs)?
            .to_freq(self.pseudocount)?
            .to_scoring(background);
        debug!(
            "built scoring matrix of length {} (pseudocount={}, null={})",
            pssm.len(),
            self.pseudocount,
            self.null_probability
        );
        Ok(pssm)
    }
}

impl Default for ScoringMatrixBuilder {
    fn default() -> Self {
        Self {
            pseudocount: DEFAULT_PSEUDOCOUNT,
            null_probability: DEFAULT_NULL_PROBABILITY,
        }
    }
}
