//! First-order Markov models of symbol transitions.
//!
//! A [`TransitionCounts`] table is built from one or more training
//! sequences, then normalized into a [`TransitionMatrix`]. Two matrices
//! trained on a positive and a negative class are combined into a
//! [`LogOddsMatrix`], which scores a sequence by summing the log-odds of
//! every pair of consecutive symbols.

use log::debug;
use typenum::marker_traits::Unsigned;

use super::abc::Alphabet;
use super::abc::Symbol;
use super::dense::DenseMatrix;
use super::err::InvalidInput;
use super::scan::Scan;
use super::seq::EncodedSequence;
use super::seq::MaskedSequence;

/// The probability floor applied before computing log-odds when none is given.
pub const DEFAULT_FLOOR: f64 = 0.01;

// --- TransitionCounts --------------------------------------------------------

/// A table counting transitions between consecutive symbols.
///
/// Rows are indexed by the current symbol, columns by the next symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionCounts<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: DenseMatrix<u32, A::K>,
}

impl<A: Alphabet> TransitionCounts<A> {
    /// Create an empty transition table.
    pub fn new() -> Self {
        Self {
            alphabet: std::marker::PhantomData,
            data: DenseMatrix::new(A::K::USIZE),
        }
    }

    /// Count the transitions of a single sequence.
    pub fn from_sequence(seq: &EncodedSequence<A>) -> Self {
        let mut counts = Self::new();
        counts.add_sequence(seq);
        counts
    }

    /// Count the transitions of a textual sequence.
    ///
    /// Training sequences must only contain symbols of the alphabet.
    pub fn count_transitions<S: AsRef<str>>(sequence: S) -> Result<Self, InvalidInput> {
        EncodedSequence::encode(sequence).map(|seq| Self::from_sequence(&seq))
    }

    /// Add the transitions of another sequence to the table.
    ///
    /// No transition is counted between the end of a previously added
    /// sequence and the start of this one.
    pub fn add_sequence(&mut self, seq: &EncodedSequence<A>) {
        let symbols: &[A::Symbol] = seq.as_ref();
        for pair in symbols.windows(2) {
            self.data[pair[0].as_index()][pair[1].as_index()] += 1;
        }
    }

    /// The raw transition counts.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }

    /// The total number of transitions in the table.
    pub fn total(&self) -> u32 {
        self.data.iter().flat_map(|row| row.iter()).sum()
    }

    /// Estimate the transition probabilities from the counts.
    ///
    /// Each row is divided by its total. A row without any observed
    /// transition gets a uniform distribution.
    pub fn to_probabilities(&self) -> TransitionMatrix<A> {
        let uniform = 1.0 / A::K::USIZE as f64;
        let mut data = self.data.map(f64::from);
        for (i, row) in data.iter_mut().enumerate() {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                row.iter_mut().for_each(|x| *x /= total);
            } else {
                debug!(
                    "no transition observed from {:?}, using uniform distribution",
                    A::symbols()[i]
                );
                row.fill(uniform);
            }
        }
        TransitionMatrix {
            alphabet: std::marker::PhantomData,
            data,
        }
    }
}

impl<A: Alphabet> Default for TransitionCounts<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<u32, A::K>> for TransitionCounts<A> {
    fn as_ref(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }
}

impl<'a, A: Alphabet> FromIterator<&'a EncodedSequence<A>> for TransitionCounts<A> {
    fn from_iter<I: IntoIterator<Item = &'a EncodedSequence<A>>>(iter: I) -> Self {
        let mut counts = Self::new();
        for seq in iter {
            counts.add_sequence(seq);
        }
        counts
    }
}

// --- TransitionMatrix --------------------------------------------------------

/// A matrix of first-order transition probabilities.
///
/// Each row is the distribution of the next symbol given the current one,
/// and always sums to one.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> TransitionMatrix<A> {
    /// The transition probabilities.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// The probability of observing `next` right after `current`.
    #[inline]
    pub fn probability(&self, current: A::Symbol, next: A::Symbol) -> f64 {
        self.data[current.as_index()][next.as_index()]
    }

    /// Compute the log-odds of this model against a `negative` model.
    ///
    /// Both probabilities are clamped to at least `floor` before taking the
    /// natural logarithm of their ratio.
    pub fn log_odds(&self, negative: &Self, floor: f64) -> Result<LogOddsMatrix<A>, InvalidInput> {
        if !(floor > 0.0 && floor <= 1.0) {
            return Err(InvalidInput::parameter("probability floor", floor));
        }
        let mut data = self.data.clone();
        for (dst, neg) in data.iter_mut().zip(negative.data.iter()) {
            for (x, &q) in dst.iter_mut().zip(neg) {
                *x = (x.max(floor) / q.max(floor)).ln();
            }
        }
        Ok(LogOddsMatrix {
            alphabet: std::marker::PhantomData,
            data,
        })
    }
}

#[cfg(feature = "sampling")]
impl<A: Alphabet> TransitionMatrix<A> {
    /// Sample a Markov chain of the given length.
    ///
    /// The first symbol is drawn uniformly, every following symbol is drawn
    /// from the row of the previous one.
    pub fn sample<R: rand::Rng>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<EncodedSequence<A>, InvalidInput> {
        use rand::distributions::Distribution;

        let symbols = A::symbols();
        let dists = self
            .data
            .iter()
            .enumerate()
            .map(|(row, weights)| {
                rand_distr::WeightedIndex::<f64>::new(weights)
                    .map_err(|_| InvalidInput::InvalidWeights { row })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut data = Vec::with_capacity(length);
        let mut current = symbols[rng.gen_range(0..symbols.len())];
        for _ in 0..length {
            data.push(current);
            current = symbols[dists[current.as_index()].sample(rng)];
        }
        Ok(EncodedSequence::new(data))
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for TransitionMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}

// --- LogOddsMatrix -----------------------------------------------------------

/// A matrix of transition log-odds between a positive and a negative model.
#[derive(Clone, Debug, PartialEq)]
pub struct LogOddsMatrix<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> LogOddsMatrix<A> {
    /// The transition log-odds.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// The log-odds of observing `next` right after `current`.
    #[inline]
    pub fn transition(&self, current: A::Symbol, next: A::Symbol) -> f64 {
        self.data[current.as_index()][next.as_index()]
    }

    /// The log-odds of the transition starting at `position`, if any.
    #[inline]
    fn transition_at(&self, seq: &[Option<A::Symbol>], position: usize) -> f64 {
        match (seq[position], seq[position + 1]) {
            (Some(x), Some(y)) => self.transition(x, y),
            _ => 0.0,
        }
    }

    /// Score a whole sequence by summing the log-odds of all transitions.
    ///
    /// Transitions from or to a masked position contribute nothing.
    /// Sequences with less than two symbols score zero.
    pub fn score(&self, seq: &MaskedSequence<A>) -> f64 {
        let data: &[Option<A::Symbol>] = seq.as_ref();
        (0..data.len().saturating_sub(1))
            .map(|i| self.transition_at(data, i))
            .sum()
    }

    /// Get a view of this matrix scoring windows of `width` symbols.
    ///
    /// A window of `width` symbols contains `width - 1` transitions, so the
    /// width must be at least 2.
    pub fn windows(&self, width: usize) -> Result<LogOddsWindows<'_, A>, InvalidInput> {
        if width < 2 {
            return Err(InvalidInput::parameter("window width", width as f64));
        }
        Ok(LogOddsWindows { matrix: self, width })
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for LogOddsMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}

// --- LogOddsWindows ----------------------------------------------------------

/// A log-odds matrix scoring fixed-width windows of a sequence.
#[derive(Clone, Copy, Debug)]
pub struct LogOddsWindows<'a, A: Alphabet> {
    matrix: &'a LogOddsMatrix<A>,
    width: usize,
}

impl<'a, A: Alphabet> Scan<A> for LogOddsWindows<'a, A> {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    fn score_at(&self, seq: &MaskedSequence<A>, position: usize) -> f64 {
        let data: &[Option<A::Symbol>] = seq.as_ref();
        (position..position + self.width - 1)
            .map(|i| self.matrix.transition_at(data, i))
            .sum()
    }
}

// --- MarkovModelBuilder ------------------------------------------------------

/// A builder for log-odds models trained on a positive and negative sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkovModelBuilder {
    floor: f64,
}

impl MarkovModelBuilder {
    /// Create a new builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the probability floor applied before computing log-odds.
    pub fn floor(&mut self, floor: f64) -> &mut Self {
        self.floor = floor;
        self
    }

    /// Build a log-odds matrix from two textual training sequences.
    pub fn build<A, S>(&self, positive: S, negative: S) -> Result<LogOddsMatrix<A>, InvalidInput>
    where
        A: Alphabet,
        S: AsRef<str>,
    {
        let positive = TransitionCounts::count_transitions(positive)?;
        let negative = TransitionCounts::count_transitions(negative)?;
        self.build_from_counts(&positive, &negative)
    }

    /// Build a log-odds matrix from two transition tables.
    pub fn build_from_counts<A: Alphabet>(
        &self,
        positive: &TransitionCounts<A>,
        negative: &TransitionCounts<A>,
    ) -> Result<LogOddsMatrix<A>, InvalidInput> {
        debug!(
            "building log-odds model from {} positive and {} negative transitions (floor={})",
            positive.total(),
            negative.total(),
            self.floor
        );
        positive
            .to_probabilities()
            .log_odds(&negative.to_probabilities(), self.floor)
    }
}

impl Default for MarkovModelBuilder {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::abc::Dna;
    use crate::abc::Nucleotide::*;

    #[test]
    fn test_count_transitions() {
        let counts = TransitionCounts::<Dna>::count_transitions("AACGT").unwrap();
        assert_eq!(counts.total(), 4);
        assert_eq!(&counts.matrix()[A as usize], &[1, 1, 0, 0]);
        assert_eq!(&counts.matrix()[C as usize], &[0, 0, 1, 0]);
        assert_eq!(&counts.matrix()[G as usize], &[0, 0, 0, 1]);
        assert_eq!(&counts.matrix()[T as usize], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_count_transitions_invalid() {
        assert_eq!(
            TransitionCounts::<Dna>::count_transitions("ACNGT"),
            Err(InvalidInput::InvalidSymbol {
                symbol: 'N',
                position: 2
            })
        );
    }

    #[test]
    fn test_add_sequence_boundaries() {
        let s1 = EncodedSequence::<Dna>::encode("AC").unwrap();
        let s2 = EncodedSequence::<Dna>::encode("GT").unwrap();
        let counts = [&s1, &s2].into_iter().collect::<TransitionCounts<Dna>>();
        assert_eq!(counts.total(), 2);
        assert_eq!(counts.matrix()[C as usize][G as usize], 0);
    }

    #[test]
    fn test_log_odds_floor() {
        let p = TransitionCounts::<Dna>::count_transitions("AAAA")
            .unwrap()
            .to_probabilities();
        let q = TransitionCounts::<Dna>::count_transitions("ACAC")
            .unwrap()
            .to_probabilities();
        let lom = p.log_odds(&q, 0.01).unwrap();
        // P+(A|A) = 1, P-(A|A) = 0 floored to 0.01
        assert!((lom.transition(A, A) - 100f64.ln()).abs() < 1e-12);
        // P+(C|A) = 0 floored to 0.01, P-(C|A) = 1
        assert!((lom.transition(A, C) - 0.01f64.ln()).abs() < 1e-12);
        assert!(p.log_odds(&q, 0.0).is_err());
        assert!(p.log_odds(&q, 1.5).is_err());
    }

    #[test]
    fn test_windows_width() {
        let lom = MarkovModelBuilder::new()
            .build::<Dna, _>("ACGTACGT", "AATTAATT")
            .unwrap();
        assert!(lom.windows(1).is_err());
        assert!(lom.windows(2).is_ok());
    }

    #[cfg(feature = "sampling")]
    #[test]
    fn test_sample_invalid_weights() {
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut data = TransitionCounts::<Dna>::count_transitions("ACGTA")
            .unwrap()
            .to_probabilities()
            .data;
        data[G as usize].fill(0.0);
        let chain = TransitionMatrix::<Dna> {
            alphabet: std::marker::PhantomData,
            data,
        };
        assert_eq!(
            chain.sample(&mut rng, 10).err(),
            Some(InvalidInput::InvalidWeights { row: G as usize })
        );
    }
}
