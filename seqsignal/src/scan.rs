//! Sliding-window scanning of sequences with a trained model.
use log::trace;

use super::abc::Alphabet;
use super::err::InvalidInput;
use super::pwm::ScoringMatrix;
use super::scores::ScoreProfile;
use super::seq::MaskedSequence;

/// A model that can score every fixed-width window of a sequence.
///
/// Scanning never mutates the model, so the same model can be used to scan
/// any number of sequences, possibly from several threads at once.
pub trait Scan<A: Alphabet> {
    /// The number of symbols in a scored window.
    fn width(&self) -> usize;

    /// Score the window starting at `position`.
    ///
    /// # Panics
    ///
    /// Implementors may panic if the window does not fit in the sequence.
    fn score_at(&self, seq: &MaskedSequence<A>, position: usize) -> f64;

    /// Score every window of the sequence.
    ///
    /// The resulting profile has one score per window start, from `0` to
    /// `seq.len() - self.width()` inclusive.
    fn scan(&self, seq: &MaskedSequence<A>) -> Result<ScoreProfile, InvalidInput> {
        let width = self.width();
        if seq.len() < width || width == 0 {
            return Err(InvalidInput::SequenceTooShort {
                length: seq.len(),
                window: width,
            });
        }
        trace!("scanning {} windows of width {}", seq.len() - width + 1, width);
        Ok((0..=seq.len() - width)
            .map(|i| self.score_at(seq, i))
            .collect())
    }

    /// Score every window of several sequences in parallel.
    #[cfg(feature = "parallel")]
    fn scan_all<S>(&self, sequences: &[S]) -> Vec<Result<ScoreProfile, InvalidInput>>
    where
        Self: Sync,
        S: AsRef<MaskedSequence<A>> + Sync,
    {
        use rayon::prelude::*;

        sequences
            .par_iter()
            .map(|seq| self.scan(seq.as_ref()))
            .collect()
    }
}

impl<A: Alphabet> Scan<A> for ScoringMatrix<A> {
    #[inline]
    fn width(&self) -> usize {
        self.len()
    }

    #[inline]
    fn score_at(&self, seq: &MaskedSequence<A>, position: usize) -> f64 {
        self.score_position(seq, position)
    }
}
