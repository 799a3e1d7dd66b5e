//! Error types for building and applying scoring models.

use thiserror::Error;

/// The given character is not a valid symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid symbol {0:?}")]
pub struct InvalidSymbol(pub char);

/// Invalid data was passed to build or apply a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    /// No motifs were given to build a matrix from.
    #[error("motif set is empty")]
    EmptyMotifs,
    /// The motifs were given, but they do not contain any symbol.
    #[error("motifs must contain at least one symbol")]
    EmptyMotif,
    /// A motif does not have the same length as the first one.
    #[error("motif {index} has length {length}, expected {expected}")]
    LengthMismatch {
        index: usize,
        length: usize,
        expected: usize,
    },
    /// A position of a count matrix does not hold the same total as the first.
    #[error("position {position} totals {total} counts, expected {expected}")]
    InconsistentTotals {
        position: usize,
        total: u32,
        expected: u32,
    },
    /// A symbol has a null frequency after pseudocounts were added.
    #[error("null frequency for symbol {symbol:?} at position {position}")]
    NullFrequency { symbol: char, position: usize },
    /// A score profile contains an infinite or undefined score.
    #[error("non-finite score at position {position}")]
    NonFiniteScore { position: usize },
    /// Sampling weights do not form a valid distribution.
    #[error("invalid sampling weights at row {row}")]
    InvalidWeights { row: usize },
    /// A character outside the alphabet was found in training data.
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    /// The sequence is too short to fit a single window.
    #[error("sequence of length {length} is shorter than window of length {window}")]
    SequenceTooShort { length: usize, window: usize },
    /// A numeric parameter is outside of its domain.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl InvalidInput {
    pub(crate) fn parameter(name: &'static str, value: f64) -> Self {
        InvalidInput::InvalidParameter { name, value }
    }
}

impl From<(usize, InvalidSymbol)> for InvalidInput {
    fn from((position, InvalidSymbol(symbol)): (usize, InvalidSymbol)) -> Self {
        InvalidInput::InvalidSymbol { symbol, position }
    }
}
