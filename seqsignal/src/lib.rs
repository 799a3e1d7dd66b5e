#![doc = include_str!("../README.md")]

extern crate generic_array;
extern crate typenum;

pub mod abc;
pub mod dense;
pub mod err;
pub mod markov;
pub mod peaks;
pub mod pwm;
pub mod scan;
pub mod scores;
pub mod seq;

pub use abc::Alphabet;
pub use abc::Background;
pub use abc::Dna;
pub use abc::Nucleotide;
pub use abc::Pseudocounts;
pub use abc::Symbol;
pub use abc::DEFAULT_NULL_PROBABILITY;
pub use abc::DEFAULT_PSEUDOCOUNT;
pub use dense::DenseMatrix;
pub use err::InvalidInput;
pub use err::InvalidSymbol;
pub use markov::LogOddsMatrix;
pub use markov::LogOddsWindows;
pub use markov::MarkovModelBuilder;
pub use markov::TransitionCounts;
pub use markov::TransitionMatrix;
pub use markov::DEFAULT_FLOOR;
pub use peaks::PeakDetector;
pub use peaks::Peaks;
pub use pwm::CountMatrix;
pub use pwm::FrequencyMatrix;
pub use pwm::ScoringMatrix;
pub use pwm::ScoringMatrixBuilder;
pub use scan::Scan;
pub use scores::Hit;
pub use scores::ScoreProfile;
pub use scores::Summary;
pub use seq::EncodedSequence;
pub use seq::MaskedSequence;
