//! Wrapper types for storing scores.

use std::ops::Deref;
use std::ops::Index;

// --- Hit ---------------------------------------------------------------------

/// A hit describing a scored position somewhere in the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    position: usize,
    score: f64,
}

impl Hit {
    /// Create a new hit.
    pub fn new(position: usize, score: f64) -> Self {
        Self { position, score }
    }

    /// The start position of the scored window.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The score of the window.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }
}

impl From<(usize, f64)> for Hit {
    fn from((position, score): (usize, f64)) -> Self {
        Self::new(position, score)
    }
}

// --- Summary -----------------------------------------------------------------

/// Population statistics of a score profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

// --- ScoreProfile ------------------------------------------------------------

/// Scores of every window of a sequence, indexed by window start.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreProfile {
    /// The raw vector storing the scores.
    data: Vec<f64>,
}

impl ScoreProfile {
    /// Create a new profile from an array of scores.
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Iterate over the `(position, score)` pairs of the profile.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, f64)> + ExactSizeIterator + '_ {
        self.data.iter().cloned().enumerate()
    }

    /// Iterate over the profile as hits.
    pub fn hits(&self) -> impl Iterator<Item = Hit> + '_ {
        self.iter().map(Hit::from)
    }

    /// Find the position with the highest score.
    ///
    /// The first position wins when several share the highest score.
    pub fn argmax(&self) -> Option<usize> {
        self.data
            .iter()
            .enumerate()
            .rev()
            .max_by(|x, y| x.1.total_cmp(y.1))
            .map(|(i, _)| i)
    }

    /// Find the highest score.
    pub fn max(&self) -> Option<f64> {
        self.argmax().map(|i| self.data[i])
    }

    /// Find the first position holding an infinite or undefined score.
    pub fn non_finite(&self) -> Option<usize> {
        self.data.iter().position(|x| !x.is_finite())
    }

    /// Compute the population mean and standard deviation of the profile.
    ///
    /// Returns `None` for an empty profile, or when any score is infinite
    /// or undefined. A profile where every score is the same has a mean of
    /// exactly that score and a null deviation.
    pub fn summary(&self) -> Option<Summary> {
        if self.non_finite().is_some() {
            return None;
        }
        let (&first, rest) = self.data.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        if min == max {
            return Some(Summary {
                mean: min,
                std_dev: 0.0,
                min,
                max,
            });
        }
        let n = self.data.len() as f64;
        let mean = self.data.iter().sum::<f64>() / n;
        let var = self.data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Some(Summary {
            mean,
            std_dev: var.sqrt(),
            min,
            max,
        })
    }
}

impl Deref for ScoreProfile {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl Index<usize> for ScoreProfile {
    type Output = f64;
    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl From<Vec<f64>> for ScoreProfile {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

impl From<ScoreProfile> for Vec<f64> {
    fn from(scores: ScoreProfile) -> Self {
        scores.data
    }
}

impl FromIterator<f64> for ScoreProfile {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_summary() {
        let scores = ScoreProfile::from(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let summary = scores.summary().unwrap();
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std_dev, 2.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert!(ScoreProfile::default().summary().is_none());
    }

    #[test]
    fn test_summary_non_finite() {
        let scores = ScoreProfile::from(vec![1.0, f64::NEG_INFINITY, 3.0]);
        assert_eq!(scores.non_finite(), Some(1));
        assert!(scores.summary().is_none());
        let scores = ScoreProfile::from(vec![1.0, 2.0, f64::NAN]);
        assert_eq!(scores.non_finite(), Some(2));
        assert!(scores.summary().is_none());
    }

    #[test]
    fn test_summary_constant() {
        let scores = ScoreProfile::from(vec![0.1; 7]);
        let summary = scores.summary().unwrap();
        assert_eq!(summary.mean, 0.1);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_argmax() {
        let scores = ScoreProfile::from(vec![1.0, 3.0, -2.0, 3.0]);
        assert_eq!(scores.argmax(), Some(1));
        assert_eq!(scores.max(), Some(3.0));
        assert_eq!(ScoreProfile::default().argmax(), None);
    }

    #[test]
    fn test_iter() {
        let scores = ScoreProfile::from(vec![1.0, 3.0]);
        assert_eq!(scores.iter().collect::<Vec<_>>(), vec![(0, 1.0), (1, 3.0)]);
        assert_eq!(scores.hits().last(), Some(Hit::new(1, 3.0)));
    }
}
