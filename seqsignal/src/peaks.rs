//! Selection of candidate signal positions from a score profile.

use log::trace;

use super::err::InvalidInput;
use super::scores::Hit;
use super::scores::ScoreProfile;

// --- Peaks -------------------------------------------------------------------

/// The candidate positions selected from a score profile.
///
/// An empty set of peaks is a valid outcome, meaning that no signal was
/// detected in the profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    hits: Vec<Hit>,
    threshold: Option<f64>,
}

impl Peaks {
    /// The number of selected positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Return whether no signal was detected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// The threshold used to select the peaks, if any.
    #[inline]
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Iterate over the selected hits.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.hits.iter()
    }

    /// The positions of the selected hits, in selection order.
    pub fn positions(&self) -> Vec<usize> {
        self.hits.iter().map(Hit::position).collect()
    }
}

impl AsRef<[Hit]> for Peaks {
    fn as_ref(&self) -> &[Hit] {
        &self.hits
    }
}

impl From<Peaks> for Vec<Hit> {
    fn from(peaks: Peaks) -> Self {
        peaks.hits
    }
}

impl<'a> IntoIterator for &'a Peaks {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;
    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

impl IntoIterator for Peaks {
    type Item = Hit;
    type IntoIter = std::vec::IntoIter<Hit>;
    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

// --- PeakDetector ------------------------------------------------------------

/// The rule used to select peaks from a score profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeakDetector {
    /// Select positions scoring strictly above `mean + std_dev`.
    #[default]
    Threshold,
    /// Select the `n` best scoring positions.
    Top(usize),
}

impl PeakDetector {
    /// Select peaks from the profile according to this rule.
    pub fn detect(&self, profile: &ScoreProfile) -> Result<Peaks, InvalidInput> {
        match *self {
            PeakDetector::Threshold => detect_by_threshold(profile),
            PeakDetector::Top(n) => top_n(profile, n),
        }
    }
}

/// Select positions scoring strictly above the mean plus one standard deviation.
///
/// Mean and standard deviation are population statistics over the whole
/// profile. Hits are returned in ascending position order. A profile
/// containing an infinite or undefined score has no meaningful threshold
/// and is rejected.
pub fn detect_by_threshold(profile: &ScoreProfile) -> Result<Peaks, InvalidInput> {
    if let Some(position) = profile.non_finite() {
        return Err(InvalidInput::NonFiniteScore { position });
    }
    let summary = match profile.summary() {
        Some(summary) => summary,
        None => return Ok(Peaks::default()),
    };
    let threshold = summary.mean + summary.std_dev;
    let hits: Vec<Hit> = profile.hits().filter(|hit| hit.score() > threshold).collect();
    trace!(
        "{} of {} positions above threshold {}",
        hits.len(),
        profile.len(),
        threshold
    );
    Ok(Peaks {
        hits,
        threshold: Some(threshold),
    })
}

/// Select the `n` best scoring positions of the profile.
///
/// Hits are sorted by descending score, ties broken by ascending position.
/// The whole profile is returned when it has less than `n` positions.
pub fn top_n(profile: &ScoreProfile, n: usize) -> Result<Peaks, InvalidInput> {
    if n == 0 {
        return Err(InvalidInput::parameter("number of peaks", 0.0));
    }
    let mut hits: Vec<Hit> = profile.hits().collect();
    hits.sort_by(|x, y| {
        y.score()
            .total_cmp(&x.score())
            .then(x.position().cmp(&y.position()))
    });
    hits.truncate(n);
    Ok(Peaks {
        hits,
        threshold: None,
    })
}
