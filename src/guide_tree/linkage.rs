use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::scoring::Score;

/// Group-average linkage between two clusters, kept as an exact fraction.
///
/// The value is `sum / pairs`, where `sum` is the total leaf-pair similarity between the two
/// clusters and `pairs` the number of leaf pairs. Comparisons cross-multiply, so ordering never
/// depends on floating point rounding.
#[derive(Copy, Clone, Debug)]
pub struct Linkage {
    sum: Score,
    pairs: u64,
}

impl Linkage {
    pub fn new(sum: Score, pairs: u64) -> Self {
        assert!(pairs > 0, "Linkage requires at least one leaf pair!");

        Self { sum, pairs }
    }

    /// Linkage between two single leaves
    pub fn from_score(score: Score) -> Self {
        Self { sum: score, pairs: 1 }
    }

    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.pairs as f64
    }
}

impl PartialEq for Linkage {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Linkage { }

impl PartialOrd for Linkage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Linkage {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.sum as i128 * other.pairs as i128;
        let rhs = other.sum as i128 * self.pairs as i128;

        lhs.cmp(&rhs)
    }
}

impl Display for Linkage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.pairs == 1 {
            Display::fmt(&self.sum, f)
        } else {
            write!(f, "{:.3}", self.mean())
        }
    }
}
