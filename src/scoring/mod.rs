pub mod matrix;

pub use matrix::ScoringMatrix;

use crate::errors::GuideTreeError;

/// Alignment scores are accumulated in 64 bits, costs themselves fit in 32 bits.
pub type Score = i64;

/// Gap symbol used by the bundled scoring tables
pub const DEFAULT_GAP: u8 = b'*';

/// A total cost function over pairs of symbols, where the gap is a regular member of the alphabet.
///
/// Higher costs are better: the aligner maximizes the sum of costs. Implementations may be
/// asymmetric, i.e., `cost(a, b) != cost(b, a)`.
pub trait SubstitutionModel: Sync {
    /// The symbol representing an insertion or deletion
    fn gap_symbol(&self) -> u8;

    /// The cost of aligning `row` against `col`. Fails if the model has no entry for the pair.
    fn cost(&self, row: u8, col: u8) -> Result<i32, GuideTreeError>;
}

/// Simple model with a single match bonus, mismatch penalty and gap penalty for every symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformCosts {
    match_score: i32,
    mismatch: i32,
    gap: i32,
    gap_symbol: u8,
}

impl UniformCosts {
    pub fn new(match_score: i32, mismatch: i32, gap: i32) -> Self {
        Self {
            match_score,
            mismatch,
            gap,
            gap_symbol: DEFAULT_GAP,
        }
    }

    pub fn with_gap_symbol(mut self, gap_symbol: u8) -> Self {
        self.gap_symbol = gap_symbol;
        self
    }
}

impl Default for UniformCosts {
    fn default() -> Self {
        Self::new(1, -1, -2)
    }
}

impl SubstitutionModel for UniformCosts {
    #[inline]
    fn gap_symbol(&self) -> u8 {
        self.gap_symbol
    }

    #[inline]
    fn cost(&self, row: u8, col: u8) -> Result<i32, GuideTreeError> {
        let cost = if row == self.gap_symbol || col == self.gap_symbol {
            // Gap against gap never occurs in a global alignment, but the model stays total
            if row == col { 0 } else { self.gap }
        } else if row == col {
            self.match_score
        } else {
            self.mismatch
        };

        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::{SubstitutionModel, UniformCosts, DEFAULT_GAP};

    #[test]
    fn test_uniform_costs() {
        let costs = UniformCosts::new(2, -1, -3);

        assert_eq!(costs.cost(b'A', b'A').unwrap(), 2);
        assert_eq!(costs.cost(b'A', b'C').unwrap(), -1);
        assert_eq!(costs.cost(b'A', DEFAULT_GAP).unwrap(), -3);
        assert_eq!(costs.cost(DEFAULT_GAP, b'W').unwrap(), -3);

        let dashed = costs.with_gap_symbol(b'-');
        assert_eq!(dashed.gap_symbol(), b'-');
        assert_eq!(dashed.cost(b'-', b'A').unwrap(), -3);
        assert_eq!(dashed.cost(b'*', b'*').unwrap(), 2);
    }
}
