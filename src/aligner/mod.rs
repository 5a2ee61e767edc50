pub mod matrix;

pub use matrix::AlignmentMatrix;

use crate::errors::GuideTreeError;
use crate::scoring::{Score, SubstitutionModel};

/// Computes optimal global alignment scores (Needleman-Wunsch with linear gap costs).
///
/// Only the score is computed, so the aligner keeps a single DP row over the shorter of the two
/// sequences.
pub struct GlobalAligner<'a, M> {
    model: &'a M,
}

impl<'a, M> GlobalAligner<'a, M>
where
    M: SubstitutionModel,
{
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// Optimal global alignment score of `seq1` (rows) against `seq2` (columns).
    pub fn score(&self, seq1: &[u8], seq2: &[u8]) -> Result<Score, GuideTreeError> {
        if seq2.len() <= seq1.len() {
            self.fill_rolling(seq1, seq2, |row, col| self.model.cost(row, col))
        } else {
            // Transposed: the DP row now runs over seq1, so swap the arguments back
            self.fill_rolling(seq2, seq1, |row, col| self.model.cost(col, row))
        }
    }

    fn fill_rolling<F>(&self, outer: &[u8], inner: &[u8], cost: F) -> Result<Score, GuideTreeError>
    where
        F: Fn(u8, u8) -> Result<i32, GuideTreeError>,
    {
        let gap = self.model.gap_symbol();

        let mut row = Vec::with_capacity(inner.len() + 1);
        let mut inner_gap_costs = Vec::with_capacity(inner.len());
        row.push(0);
        for (j, &sym) in inner.iter().enumerate() {
            let gap_cost = cost(gap, sym)? as Score;
            inner_gap_costs.push(gap_cost);
            row.push(row[j] + gap_cost);
        }

        for &outer_sym in outer {
            let outer_gap_cost = cost(outer_sym, gap)? as Score;

            let mut diag = row[0];
            row[0] += outer_gap_cost;

            for (j, &inner_sym) in inner.iter().enumerate() {
                let left = row[j] + inner_gap_costs[j];
                let up = row[j + 1] + outer_gap_cost;
                let diagonal = diag + cost(outer_sym, inner_sym)? as Score;

                diag = row[j + 1];
                row[j + 1] = left.max(up).max(diagonal);
            }
        }

        Ok(row[inner.len()])
    }

    /// Fill the complete (m+1)x(n+1) DP table, e.g., for inspection. The bottom-right cell equals
    /// [`GlobalAligner::score`].
    pub fn alignment_matrix(&self, seq1: &[u8], seq2: &[u8]) -> Result<AlignmentMatrix, GuideTreeError> {
        let gap = self.model.gap_symbol();
        let mut matrix = AlignmentMatrix::new(seq1, seq2);

        for j in 1..=seq2.len() {
            let value = matrix.get(0, j - 1) + self.model.cost(gap, seq2[j - 1])? as Score;
            matrix.set(0, j, value);
        }

        for i in 1..=seq1.len() {
            let value = matrix.get(i - 1, 0) + self.model.cost(seq1[i - 1], gap)? as Score;
            matrix.set(i, 0, value);
        }

        for i in 1..=seq1.len() {
            for j in 1..=seq2.len() {
                let left = matrix.get(i, j - 1) + self.model.cost(gap, seq2[j - 1])? as Score;
                let up = matrix.get(i - 1, j) + self.model.cost(seq1[i - 1], gap)? as Score;
                let diagonal = matrix.get(i - 1, j - 1)
                    + self.model.cost(seq1[i - 1], seq2[j - 1])? as Score;

                matrix.set(i, j, left.max(up).max(diagonal));
            }
        }

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::GuideTreeError;
    use crate::scoring::{ScoringMatrix, UniformCosts};
    use super::GlobalAligner;

    fn at_matrix() -> ScoringMatrix {
        let mut matrix = ScoringMatrix::new(b"AT", b'*').unwrap();
        for &(row, col, cost) in &[
            (b'A', b'A', 1), (b'T', b'T', 1),
            (b'A', b'T', -1), (b'T', b'A', -1),
            (b'A', b'*', -2), (b'*', b'A', -2),
            (b'T', b'*', -2), (b'*', b'T', -2),
        ] {
            matrix.set(row, col, cost);
        }

        matrix
    }

    #[test]
    fn test_example_scores() {
        let matrix = at_matrix();
        let aligner = GlobalAligner::new(&matrix);

        assert_eq!(aligner.score(b"AAAA", b"AAAA").unwrap(), 4);
        assert_eq!(aligner.score(b"AAAA", b"TTTT").unwrap(), -4);
        assert_eq!(aligner.score(b"TTTT", b"AAAA").unwrap(), -4);
    }

    #[test]
    fn test_self_alignment_is_all_matches() {
        let costs = UniformCosts::new(5, -4, -8);
        let aligner = GlobalAligner::new(&costs);

        let seq = b"GATTACACCGTA";
        assert_eq!(aligner.score(seq, seq).unwrap(), 5 * seq.len() as i64);
    }

    #[test]
    fn test_symmetric_model_gives_symmetric_scores() {
        let costs = UniformCosts::new(2, -1, -2);
        let aligner = GlobalAligner::new(&costs);

        let pairs: [(&[u8], &[u8]); 4] = [
            (b"ACGTTGCA", b"ACGGCA"),
            (b"A", b"TTTTT"),
            (b"GATTACA", b"GCATGCT"),
            (b"", b"ACG"),
        ];

        for (a, b) in pairs {
            assert_eq!(aligner.score(a, b).unwrap(), aligner.score(b, a).unwrap());
        }
    }

    #[test]
    fn test_gaps_and_empty_sequences() {
        let matrix = at_matrix();
        let aligner = GlobalAligner::new(&matrix);

        assert_eq!(aligner.score(b"", b"").unwrap(), 0);
        assert_eq!(aligner.score(b"AAT", b"").unwrap(), -6);
        assert_eq!(aligner.score(b"", b"TT").unwrap(), -4);

        // One deletion is better than shifting everything
        assert_eq!(aligner.score(b"ATAT", b"AAT").unwrap(), 1);
    }

    #[test]
    fn test_asymmetric_model() {
        // Gaps in the second sequence are cheap, gaps in the first are expensive
        let mut matrix = ScoringMatrix::new(b"A", b'*').unwrap();
        matrix.set(b'A', b'A', 1);
        matrix.set(b'A', b'*', 0);
        matrix.set(b'*', b'A', -5);

        let aligner = GlobalAligner::new(&matrix);
        assert_eq!(aligner.score(b"AAA", b"A").unwrap(), 1);
        assert_eq!(aligner.score(b"A", b"AAA").unwrap(), -9);

        assert_eq!(aligner.alignment_matrix(b"AAA", b"A").unwrap().score(), 1);
        assert_eq!(aligner.alignment_matrix(b"A", b"AAA").unwrap().score(), -9);
    }

    #[test]
    fn test_rolling_row_matches_full_table() {
        let costs = UniformCosts::new(3, -2, -4);
        let aligner = GlobalAligner::new(&costs);

        let pairs: [(&[u8], &[u8]); 3] = [
            (b"HEAGAWGHEE", b"PAWHEAE"),
            (b"PAWHEAE", b"HEAGAWGHEE"),
            (b"MKV", b"MKV"),
        ];

        for (a, b) in pairs {
            let full = aligner.alignment_matrix(a, b).unwrap();
            assert_eq!(full.rows(), a.len() + 1);
            assert_eq!(full.cols(), b.len() + 1);
            assert_eq!(full.score(), aligner.score(a, b).unwrap());
        }
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let matrix = at_matrix();
        let aligner = GlobalAligner::new(&matrix);

        let result = aligner.score(b"AAGA", b"AAA");
        assert!(matches!(result, Err(GuideTreeError::MissingScoreEntry { .. })));

        let result = aligner.alignment_matrix(b"AT", b"AX");
        assert!(matches!(result, Err(GuideTreeError::MissingScoreEntry { .. })));
    }
}
