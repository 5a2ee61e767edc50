//! All-pairs global alignment scores.

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::aligner::GlobalAligner;
use crate::errors::GuideTreeError;
use crate::guide_tree::queue::{MergeCandidate, MergeQueue};
use crate::guide_tree::Linkage;
use crate::scoring::{Score, SubstitutionModel};

/// Symmetric matrix of alignment scores between the original sequences.
///
/// Only the strict upper triangle is stored (row-major), the diagonal has no entries. The matrix
/// is filled once on construction and never changes afterward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimilarityMatrix {
    num_seqs: usize,
    scores: Vec<Score>,
}

impl SimilarityMatrix {
    /// Align every pair of sequences and return both the matrix and the initial merge queue,
    /// holding one candidate per pair of leaves.
    ///
    /// Pairs are aligned in parallel on the current rayon thread pool. If any pair fails, the
    /// whole computation fails.
    pub fn compute<M, S>(
        aligner: &GlobalAligner<'_, M>,
        sequences: &[S],
    ) -> Result<(Self, MergeQueue), GuideTreeError>
    where
        M: SubstitutionModel,
        S: AsRef<[u8]> + Sync,
    {
        let num_seqs = sequences.len();
        let span = info_span!("similarity_matrix", num_seqs);
        let _enter = span.enter();

        let pairs: Vec<(usize, usize)> = (0..num_seqs).tuple_combinations().collect();
        info!("Aligning {} sequence pairs...", pairs.len());

        let scores = pairs
            .par_iter()
            .map(|&(i, j)| aligner.score(sequences[i].as_ref(), sequences[j].as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut queue = MergeQueue::with_capacity(pairs.len());
        for (&(i, j), &score) in pairs.iter().zip(&scores) {
            debug!(i, j, score, "pair score");
            queue.push(MergeCandidate::new(Linkage::from_score(score), i, j));
        }

        Ok((Self { num_seqs, scores }, queue))
    }

    /// Build a matrix from already computed scores in condensed (upper triangle, row-major) order.
    pub fn from_condensed(num_seqs: usize, scores: Vec<Score>) -> Option<Self> {
        if scores.len() != num_seqs * num_seqs.saturating_sub(1) / 2 {
            return None;
        }

        Some(Self { num_seqs, scores })
    }

    /// The initial merge queue: one candidate per pair of leaves.
    pub fn initial_queue(&self) -> MergeQueue {
        let mut queue = MergeQueue::with_capacity(self.scores.len());
        for ((i, j), &score) in (0..self.num_seqs).tuple_combinations().zip(&self.scores) {
            queue.push(MergeCandidate::new(Linkage::from_score(score), i, j));
        }

        queue
    }

    pub fn num_seqs(&self) -> usize {
        self.num_seqs
    }

    /// Number of stored pair entries, `n(n-1)/2`
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score between sequences `i` and `j`. Symmetric; `None` on the diagonal or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<Score> {
        if i == j || i >= self.num_seqs || j >= self.num_seqs {
            return None;
        }

        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        Some(self.scores[self.condensed_index(lo, hi)])
    }

    /// Iterate over all `(i, j, score)` entries with `i < j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Score)> + '_ {
        (0..self.num_seqs)
            .tuple_combinations()
            .zip(self.scores.iter())
            .map(|((i, j), &score)| (i, j, score))
    }

    /// Sum of scores over all pairs of leaves `(a, b)` with `a` from `members1` and `b` from
    /// `members2`. The member sets must be disjoint.
    pub(crate) fn sum_between(&self, members1: &[usize], members2: &[usize]) -> Score {
        members1.iter()
            .cartesian_product(members2)
            .map(|(&a, &b)| {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                self.scores[self.condensed_index(lo, hi)]
            })
            .sum()
    }

    #[inline]
    fn condensed_index(&self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo < hi && hi < self.num_seqs);

        lo * (2 * self.num_seqs - lo - 1) / 2 + (hi - lo - 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::aligner::GlobalAligner;
    use crate::errors::GuideTreeError;
    use crate::guide_tree::Linkage;
    use crate::scoring::{ScoringMatrix, UniformCosts};
    use super::SimilarityMatrix;

    #[test]
    fn test_all_pairs() {
        let costs = UniformCosts::new(2, -1, -2);
        let aligner = GlobalAligner::new(&costs);
        let seqs = ["ACGT", "ACG", "TTGCA", "A", "GGGGT"];

        let (sim, queue) = SimilarityMatrix::compute(&aligner, &seqs).unwrap();
        assert_eq!(sim.num_seqs(), 5);
        assert_eq!(sim.len(), 10);
        assert_eq!(queue.len(), 10);
        assert_eq!(sim.iter().count(), 10);

        for i in 0..seqs.len() {
            assert_eq!(sim.get(i, i), None);

            for j in (i + 1)..seqs.len() {
                let expected = aligner.score(seqs[i].as_bytes(), seqs[j].as_bytes()).unwrap();
                assert_eq!(sim.get(i, j), Some(expected));
                assert_eq!(sim.get(j, i), Some(expected));
            }
        }

        assert_eq!(sim.get(0, 5), None);
    }

    #[test]
    fn test_initial_queue() {
        let costs = UniformCosts::new(1, -1, -2);
        let aligner = GlobalAligner::new(&costs);

        let (sim, mut queue) = SimilarityMatrix::compute(&aligner, &["AAAA", "AAAA", "TTTT"]).unwrap();
        assert_eq!(sim.get(0, 1), Some(4));
        assert_eq!(sim.get(0, 2), Some(-4));
        assert_eq!(sim.get(1, 2), Some(-4));

        let first = queue.pop().unwrap();
        assert_eq!(first.clusters(), (0, 1));
        assert_eq!(first.score(), Linkage::from_score(4));

        // Ties pop by ascending cluster id
        assert_eq!(queue.pop().unwrap().clusters(), (0, 2));
        assert_eq!(queue.pop().unwrap().clusters(), (1, 2));
        assert!(queue.pop().is_none());

        assert_eq!(sim.initial_queue().len(), 3);
    }

    #[test]
    fn test_degenerate_inputs() {
        let costs = UniformCosts::default();
        let aligner = GlobalAligner::new(&costs);

        let empty: [&str; 0] = [];
        let (sim, queue) = SimilarityMatrix::compute(&aligner, &empty).unwrap();
        assert!(sim.is_empty());
        assert!(queue.is_empty());

        let (sim, queue) = SimilarityMatrix::compute(&aligner, &["ACGT"]).unwrap();
        assert_eq!(sim.num_seqs(), 1);
        assert!(sim.is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_missing_entry_aborts() {
        let mut matrix = ScoringMatrix::new(b"AC", b'*').unwrap();
        for row in [b'A', b'C', b'*'] {
            for col in [b'A', b'C', b'*'] {
                matrix.set(row, col, if row == col { 1 } else { -1 });
            }
        }

        let aligner = GlobalAligner::new(&matrix);
        let result = SimilarityMatrix::compute(&aligner, &["ACCA", "CA", "AXC"]);
        assert!(matches!(result, Err(GuideTreeError::MissingScoreEntry { .. })));
    }

    #[test]
    fn test_from_condensed() {
        let sim = SimilarityMatrix::from_condensed(3, vec![4, -4, -2]).unwrap();
        assert_eq!(sim.get(2, 0), Some(-4));
        assert_eq!(sim.get(1, 2), Some(-2));
        assert_eq!(sim.sum_between(&[0, 1], &[2]), -6);

        assert!(SimilarityMatrix::from_condensed(3, vec![1, 2]).is_none());
    }
}
