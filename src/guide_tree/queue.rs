use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{ClusterId, Linkage};

/// A proposed merge of two clusters, prioritized by linkage score.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MergeCandidate {
    score: Linkage,
    cluster1: ClusterId,
    cluster2: ClusterId,
}

impl MergeCandidate {
    pub fn new(score: Linkage, cluster1: ClusterId, cluster2: ClusterId) -> Self {
        let (cluster1, cluster2) = if cluster1 <= cluster2 {
            (cluster1, cluster2)
        } else {
            (cluster2, cluster1)
        };

        Self { score, cluster1, cluster2 }
    }

    pub fn score(&self) -> Linkage {
        self.score
    }

    /// The two clusters, smaller id first
    pub fn clusters(&self) -> (ClusterId, ClusterId) {
        (self.cluster1, self.cluster2)
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeCandidate {
    /// Higher score first; among equal scores, the lower pair of cluster ids first
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
            .then_with(|| other.cluster1.cmp(&self.cluster1))
            .then_with(|| other.cluster2.cmp(&self.cluster2))
    }
}

/// Max-priority queue of merge candidates.
///
/// Candidates are never removed when one of their clusters gets merged away. Instead, the tree
/// builder discards such stale candidates when they are popped.
#[derive(Clone, Debug, Default)]
pub struct MergeQueue {
    heap: BinaryHeap<MergeCandidate>,
}

impl MergeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(capacity) }
    }

    pub fn push(&mut self, candidate: MergeCandidate) {
        self.heap.push(candidate)
    }

    pub fn pop(&mut self) -> Option<MergeCandidate> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<MergeCandidate> for MergeQueue {
    fn extend<T: IntoIterator<Item = MergeCandidate>>(&mut self, iter: T) {
        self.heap.extend(iter)
    }
}
