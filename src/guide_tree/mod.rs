use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, info_span, trace};

use crate::errors::GuideTreeError;
use crate::similarity::SimilarityMatrix;

pub mod linkage;
pub mod queue;
pub mod tree;

pub use linkage::Linkage;
pub use queue::{MergeCandidate, MergeQueue};
pub use tree::GuideTree;

/// Clusters are identified by their position in the cluster arena. Leaves take ids `0..n`,
/// merged clusters get consecutive ids from `n` onward in order of creation.
pub type ClusterId = usize;

/// A set of leaves, immutable once formed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<usize>,
    children: Option<(ClusterId, ClusterId)>,
}

impl Cluster {
    fn leaf(leaf: usize) -> Self {
        Self { members: vec![leaf], children: None }
    }

    fn merged(id1: ClusterId, c1: &Cluster, id2: ClusterId, c2: &Cluster) -> Self {
        let mut members = Vec::with_capacity(c1.len() + c2.len());
        members.extend_from_slice(&c1.members);
        members.extend_from_slice(&c2.members);
        members.sort_unstable();

        Self { members, children: Some((id1, id2)) }
    }

    /// Sorted leaf indices
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn children(&self) -> Option<(ClusterId, ClusterId)> {
        self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One agglomeration step: clusters `left` and `right` were joined into `merged`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeEvent {
    pub left: ClusterId,
    pub right: ClusterId,
    pub merged: ClusterId,
    pub left_members: Vec<usize>,
    pub right_members: Vec<usize>,
    pub score: Linkage,
}

/// Greedy agglomerative clustering over a similarity matrix.
///
/// Each step pops the best still valid candidate from the queue and merges its clusters. The new
/// cluster is then compared (group-average) against every remaining active cluster, and only the
/// single best of those comparisons is queued. Other clusters keep whatever candidates they
/// already had, so this is an approximation of UPGMA, not the exact algorithm.
pub struct GuideTreeBuilder<'a> {
    similarity: &'a SimilarityMatrix,
    clusters: Vec<Cluster>,
    active: BTreeSet<ClusterId>,
    queue: MergeQueue,
    events: Vec<MergeEvent>,
}

impl<'a> GuideTreeBuilder<'a> {
    /// Start from all leaves as singleton clusters and the given initial queue, usually the one
    /// returned by [`SimilarityMatrix::compute`].
    pub fn new(similarity: &'a SimilarityMatrix, queue: MergeQueue) -> Self {
        let num_seqs = similarity.num_seqs();
        let mut clusters = Vec::with_capacity((2 * num_seqs).saturating_sub(1));
        clusters.extend((0..num_seqs).map(Cluster::leaf));

        Self {
            similarity,
            clusters,
            active: (0..num_seqs).collect(),
            queue,
            events: Vec::with_capacity(num_seqs.saturating_sub(1)),
        }
    }

    /// Builder with the initial queue derived from the similarity matrix itself
    pub fn from_similarity(similarity: &'a SimilarityMatrix) -> Self {
        Self::new(similarity, similarity.initial_queue())
    }

    pub fn num_active(&self) -> usize {
        self.active.len()
    }

    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.active.len() <= 1
    }

    /// Perform a single merge. Returns `None` once a single cluster remains.
    pub fn step(&mut self) -> Result<Option<&MergeEvent>, GuideTreeError> {
        if self.is_finished() {
            return Ok(None);
        }

        let candidate = self.pop_valid_candidate()?;
        let (left, right) = candidate.clusters();

        self.active.remove(&left);
        self.active.remove(&right);

        let merged = self.clusters.len();
        let pair = Cluster::merged(left, &self.clusters[left], right, &self.clusters[right]);

        let event = MergeEvent {
            left,
            right,
            merged,
            left_members: self.clusters[left].members.clone(),
            right_members: self.clusters[right].members.clone(),
            score: candidate.score(),
        };
        debug!(
            step = self.events.len() + 1,
            left, right, merged,
            score = %event.score,
            "merge {:?} + {:?}", event.left_members, event.right_members
        );

        // With no active clusters left, the new cluster is the root
        if let Some((best, score)) = self.best_partner(&pair) {
            trace!(merged, best, score = %score, "queueing new candidate");

            self.queue.push(MergeCandidate::new(score, best, merged));
            self.active.insert(merged);
        }

        self.clusters.push(pair);
        self.events.push(event);

        Ok(self.events.last())
    }

    /// Run until a single root cluster remains.
    pub fn build(self) -> Result<GuideTree, GuideTreeError> {
        self.run(None)
    }

    /// Like [`GuideTreeBuilder::build`], but checks `cancel` before every merge step and stops
    /// with [`GuideTreeError::Cancelled`] if it is set.
    pub fn build_with_cancel(self, cancel: &AtomicBool) -> Result<GuideTree, GuideTreeError> {
        self.run(Some(cancel))
    }

    fn run(mut self, cancel: Option<&AtomicBool>) -> Result<GuideTree, GuideTreeError> {
        let span = info_span!("guide_tree", num_seqs = self.similarity.num_seqs());
        let _enter = span.enter();

        while !self.is_finished() {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                return Err(GuideTreeError::Cancelled { merges: self.events.len() });
            }

            self.step()?;
        }

        info!("Guide tree complete after {} merges.", self.events.len());

        let root = self.events.last()
            .map(|event| event.merged)
            .or_else(|| self.active.first().copied());
        Ok(GuideTree::new(self.clusters, self.events, root))
    }

    fn pop_valid_candidate(&mut self) -> Result<MergeCandidate, GuideTreeError> {
        while let Some(candidate) = self.queue.pop() {
            let (c1, c2) = candidate.clusters();
            if self.active.contains(&c1) && self.active.contains(&c2) {
                return Ok(candidate);
            }

            trace!(c1, c2, "discarding stale candidate");
        }

        Err(GuideTreeError::QueueExhaustion {
            active: self.active.len(),
            merges: self.events.len(),
            last_merge: self.events.last().map(|e| (e.left, e.right)),
        })
    }

    /// Active cluster with the highest group-average similarity to `pair`. Ties go to the
    /// smallest cluster id.
    fn best_partner(&self, pair: &Cluster) -> Option<(ClusterId, Linkage)> {
        let mut best: Option<(ClusterId, Linkage)> = None;

        // BTreeSet iterates in ascending id order, only a strictly better score replaces
        for &id in &self.active {
            let other = &self.clusters[id];
            let sum = self.similarity.sum_between(&other.members, &pair.members);
            let score = Linkage::new(sum, (other.len() * pair.len()) as u64);

            let improves = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };

            if improves {
                best = Some((id, score));
            }
        }

        best
    }
}
