use std::fmt::Write;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::{Cluster, ClusterId, MergeEvent};

/// Which side of a merge a child cluster was on
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Branch {
    Left,
    Right,
}

/// The complete merge history, as a rooted binary tree.
///
/// Graph node indices equal cluster ids, edges point from a merged cluster to its two children.
#[derive(Debug, Clone)]
pub struct GuideTree {
    graph: DiGraph<Cluster, Branch, u32>,
    events: Vec<MergeEvent>,
    root: Option<ClusterId>,
}

impl GuideTree {
    pub(crate) fn new(clusters: Vec<Cluster>, events: Vec<MergeEvent>, root: Option<ClusterId>) -> Self {
        let mut graph = DiGraph::with_capacity(clusters.len(), 2 * events.len());

        for cluster in clusters {
            graph.add_node(cluster);
        }

        for event in &events {
            let parent = NodeIndex::new(event.merged);
            graph.add_edge(parent, NodeIndex::new(event.left), Branch::Left);
            graph.add_edge(parent, NodeIndex::new(event.right), Branch::Right);
        }

        Self { graph, events, root }
    }

    /// Merge events in the order they happened
    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    /// The cluster containing all leaves. `None` for an empty input.
    pub fn root(&self) -> Option<ClusterId> {
        self.root
    }

    pub fn num_leaves(&self) -> usize {
        self.root.map(|r| self.cluster(r).len()).unwrap_or(0)
    }

    pub fn cluster(&self, id: ClusterId) -> &Cluster {
        &self.graph[NodeIndex::new(id)]
    }

    pub fn graph(&self) -> &DiGraph<Cluster, Branch, u32> {
        &self.graph
    }

    /// Left and right child of a merged cluster
    pub fn children(&self, id: ClusterId) -> Option<(ClusterId, ClusterId)> {
        let mut edges: Vec<_> = self.graph.edges(NodeIndex::new(id))
            .map(|e| (*e.weight(), e.target().index()))
            .collect();

        if edges.len() != 2 {
            return None;
        }

        edges.sort_unstable();
        Some((edges[0].1, edges[1].1))
    }

    /// Render the tree in Newick format, labelling leaf `i` with `names[i]`, or its index if no
    /// name is available.
    pub fn to_newick<S>(&self, names: &[S]) -> String
    where
        S: AsRef<str>,
    {
        let mut newick = String::new();

        if let Some(root) = self.root {
            let mut stack = vec![NewickToken::Cluster(root)];
            while let Some(token) = stack.pop() {
                match token {
                    NewickToken::Cluster(id) => match self.children(id) {
                        Some((left, right)) => {
                            newick.push('(');
                            stack.extend([
                                NewickToken::Close,
                                NewickToken::Cluster(right),
                                NewickToken::Separator,
                                NewickToken::Cluster(left),
                            ]);
                        },
                        None => {
                            let leaf = self.cluster(id).members()[0];
                            match names.get(leaf) {
                                Some(name) => newick.push_str(&escape_newick_label(name.as_ref())),
                                None => { let _ = write!(newick, "{leaf}"); },
                            }
                        },
                    },
                    NewickToken::Separator => newick.push(','),
                    NewickToken::Close => newick.push(')'),
                }
            }
        }

        newick.push(';');
        newick
    }
}

enum NewickToken {
    Cluster(ClusterId),
    Separator,
    Close,
}

fn escape_newick_label(label: &str) -> String {
    let needs_quotes = label.chars()
        .any(|c| c.is_whitespace() || "()[]':;,".contains(c));

    if needs_quotes {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
