//! Search results and predecessor-walk reconstruction.

use std::ops::Deref;

use waygraph_core::{CompactGraph, NodeId};

/// An ordered node sequence from origin to destination, both inclusive.
///
/// An empty path means the destination was not reachable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    /// The "no path" result.
    pub const fn none() -> Self {
        Self { nodes: Vec::new() }
    }

    /// The one-node path of a search whose origin is its destination.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node] }
    }

    /// Wrap an explicit node sequence.
    pub fn from_nodes(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }

    /// Number of edges.
    #[inline]
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Sum of edge weights along the path, taking the cheapest of any
    /// parallel edges. `None` for the empty path or if some consecutive pair
    /// is not joined by an edge.
    pub fn total_weight(&self, graph: &CompactGraph) -> Option<f64> {
        if self.nodes.is_empty() {
            return None;
        }
        self.nodes.windows(2).try_fold(0.0f64, |acc, w| {
            let weight = graph.edge_weight(w[0], w[1]).ok().flatten()?;
            Some(acc + f64::from(weight))
        })
    }

    /// Whether the path is non-empty and every consecutive pair is an edge
    /// of `graph`.
    pub fn is_valid_in(&self, graph: &CompactGraph) -> bool {
        match self.nodes.as_slice() {
            [] => false,
            [only] => graph.contains(*only),
            _ => self.total_weight(graph).is_some(),
        }
    }
}

impl Deref for Path {
    type Target = [NodeId];

    fn deref(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl From<Path> for Vec<NodeId> {
    fn from(p: Path) -> Self {
        p.nodes
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Walk predecessor links back from `destination` and reverse them.
///
/// `parent` returns the predecessor of a node, or `None` for the origin and
/// for nodes the search never reached. A destination without a predecessor
/// yields the empty path unless it is the origin itself.
pub fn reconstruct(
    origin: NodeId,
    destination: NodeId,
    parent: impl Fn(NodeId) -> Option<NodeId>,
) -> Path {
    if origin == destination {
        return Path::trivial(origin);
    }
    if parent(destination).is_none() {
        return Path::none();
    }

    let mut nodes = vec![destination];
    let mut current = destination;
    while let Some(p) = parent(current) {
        nodes.push(p);
        current = p;
    }
    if current != origin {
        // The chain ended somewhere other than the origin: the links do not
        // describe a path from this origin.
        return Path::none();
    }
    nodes.reverse();
    Path { nodes }
}
