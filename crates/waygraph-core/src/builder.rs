//! Two-phase construction of a [`CompactGraph`].
//!
//! Phase one accumulates edges (in any order) and counts each node's
//! out-degree. Phase two turns the counters into offsets with a prefix sum
//! and scatters the edges into single contiguous neighbor and weight arrays.

use crate::error::GraphError;
use crate::geom::Coord;
use crate::graph::CompactGraph;
use crate::NodeId;

/// Accumulates an edge stream and optional coordinates, then freezes them
/// into a [`CompactGraph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    node_count: usize,
    edges: Vec<(NodeId, NodeId, f32)>,
    degree: Vec<usize>,
    coords: Vec<Coord>,
    placed: Vec<bool>,
    placed_count: usize,
}

impl GraphBuilder {
    /// Start a graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self::with_edge_capacity(node_count, 0)
    }

    /// Like [`new`](Self::new), reserving room for `edges` edges.
    pub fn with_edge_capacity(node_count: usize, edges: usize) -> Self {
        Self {
            node_count,
            edges: Vec::with_capacity(edges),
            degree: vec![0; node_count],
            coords: Vec::new(),
            placed: Vec::new(),
            placed_count: 0,
        }
    }

    /// Number of nodes the graph will have.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of directed edges accumulated so far.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn check(&self, node: NodeId) -> Result<(), GraphError> {
        if (node as usize) < self.node_count {
            Ok(())
        } else {
            Err(GraphError::out_of_range(node, self.node_count))
        }
    }

    /// Add a directed edge `origin -> target`.
    pub fn add_edge(&mut self, origin: NodeId, target: NodeId, weight: f32) -> Result<(), GraphError> {
        self.check(origin)?;
        self.check(target)?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                origin,
                target,
                weight,
            });
        }
        self.degree[origin as usize] += 1;
        self.edges.push((origin, target, weight));
        Ok(())
    }

    /// Add both `a -> b` and `b -> a` with the same weight.
    pub fn add_undirected(&mut self, a: NodeId, b: NodeId, weight: f32) -> Result<(), GraphError> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    /// Set the world position of `node`. Setting it again overwrites.
    pub fn set_position(&mut self, node: NodeId, x: f32, y: f32) -> Result<(), GraphError> {
        self.check(node)?;
        if !(x.is_finite() && y.is_finite()) {
            return Err(GraphError::InvalidPosition { node });
        }
        if self.placed.is_empty() {
            self.coords = vec![Coord::ZERO; self.node_count];
            self.placed = vec![false; self.node_count];
        }
        let n = node as usize;
        self.coords[n] = Coord::new(x, y);
        if !self.placed[n] {
            self.placed[n] = true;
            self.placed_count += 1;
        }
        Ok(())
    }

    /// Freeze into a [`CompactGraph`].
    ///
    /// Fails with [`GraphError::IncompleteCoordinates`] when positions were
    /// given for some nodes but not all of them.
    pub fn build(self) -> Result<CompactGraph, GraphError> {
        let coords = match self.placed_count {
            0 => None,
            n if n == self.node_count => Some(self.coords),
            n => {
                return Err(GraphError::IncompleteCoordinates {
                    missing: self.node_count - n,
                });
            }
        };

        // Prefix sum: offsets[n] is where node n's edges start.
        let mut offsets = Vec::with_capacity(self.node_count + 1);
        offsets.push(0usize);
        let mut total = 0usize;
        for d in &self.degree {
            total += d;
            offsets.push(total);
        }

        // Scatter. `cursor[n]` is the next free slot of node n; edges of one
        // node keep their insertion order.
        let mut cursor = offsets[..self.node_count].to_vec();
        let mut targets: Vec<NodeId> = vec![0; total];
        let mut weights: Vec<f32> = vec![0.0; total];
        for (origin, target, weight) in self.edges {
            let slot = &mut cursor[origin as usize];
            targets[*slot] = target;
            weights[*slot] = weight;
            *slot += 1;
        }

        let graph = CompactGraph {
            offsets,
            targets,
            weights,
            coords,
        };
        log::debug!(
            "built compact graph: {} nodes, {} edges, {:.2} MiB",
            graph.node_count(),
            graph.edge_count(),
            graph.memory_usage() as f64 / (1024.0 * 1024.0)
        );
        Ok(graph)
    }
}
