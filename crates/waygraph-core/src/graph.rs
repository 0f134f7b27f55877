//! The immutable compressed-sparse-row graph.

use std::iter::FusedIterator;
use std::mem::size_of;
use std::ops::Range;
use std::slice;

use crate::error::GraphError;
use crate::geom::Coord;
use crate::NodeId;

/// Immutable adjacency structure in compressed sparse row form.
///
/// Node `n` owns the half-open slice `offsets[n]..offsets[n + 1]` of the
/// flat `targets` / `weights` arrays. The layout keeps each node's outgoing
/// edges contiguous, which is what makes traversal of multi-million node
/// graphs cache friendly.
///
/// Built by [`GraphBuilder`](crate::GraphBuilder); never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CompactGraph {
    pub(crate) offsets: Vec<usize>,
    pub(crate) targets: Vec<NodeId>,
    pub(crate) weights: Vec<f32>,
    pub(crate) coords: Option<Vec<Coord>>,
}

impl CompactGraph {
    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of directed edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    /// Whether `node` is a valid index.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        (node as usize) < self.node_count()
    }

    /// Fail with [`GraphError::OutOfRange`] unless `node` is a valid index.
    #[inline]
    pub fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(GraphError::out_of_range(node, self.node_count()))
        }
    }

    /// Outgoing edges of `node` as `(target, weight)` pairs.
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn neighbors_of(&self, node: NodeId) -> Result<Neighbors<'_>, GraphError> {
        self.check_node(node)?;
        Ok(self.neighbors(node))
    }

    /// Unchecked-by-`Result` variant of [`neighbors_of`](Self::neighbors_of)
    /// for traversal loops that only follow indices read from the graph.
    ///
    /// # Panics
    ///
    /// Panics if `node >= node_count()`.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> Neighbors<'_> {
        let n = node as usize;
        let (start, end) = (self.offsets[n], self.offsets[n + 1]);
        Neighbors {
            targets: self.targets[start..end].iter(),
            weights: self.weights[start..end].iter(),
        }
    }

    /// Positions of `node`'s edges in the flat arrays, for use with
    /// [`edge`](Self::edge).
    ///
    /// # Panics
    ///
    /// Panics if `node >= node_count()`.
    #[inline]
    pub fn edge_range(&self, node: NodeId) -> Range<usize> {
        let n = node as usize;
        self.offsets[n]..self.offsets[n + 1]
    }

    /// The `(target, weight)` pair stored at flat position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= edge_count()`.
    #[inline]
    pub fn edge(&self, index: usize) -> (NodeId, f32) {
        (self.targets[index], self.weights[index])
    }

    /// Out-degree of `node`.
    pub fn degree(&self, node: NodeId) -> Result<usize, GraphError> {
        self.check_node(node)?;
        let n = node as usize;
        Ok(self.offsets[n + 1] - self.offsets[n])
    }

    /// World position of `node`.
    pub fn position(&self, node: NodeId) -> Result<Coord, GraphError> {
        self.check_node(node)?;
        let coords = self.coords.as_ref().ok_or(GraphError::NoCoordinates)?;
        Ok(coords[node as usize])
    }

    /// Whether the graph was built with node positions.
    #[inline]
    pub fn has_coordinates(&self) -> bool {
        self.coords.is_some()
    }

    /// All node positions, indexed by node, if the graph has them.
    #[inline]
    pub fn coordinates(&self) -> Option<&[Coord]> {
        self.coords.as_deref()
    }

    /// Straight-line distance from `node` to `destination`.
    pub fn heuristic(&self, node: NodeId, destination: NodeId) -> Result<f64, GraphError> {
        let a = self.position(node)?;
        let b = self.position(destination)?;
        Ok(a.distance(b))
    }

    /// Smallest weight among the `origin -> target` edges, if any exist.
    pub fn edge_weight(&self, origin: NodeId, target: NodeId) -> Result<Option<f32>, GraphError> {
        self.check_node(target)?;
        let best = self
            .neighbors_of(origin)?
            .filter(|&(t, _)| t == target)
            .map(|(_, w)| w)
            .reduce(f32::min);
        Ok(best)
    }

    /// Bytes held by the flat arrays.
    pub fn memory_usage(&self) -> usize {
        let coords = self.coords.as_ref().map_or(0, |c| c.len() * size_of::<Coord>());
        self.offsets.len() * size_of::<usize>()
            + self.targets.len() * size_of::<NodeId>()
            + self.weights.len() * size_of::<f32>()
            + coords
    }
}

// ---------------------------------------------------------------------------
// Neighbors
// ---------------------------------------------------------------------------

/// Iterator over one node's outgoing `(target, weight)` edges.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    targets: slice::Iter<'a, NodeId>,
    weights: slice::Iter<'a, f32>,
}

impl Iterator for Neighbors<'_> {
    type Item = (NodeId, f32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let t = *self.targets.next()?;
        let w = *self.weights.next()?;
        Some((t, w))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.targets.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}

impl FusedIterator for Neighbors<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphBuilder;

    fn diamond() -> CompactGraph {
        let mut b = GraphBuilder::new(4);
        b.add_edge(0, 1, 1.0).unwrap();
        b.add_edge(0, 2, 4.0).unwrap();
        b.add_edge(1, 3, 2.0).unwrap();
        b.add_edge(2, 3, 0.5).unwrap();
        b.add_edge(0, 2, 3.0).unwrap();
        for (n, (x, y)) in [(0.0, 0.0), (1.0, 1.0), (1.0, -1.0), (2.0, 0.0)]
            .into_iter()
            .enumerate()
        {
            b.set_position(n as NodeId, x, y).unwrap();
        }
        b.build().unwrap()
    }

    #[test]
    fn counts_and_degrees() {
        let g = diamond();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.degree(0), Ok(3));
        assert_eq!(g.degree(3), Ok(0));
    }

    #[test]
    fn neighbors_iterate_in_insertion_order() {
        let g = diamond();
        let n: Vec<_> = g.neighbors_of(0).unwrap().collect();
        assert_eq!(n, vec![(1, 1.0), (2, 4.0), (2, 3.0)]);
        assert_eq!(g.neighbors_of(3).unwrap().count(), 0);
    }

    #[test]
    fn neighbors_restart_by_clone() {
        let g = diamond();
        let mut it = g.neighbors_of(0).unwrap();
        let fresh = it.clone();
        it.next();
        assert_eq!(it.len(), 2);
        assert_eq!(fresh.len(), 3);
    }

    #[test]
    fn edge_range_matches_neighbors() {
        let g = diamond();
        let r = g.edge_range(0);
        assert_eq!(r, 0..3);
        let by_index: Vec<_> = r.map(|i| g.edge(i)).collect();
        let by_iter: Vec<_> = g.neighbors(0).collect();
        assert_eq!(by_index, by_iter);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let g = diamond();
        let err = GraphError::OutOfRange {
            node: 4,
            node_count: 4,
        };
        assert_eq!(g.neighbors_of(4).unwrap_err(), err);
        assert_eq!(g.position(4).unwrap_err(), err);
        assert_eq!(g.degree(4).unwrap_err(), err);
        assert!(!g.contains(4));
    }

    #[test]
    fn positions_and_heuristic() {
        let g = diamond();
        assert_eq!(g.position(3), Ok(Coord::new(2.0, 0.0)));
        assert_eq!(g.heuristic(0, 3), Ok(2.0));
        assert!(g.has_coordinates());
    }

    #[test]
    fn no_coordinates_fails_fast() {
        let mut b = GraphBuilder::new(2);
        b.add_edge(0, 1, 1.0).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.position(0), Err(GraphError::NoCoordinates));
        assert_eq!(g.heuristic(0, 1), Err(GraphError::NoCoordinates));
        assert!(g.coordinates().is_none());
    }

    #[test]
    fn edge_weight_takes_cheapest_parallel_edge() {
        let g = diamond();
        assert_eq!(g.edge_weight(0, 2), Ok(Some(3.0)));
        assert_eq!(g.edge_weight(3, 0), Ok(None));
        assert!(g.edge_weight(0, 9).is_err());
    }

    #[test]
    fn memory_usage_counts_flat_arrays() {
        let g = diamond();
        let expected = 5 * size_of::<usize>() + 5 * 4 + 5 * 4 + 4 * size_of::<Coord>();
        assert_eq!(g.memory_usage(), expected);
    }
}
