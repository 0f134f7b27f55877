use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::distance::Euclidean;
use crate::path::Path;
use crate::Searcher;

impl Searcher {
    /// Greedy best-first search ordered by straight-line distance to the
    /// destination alone.
    ///
    /// Fast on open terrain but not optimal. Until a node is expanded its
    /// predecessor is overwritten by whichever expanded node saw it last.
    /// The destination is accepted as soon as it is extracted.
    ///
    /// Fails with [`GraphError::NoCoordinates`] if the graph has no node
    /// positions.
    pub fn best_first_path(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Path, GraphError> {
        graph.check_node(origin)?;
        let h = Euclidean::toward(graph, destination)?;
        self.begin(graph, origin, destination)?;
        if origin == destination {
            return Ok(Path::trivial(origin));
        }

        let mut heap = std::mem::take(&mut self.heap);
        heap.insert(origin, h.estimate(origin));

        let found = 'search: loop {
            let Some(current) = heap.extract_min() else {
                break 'search false;
            };
            if current == destination {
                break 'search true;
            }
            let slot = self.slot_mut(current);
            if slot.closed {
                self.stats.stale += 1;
                continue;
            }
            slot.closed = true;
            self.stats.expanded += 1;

            for (next, _) in graph.neighbors(current) {
                let n = self.slot_mut(next);
                if n.closed {
                    continue;
                }
                n.parent = current;
                let pushed = heap.insert(next, h.estimate(next));
                debug_assert!(pushed, "heap sized below edge count");
            }
            self.stats.observe_frontier(heap.len());
        };

        heap.clear();
        self.heap = heap;
        Ok(self.finish(origin, destination, found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{brute_force_hops, coordless_graph, round_trip_graph};

    #[test]
    fn greedy_choice_can_be_suboptimal() {
        // Node 3 looks closer to 4 than node 1 does, so the greedy search
        // commits to the expensive 0 -> 3 edge.
        let g = round_trip_graph();
        let p = Searcher::new().best_first_path(&g, 0, 4).unwrap();
        assert_eq!(p.nodes(), &[0, 3, 2, 4]);
        assert_eq!(p.total_weight(&g), Some(8.0));
    }

    #[test]
    fn reachability_agrees_with_brute_force() {
        let g = round_trip_graph();
        let mut s = Searcher::new();
        for o in 0..6 {
            for d in 0..6 {
                let p = s.best_first_path(&g, o, d).unwrap();
                assert_eq!(!p.is_empty(), brute_force_hops(&g, o, d).is_some());
                if !p.is_empty() {
                    assert!(p.is_valid_in(&g));
                }
            }
        }
    }

    #[test]
    fn rejects_coordless_graphs() {
        let g = coordless_graph();
        let mut s = Searcher::new();
        assert_eq!(
            s.best_first_path(&g, 0, 4).unwrap_err(),
            GraphError::NoCoordinates
        );
    }

    #[test]
    fn range_is_checked_before_coordinates() {
        let g = coordless_graph();
        let err = Searcher::new().best_first_path(&g, 0, 60).unwrap_err();
        assert!(matches!(err, GraphError::OutOfRange { node: 60, .. }));
    }
}
