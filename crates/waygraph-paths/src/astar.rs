use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::distance::Euclidean;
use crate::path::Path;
use crate::Searcher;

impl Searcher {
    /// A* search ordered by cost so far plus straight-line distance to the
    /// destination.
    ///
    /// The result is a shortest path whenever no edge weighs less than the
    /// distance between its endpoints. Fails with
    /// [`GraphError::NoCoordinates`] if the graph has no node positions.
    pub fn astar_path(
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
        self.slot_mut(origin).cost = 0.0;
        heap.insert(origin, h.estimate(origin));

        let found = 'search: loop {
            let Some(current) = heap.extract_min() else {
                break 'search false;
            };

            let slot = self.slot_mut(current);
            if slot.closed {
                self.stats.stale += 1;
                continue;
            }
            slot.closed = true;
            if current == destination {
                break 'search true;
            }
            let g = slot.cost;
            self.stats.expanded += 1;

            for (next, weight) in graph.neighbors(current) {
                let tentative = g + f64::from(weight);
                let n = self.slot_mut(next);
                if n.closed || tentative >= n.cost {
                    continue;
                }
                n.cost = tentative;
                n.parent = current;
                let pushed = heap.insert(next, tentative + h.estimate(next));
                debug_assert!(pushed, "heap sized below edge count");
            }
            self.stats.observe_frontier(heap.len());
        };

        heap.clear();
        self.heap = heap;
        Ok(self.finish(origin, destination, found))
    }
}
