use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::path::Path;
use crate::Searcher;

impl Searcher {
    /// Shortest weighted path from `origin` to `destination` with Dijkstra's
    /// algorithm.
    ///
    /// The heap has no decrease-key: an improved cost is inserted as a new
    /// entry and the outdated one is skipped when extracted, because its
    /// node is already closed. The destination is final when extracted.
    pub fn dijkstra_path(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Path, GraphError> {
        self.begin(graph, origin, destination)?;
        if origin == destination {
            return Ok(Path::trivial(origin));
        }

        let mut heap = std::mem::take(&mut self.heap);
        self.slot_mut(origin).cost = 0.0;
        heap.insert(origin, 0.0);

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
            let current_cost = slot.cost;
            self.stats.expanded += 1;

            for (next, weight) in graph.neighbors(current) {
                let tentative = current_cost + f64::from(weight);
                let n = self.slot_mut(next);
                if n.closed || tentative >= n.cost {
                    continue;
                }
                n.cost = tentative;
                n.parent = current;
                let pushed = heap.insert(next, tentative);
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
    use crate::testutil::{brute_force_cost, coordless_graph, round_trip_graph};
    use waygraph_core::GraphBuilder;

    #[test]
    fn round_trip_scenario() {
        let g = round_trip_graph();
        let mut s = Searcher::new();
        let p = s.dijkstra_path(&g, 0, 4).unwrap();
        assert_eq!(p.nodes(), &[0, 1, 2, 4]);
        assert_eq!(p.total_weight(&g), Some(4.0));
        assert_eq!(s.cost(4), 4.0);
    }

    #[test]
    fn works_without_coordinates() {
        let g = coordless_graph();
        let p = Searcher::new().dijkstra_path(&g, 0, 4).unwrap();
        assert_eq!(p.nodes(), &[0, 1, 2, 4]);
    }

    #[test]
    fn matches_brute_force_on_every_pair() {
        let g = round_trip_graph();
        let mut s = Searcher::new();
        for o in 0..6 {
            for d in 0..6 {
                let p = s.dijkstra_path(&g, o, d).unwrap();
                match brute_force_cost(&g, o, d) {
                    Some(c) => assert!((p.total_weight(&g).unwrap() - c).abs() < 1e-9),
                    None => assert!(p.is_empty()),
                }
            }
        }
    }

    #[test]
    fn stale_entries_are_skipped_not_reexpanded() {
        // 0 reaches 3 directly at cost 10 and through 1, 2 for less. Node 3
        // is inserted three times with decreasing keys; only one extraction
        // may expand it.
        let mut b = GraphBuilder::new(5);
        b.add_edge(0, 3, 10.0).unwrap();
        b.add_edge(0, 1, 1.0).unwrap();
        b.add_edge(1, 3, 5.0).unwrap();
        b.add_edge(1, 2, 1.0).unwrap();
        b.add_edge(2, 3, 1.0).unwrap();
        let g = b.build().unwrap();

        let mut s = Searcher::new();
        // Destination 4 is unreachable: the search drains the heap.
        assert!(s.dijkstra_path(&g, 0, 4).unwrap().is_empty());
        let stats = s.stats();
        assert_eq!(stats.expanded, 4);
        assert_eq!(stats.stale, 2);
        assert_eq!(s.cost(3), 3.0);
        assert_eq!(s.parent(3), Some(2));
    }

    #[test]
    fn zero_weight_edges() {
        let mut b = GraphBuilder::new(3);
        b.add_edge(0, 1, 0.0).unwrap();
        b.add_edge(1, 2, 0.0).unwrap();
        b.add_edge(0, 2, 0.5).unwrap();
        let g = b.build().unwrap();
        let p = Searcher::new().dijkstra_path(&g, 0, 2).unwrap();
        assert_eq!(p.nodes(), &[0, 1, 2]);
    }
}
