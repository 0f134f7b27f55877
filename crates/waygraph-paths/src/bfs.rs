use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::path::Path;
use crate::Searcher;

impl Searcher {
    /// Breadth-first search from `origin` to `destination`.
    ///
    /// Edge weights are ignored: the returned path has the minimum number of
    /// hops. Nodes are marked visited when enqueued and the search stops
    /// when the destination is dequeued.
    pub fn bfs_path(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Path, GraphError> {
        self.begin(graph, origin, destination)?;
        if origin == destination {
            return Ok(Path::trivial(origin));
        }

        let mut queue = std::mem::take(&mut self.queue);
        self.slot_mut(origin).closed = true;
        queue.push_back(origin);

        let found = 'search: loop {
            let Some(current) = queue.pop_front() else {
                break 'search false;
            };
            if current == destination {
                break 'search true;
            }
            self.stats.expanded += 1;

            for (next, _) in graph.neighbors(current) {
                let slot = self.slot_mut(next);
                if slot.closed {
                    continue;
                }
                slot.closed = true;
                slot.parent = current;
                queue.push_back(next);
            }
            self.stats.observe_frontier(queue.len());
        };

        queue.clear();
        self.queue = queue;
        Ok(self.finish(origin, destination, found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{brute_force_hops, round_trip_graph};
    use waygraph_core::GraphBuilder;

    #[test]
    fn round_trip_scenario_takes_three_hops() {
        let g = round_trip_graph();
        let p = Searcher::new().bfs_path(&g, 0, 4).unwrap();
        assert_eq!(p.hops(), 3);
        assert_eq!(p.origin(), Some(0));
        assert_eq!(p.destination(), Some(4));
        assert!(p.is_valid_in(&g));
    }

    #[test]
    fn prefers_fewer_hops_over_lower_weight() {
        let mut b = GraphBuilder::new(4);
        b.add_edge(0, 1, 1.0).unwrap();
        b.add_edge(1, 2, 1.0).unwrap();
        b.add_edge(2, 3, 1.0).unwrap();
        b.add_edge(0, 3, 100.0).unwrap();
        let g = b.build().unwrap();
        let p = Searcher::new().bfs_path(&g, 0, 3).unwrap();
        assert_eq!(p.nodes(), &[0, 3]);
    }

    #[test]
    fn matches_brute_force_hop_count() {
        let g = round_trip_graph();
        let mut s = Searcher::new();
        for o in 0..6 {
            for d in 0..6 {
                let p = s.bfs_path(&g, o, d).unwrap();
                match brute_force_hops(&g, o, d) {
                    Some(h) => assert_eq!(p.hops(), h, "{o} -> {d}"),
                    None => assert!(p.is_empty(), "{o} -> {d}"),
                }
            }
        }
    }

    #[test]
    fn exhausts_the_reachable_set_when_unreachable() {
        let g = round_trip_graph();
        let mut s = Searcher::new();
        let p = s.bfs_path(&g, 0, 5).unwrap();
        assert!(p.is_empty());
        // 0, 1, 2, 3, 4 are reachable from 0 and each is expanded once.
        assert_eq!(s.stats().expanded, 5);
    }

    #[test]
    fn follows_edge_direction() {
        let g = round_trip_graph();
        assert!(Searcher::new().bfs_path(&g, 4, 0).unwrap().is_empty());
    }
}
