//! Fixtures and reference implementations shared by the unit tests.

use std::collections::VecDeque;

use proptest::prelude::*;
use proptest::sample::Index;
use waygraph_core::{CompactGraph, Coord, GraphBuilder, NodeId};

const ROUND_TRIP_EDGES: [(NodeId, NodeId, f32); 5] = [
    (0, 1, 1.0),
    (1, 2, 1.0),
    (0, 3, 5.0),
    (3, 2, 1.0),
    (2, 4, 2.0),
];

const ROUND_TRIP_COORDS: [(f32, f32); 6] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (2.0, 0.0),
    (2.0, 0.5),
    (4.0, 0.0),
    (9.0, 9.0),
];

fn round_trip_builder() -> GraphBuilder {
    let mut b = GraphBuilder::new(6);
    for (o, t, w) in ROUND_TRIP_EDGES {
        b.add_edge(o, t, w).unwrap();
    }
    b
}

/// Six nodes: a cheap route 0-1-2-4 (weight 4), an expensive detour
/// 0-3-2 and an isolated node 5. Positions keep the straight-line distance
/// admissible.
pub fn round_trip_graph() -> CompactGraph {
    let mut b = round_trip_builder();
    for (n, (x, y)) in ROUND_TRIP_COORDS.into_iter().enumerate() {
        b.set_position(n as NodeId, x, y).unwrap();
    }
    b.build().unwrap()
}

/// [`round_trip_graph`] without positions.
pub fn coordless_graph() -> CompactGraph {
    round_trip_builder().build().unwrap()
}

/// Fewest hops from `origin` to `destination`, by plain BFS over a
/// freshly allocated visited set.
pub fn brute_force_hops(g: &CompactGraph, origin: NodeId, destination: NodeId) -> Option<usize> {
    let mut dist = vec![usize::MAX; g.node_count()];
    let mut queue = VecDeque::from([origin]);
    dist[origin as usize] = 0;
    while let Some(n) = queue.pop_front() {
        for (m, _) in g.neighbors(n) {
            if dist[m as usize] == usize::MAX {
                dist[m as usize] = dist[n as usize] + 1;
                queue.push_back(m);
            }
        }
    }
    let d = dist[destination as usize];
    (d != usize::MAX).then_some(d)
}

/// Cheapest path cost by Bellman-Ford relaxation.
pub fn brute_force_cost(g: &CompactGraph, origin: NodeId, destination: NodeId) -> Option<f64> {
    let n = g.node_count();
    let mut cost = vec![f64::INFINITY; n];
    cost[origin as usize] = 0.0;
    for _ in 0..n {
        let mut changed = false;
        for u in 0..n as NodeId {
            let cu = cost[u as usize];
            if cu.is_infinite() {
                continue;
            }
            for (v, w) in g.neighbors(u) {
                let c = cu + f64::from(w);
                if c < cost[v as usize] {
                    cost[v as usize] = c;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    let c = cost[destination as usize];
    c.is_finite().then_some(c)
}

/// Random directed graphs with positions, where every edge weighs at least
/// the distance between its endpoints.
pub fn admissible_graph() -> impl Strategy<Value = CompactGraph> {
    (
        prop::collection::vec((0.0f32..100.0, 0.0f32..100.0), 1..24),
        prop::collection::vec((any::<Index>(), any::<Index>(), 1.0f64..3.0), 0..80),
    )
        .prop_map(|(positions, edges)| {
            let n = positions.len();
            let mut b = GraphBuilder::with_edge_capacity(n, edges.len());
            for (i, &(x, y)) in positions.iter().enumerate() {
                b.set_position(i as NodeId, x, y).unwrap();
            }
            for (a, z, stretch) in edges {
                let (a, z) = (a.index(n), z.index(n));
                let d = Coord::from(positions[a]).distance(Coord::from(positions[z]));
                // Pad so f32 rounding can never undercut the true distance.
                let w = (d * stretch) as f32 + 0.001;
                b.add_edge(a as NodeId, z as NodeId, w).unwrap();
            }
            b.build().unwrap()
        })
}
