//! Road networks loaded from JSON.
//!
//! The input lists intersections by geographic position and streets as
//! unordered node pairs:
//!
//! ```json
//! { "nodes": [{ "id": 7, "lon": -71.53, "lat": -16.39 }, ...],
//!   "edges": [{ "from": 7, "to": 9 }, ...] }
//! ```
//!
//! Conversion drops every node touched by fewer than two street ends
//! (dead-end stubs and strays), numbers the remaining nodes densely in input
//! order and turns each street into a pair of opposite directed edges
//! weighted by the straight-line distance in degrees.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use waygraph_core::{CompactGraph, GraphBuilder, NodeId};

use crate::error::NetworkError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadEdge {
    pub from: i64,
    pub to: i64,
}

/// Target area for node positions. Longitudes map onto `[0, width]` and
/// latitudes onto `[0, height]` with north at the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    pub nodes: Vec<RoadNode>,
    pub edges: Vec<RoadEdge>,
}

impl RoadNetwork {
    pub fn from_json(text: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, NetworkError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let net = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            "loaded {} nodes and {} edges from {}",
            net.nodes.len(),
            net.edges.len(),
            path.display()
        );
        Ok(net)
    }

    /// A small street lattice: seven avenues by five streets, with one
    /// block merged into a park, three dead-end stubs and a stray node.
    pub fn sample() -> Self {
        const COLS: i64 = 7;
        const ROWS: i64 = 5;
        let id = |c: i64, r: i64| 1000 + r * COLS + c;

        let mut nodes = Vec::new();
        for r in 0..ROWS {
            for c in 0..COLS {
                nodes.push(RoadNode {
                    id: id(c, r),
                    lon: -71.545 + 0.004 * c as f64,
                    lat: -16.410 + 0.003 * r as f64,
                });
            }
        }
        let mut edges = Vec::new();
        for r in 0..ROWS {
            for c in 0..COLS {
                if c + 1 < COLS {
                    edges.push(RoadEdge {
                        from: id(c, r),
                        to: id(c + 1, r),
                    });
                }
                // The park interrupts avenue 3 between streets 1 and 2.
                if r + 1 < ROWS && !(c == 3 && r == 1) {
                    edges.push(RoadEdge {
                        from: id(c, r),
                        to: id(c, r + 1),
                    });
                }
            }
        }
        for (k, (c, r)) in [(0, 0), (6, 2), (3, 4)].into_iter().enumerate() {
            let stub = 2000 + k as i64;
            nodes.push(RoadNode {
                id: stub,
                lon: -71.545 + 0.004 * c as f64 + 0.001,
                lat: -16.410 + 0.003 * r as f64 - 0.001,
            });
            edges.push(RoadEdge {
                from: id(c, r),
                to: stub,
            });
        }
        nodes.push(RoadNode {
            id: 9999,
            lon: -71.52,
            lat: -16.42,
        });
        Self { nodes, edges }
    }

    /// Convert to a graph positioned in the default 1200 x 800 viewport.
    pub fn to_graph(&self) -> Result<CompactGraph, NetworkError> {
        self.to_graph_in(Viewport::default())
    }

    pub fn to_graph_in(&self, viewport: Viewport) -> Result<CompactGraph, NetworkError> {
        let mut degree: HashMap<i64, usize> = HashMap::new();
        for e in &self.edges {
            *degree.entry(e.from).or_default() += 1;
            *degree.entry(e.to).or_default() += 1;
        }
        let keep = |id: i64| degree.get(&id).is_some_and(|&d| d >= 2);

        let mut index: HashMap<i64, NodeId> = HashMap::new();
        let mut kept: Vec<&RoadNode> = Vec::new();
        for n in &self.nodes {
            if keep(n.id) && !index.contains_key(&n.id) {
                index.insert(n.id, kept.len() as NodeId);
                kept.push(n);
            }
        }
        if kept.is_empty() {
            return Err(NetworkError::Empty);
        }

        let mut arcs: Vec<(NodeId, NodeId, f32)> = Vec::with_capacity(self.edges.len() * 2);
        for e in self.edges.iter().filter(|e| keep(e.from) && keep(e.to)) {
            let u = *index.get(&e.from).ok_or(NetworkError::UnknownNode(e.from))?;
            let v = *index.get(&e.to).ok_or(NetworkError::UnknownNode(e.to))?;
            let (a, b) = (kept[u as usize], kept[v as usize]);
            let d = (b.lon - a.lon).hypot(b.lat - a.lat) as f32;
            arcs.push((u, v, d));
            arcs.push((v, u, d));
        }
        arcs.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)).then(a.2.total_cmp(&b.2)));

        let mut builder = GraphBuilder::with_edge_capacity(kept.len(), arcs.len());
        for &(u, v, d) in &arcs {
            builder.add_edge(u, v, d)?;
        }

        let bounds = Bounds::of(&kept);
        for (i, n) in kept.iter().enumerate() {
            let (x, y) = bounds.project(n, viewport);
            builder.set_position(i as NodeId, x, y)?;
        }

        debug!(
            "road network: kept {} of {} nodes, {} directed edges",
            kept.len(),
            self.nodes.len(),
            arcs.len()
        );
        Ok(builder.build()?)
    }
}

struct Bounds {
    lon: (f64, f64),
    lat: (f64, f64),
}

impl Bounds {
    fn of(nodes: &[&RoadNode]) -> Self {
        let mut b = Bounds {
            lon: (f64::INFINITY, f64::NEG_INFINITY),
            lat: (f64::INFINITY, f64::NEG_INFINITY),
        };
        for n in nodes {
            b.lon = (b.lon.0.min(n.lon), b.lon.1.max(n.lon));
            b.lat = (b.lat.0.min(n.lat), b.lat.1.max(n.lat));
        }
        b
    }

    fn project(&self, n: &RoadNode, viewport: Viewport) -> (f32, f32) {
        let scale = |offset: f64, (lo, hi): (f64, f64), extent: f64| {
            if hi > lo { offset / (hi - lo) * extent } else { 0.0 }
        };
        let x = scale(n.lon - self.lon.0, self.lon, viewport.width);
        let y = scale(self.lat.1 - n.lat, self.lat, viewport.height);
        (x as f32, y as f32)
    }
}
