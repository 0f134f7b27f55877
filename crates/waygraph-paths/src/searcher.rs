use std::collections::VecDeque;

use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::heap::MinHeap;
use crate::path::{self, Path};

/// Predecessor value of the origin and of unreached nodes.
pub const NO_PARENT: NodeId = NodeId::MAX;

// ---------------------------------------------------------------------------
// Per-node working state
// ---------------------------------------------------------------------------

/// Working state of one node, valid only while `generation` matches the
/// searcher's current generation.
#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) cost: f64,
    pub(crate) parent: NodeId,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            parent: NO_PARENT,
            generation: 0,
            closed: false,
        }
    }
}

/// Counters describing the most recent query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes whose outgoing edges were scanned.
    pub expanded: usize,
    /// Frontier entries discarded because their node was already finalized.
    pub stale: usize,
    /// Largest frontier size observed.
    pub peak_frontier: usize,
}

impl SearchStats {
    #[inline]
    pub(crate) fn observe_frontier(&mut self, len: usize) {
        self.peak_frontier = self.peak_frontier.max(len);
    }
}

// ---------------------------------------------------------------------------
// Searcher
// ---------------------------------------------------------------------------

/// Reusable working set for path searches.
///
/// A `Searcher` owns every buffer a search needs: per-node slots (visited
/// flag, predecessor, best cost), the priority queue, the FIFO queue and the
/// DFS stacks. Buffers are sized from the graph on first use and kept, so
/// repeated queries on the same graph allocate nothing after warm-up.
/// Between queries the slots are invalidated by bumping a generation counter
/// instead of being cleared.
///
/// Searches take `&mut self`; give each worker thread its own `Searcher`
/// (see [`SearcherPool`](crate::SearcherPool)). The graph is only borrowed
/// immutably and may be shared freely.
#[derive(Debug, Default)]
pub struct Searcher {
    pub(crate) slots: Vec<Slot>,
    pub(crate) generation: u32,
    pub(crate) heap: MinHeap,
    pub(crate) queue: VecDeque<NodeId>,
    pub(crate) stack: Vec<NodeId>,
    pub(crate) frames: Vec<(NodeId, usize, usize)>,
    pub(crate) stats: SearchStats,
}

impl Searcher {
    /// An empty searcher; buffers are allocated by the first query.
    pub fn new() -> Self {
        Self::default()
    }

    /// A searcher pre-sized for `graph`.
    pub fn for_graph(graph: &CompactGraph) -> Self {
        let mut s = Self::new();
        s.reserve_for(graph);
        s
    }

    /// Number of nodes the buffers currently cover.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether the buffers already cover `graph` without growing.
    pub fn fits(&self, graph: &CompactGraph) -> bool {
        self.slots.len() >= graph.node_count() && self.heap.capacity() > graph.edge_count()
    }

    /// Grow the buffers to cover `graph`. Never shrinks.
    pub fn reserve_for(&mut self, graph: &CompactGraph) {
        let n = graph.node_count();
        if self.slots.len() < n {
            self.slots.resize(n, Slot::default());
        }
        // Every relaxation inserts at most once, plus the origin.
        self.heap.reserve_capacity(graph.edge_count() + 1);
    }

    /// Counters of the most recent query.
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    // -----------------------------------------------------------------------
    // Query lifecycle
    // -----------------------------------------------------------------------

    /// Validate the endpoints and start a new generation.
    pub(crate) fn begin(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<(), GraphError> {
        graph.check_node(origin)?;
        graph.check_node(destination)?;
        self.reserve_for(graph);

        if self.generation == u32::MAX {
            // Stamps are about to repeat; wipe them once.
            self.slots.fill(Slot::default());
            self.generation = 0;
        }
        self.generation += 1;

        self.heap.clear();
        self.queue.clear();
        self.stack.clear();
        self.frames.clear();
        self.stats = SearchStats::default();
        Ok(())
    }

    /// Reconstruct the result of the current generation.
    pub(crate) fn finish(&self, origin: NodeId, destination: NodeId, found: bool) -> Path {
        if !found {
            return Path::none();
        }
        path::reconstruct(origin, destination, |n| self.parent(n))
    }

    // -----------------------------------------------------------------------
    // Slot helpers
    // -----------------------------------------------------------------------

    /// The slot of `node`, reset first if it belongs to an older generation.
    #[inline]
    pub(crate) fn slot_mut(&mut self, node: NodeId) -> &mut Slot {
        let generation = self.generation;
        let slot = &mut self.slots[node as usize];
        if slot.generation != generation {
            *slot = Slot {
                generation,
                ..Slot::default()
            };
        }
        slot
    }

    #[inline]
    fn current(&self, node: NodeId) -> Option<&Slot> {
        self.slots
            .get(node as usize)
            .filter(|s| s.generation == self.generation && self.generation != 0)
    }

    /// Predecessor of `node` in the most recent query.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.current(node)
            .map(|s| s.parent)
            .filter(|&p| p != NO_PARENT)
    }

    /// Best known cost of `node` in the most recent weighted query
    /// (`f64::INFINITY` if unreached).
    pub fn cost(&self, node: NodeId) -> f64 {
        self.current(node).map_or(f64::INFINITY, |s| s.cost)
    }

    /// Whether `node` was finalized by the most recent query.
    pub fn is_closed(&self, node: NodeId) -> bool {
        self.current(node).is_some_and(|s| s.closed)
    }
}
