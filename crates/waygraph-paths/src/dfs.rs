//! Depth-first search, in two flavours.
//!
//! Neither returns shortest paths; both return *a* path when one exists.

use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::path::Path;
use crate::Searcher;

impl Searcher {
    /// Stack-based depth-first search.
    ///
    /// Nodes are marked visited when popped. A node's predecessor is fixed
    /// the first time it is pushed and never overwritten, so later pushes of
    /// the same node do not reroute the path.
    pub fn dfs_path(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Path, GraphError> {
        self.begin(graph, origin, destination)?;
        if origin == destination {
            return Ok(Path::trivial(origin));
        }

        let mut stack = std::mem::take(&mut self.stack);
        stack.push(origin);

        let found = 'search: loop {
            let Some(current) = stack.pop() else {
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
            self.stats.expanded += 1;

            for (next, _) in graph.neighbors(current) {
                let slot = self.slot_mut(next);
                if slot.closed {
                    continue;
                }
                if slot.parent == crate::NO_PARENT && next != origin {
                    slot.parent = current;
                }
                stack.push(next);
            }
            self.stats.observe_frontier(stack.len());
        };

        stack.clear();
        self.stack = stack;
        Ok(self.finish(origin, destination, found))
    }

    /// Depth-first descent with recursive semantics.
    ///
    /// Each newly discovered neighbor is visited immediately, before the
    /// remaining neighbors of the current node, exactly as a recursive DFS
    /// would. The recursion is kept on an explicit frame stack so that deep
    /// graphs cannot overflow the call stack, and the "found" signal is the
    /// loop's break value rather than shared state.
    pub fn dfs_descent_path(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Path, GraphError> {
        self.begin(graph, origin, destination)?;
        if origin == destination {
            return Ok(Path::trivial(origin));
        }

        // Frame: (node, next edge position, end of the node's edges).
        let mut frames = std::mem::take(&mut self.frames);
        self.slot_mut(origin).closed = true;
        let r = graph.edge_range(origin);
        frames.push((origin, r.start, r.end));
        self.stats.expanded += 1;

        let found = 'search: loop {
            let Some(top) = frames.last_mut() else {
                break 'search false;
            };
            if top.1 == top.2 {
                frames.pop();
                continue;
            }
            let current = top.0;
            let (next, _) = graph.edge(top.1);
            top.1 += 1;

            let slot = self.slot_mut(next);
            if slot.closed {
                continue;
            }
            slot.closed = true;
            slot.parent = current;
            if next == destination {
                break 'search true;
            }

            let r = graph.edge_range(next);
            frames.push((next, r.start, r.end));
            self.stats.expanded += 1;
            self.stats.observe_frontier(frames.len());
        };

        frames.clear();
        self.frames = frames;
        Ok(self.finish(origin, destination, found))
    }
}
