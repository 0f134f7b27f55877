use waygraph_core::{CompactGraph, Coord, GraphError, NodeId};

/// Straight-line distance estimate toward a fixed destination.
///
/// Admissible only when every edge weighs at least the Euclidean distance
/// between its endpoints.
#[derive(Clone, Copy, Debug)]
pub struct Euclidean<'a> {
    coords: &'a [Coord],
    goal: Coord,
}

impl<'a> Euclidean<'a> {
    /// Estimator toward `destination`. Fails with
    /// [`GraphError::NoCoordinates`] on graphs built without positions.
    pub fn toward(graph: &'a CompactGraph, destination: NodeId) -> Result<Self, GraphError> {
        graph.check_node(destination)?;
        let coords = graph.coordinates().ok_or(GraphError::NoCoordinates)?;
        Ok(Self {
            coords,
            goal: coords[destination as usize],
        })
    }

    /// Estimated remaining distance from `node`.
    #[inline]
    pub fn estimate(&self, node: NodeId) -> f64 {
        self.coords[node as usize].distance(self.goal)
    }
}
