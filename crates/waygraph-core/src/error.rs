use thiserror::Error;

use crate::NodeId;

/// Structural errors raised by graph queries and graph construction.
///
/// An unreachable destination is not an error: searches report it as an
/// empty path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A node index outside `[0, node_count)`.
    #[error("node {node} is out of range for a graph of {node_count} nodes")]
    OutOfRange { node: NodeId, node_count: usize },

    /// Coordinates were requested from a graph built without positions.
    #[error("graph was built without node coordinates")]
    NoCoordinates,

    /// Edge weights must be finite and non-negative.
    #[error("edge {origin} -> {target} has invalid weight {weight}")]
    InvalidWeight {
        origin: NodeId,
        target: NodeId,
        weight: f32,
    },

    /// Node positions must be finite.
    #[error("node {node} has a non-finite position")]
    InvalidPosition { node: NodeId },

    /// Some, but not all, nodes were given a position.
    #[error("{missing} nodes have no position")]
    IncompleteCoordinates { missing: usize },
}

impl GraphError {
    pub(crate) fn out_of_range(node: NodeId, node_count: usize) -> Self {
        Self::OutOfRange { node, node_count }
    }
}
