use thiserror::Error;
use waygraph_core::GraphError;

/// Invalid obstacle-mesh configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("mesh dimensions {width}x{height} must both be positive")]
    EmptyGrid { width: usize, height: usize },

    #[error("mesh of {cells} cells exceeds the node id range")]
    TooLarge { cells: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidFraction { name: &'static str, value: f64 },

    #[error("{name} range {min}..={max} is empty")]
    InvalidRange {
        name: &'static str,
        min: usize,
        max: usize,
    },

    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failure to load or convert a road network.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("failed to read road network: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed road network JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("edge references unknown node id {0}")]
    UnknownNode(i64),

    #[error("no node has two or more incident edges")]
    Empty,

    #[error(transparent)]
    Graph(#[from] GraphError),
}
