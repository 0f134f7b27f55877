//! Graph sources for waygraph: a synthetic obstacle mesh and real road
//! networks.
//!
//! - [`Mesh`] turns a randomly generated grid of free and blocked cells into
//!   a [`CompactGraph`](waygraph_core::CompactGraph) of about two million
//!   nodes at the default size.
//! - [`RoadNetwork`] converts a JSON street map into a small symmetric graph.

pub mod error;
pub mod grid;
pub mod mesh;
pub mod network;

pub use error::{MeshError, NetworkError};
pub use grid::{CellGrid, CellKind};
pub use mesh::{Mesh, MeshConfig, MeshGen, MeshStats};
pub use network::{RoadEdge, RoadNetwork, RoadNode, Viewport};
