//! **waygraph-core**: compact graph representation used by the *waygraph*
//! search engine.
//!
//! This crate provides the foundational types shared by the other waygraph
//! crates: node identifiers, 2-D world coordinates, the immutable
//! compressed-sparse-row [`CompactGraph`], its two-phase [`GraphBuilder`],
//! and the [`GraphError`] taxonomy.
//!
//! A graph is built once and then only read. It is `Send + Sync`, so any
//! number of searches may borrow it concurrently.

pub mod builder;
pub mod error;
pub mod geom;
pub mod graph;

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use geom::Coord;
pub use graph::{CompactGraph, Neighbors};

/// Dense node index in `[0, node_count)`.
pub type NodeId = u32;
