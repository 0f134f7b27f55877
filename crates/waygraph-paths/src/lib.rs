//! Path searches over a [`CompactGraph`](waygraph_core::CompactGraph).
//!
//! Five strategies share one contract: given an origin and a destination,
//! return the node sequence from one to the other, the single-node path when
//! they coincide, or an empty [`Path`] when the destination is unreachable.
//!
//! | Strategy | Frontier | Minimizes | Needs positions |
//! |---|---|---|---|
//! | BFS ([`Searcher::bfs_path`]) | FIFO queue | hops | no |
//! | DFS ([`Searcher::dfs_path`], [`Searcher::dfs_descent_path`]) | stack | nothing | no |
//! | Dijkstra ([`Searcher::dijkstra_path`]) | [`MinHeap`] on cost | total weight | no |
//! | Best-First ([`Searcher::best_first_path`]) | [`MinHeap`] on distance left | nothing | yes |
//! | A\* ([`Searcher::astar_path`]) | [`MinHeap`] on cost + distance left | total weight | yes |
//!
//! All searches run through a [`Searcher`], which owns and reuses the
//! working buffers so that repeated queries allocate nothing after warm-up.
//! For many threads, hand out searchers from a [`SearcherPool`].

mod algorithm;
mod astar;
mod best_first;
mod bfs;
mod dfs;
mod dijkstra;
mod distance;
mod heap;
mod path;
mod pool;
mod searcher;

#[cfg(test)]
mod testutil;

pub use algorithm::{Algorithm, ParseAlgorithmError, search};
pub use distance::Euclidean;
pub use heap::MinHeap;
pub use path::{Path, reconstruct};
pub use pool::{PooledSearcher, SearcherPool};
pub use searcher::{NO_PARENT, SearchStats, Searcher};
