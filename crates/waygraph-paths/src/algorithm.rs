use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use waygraph_core::{CompactGraph, GraphError, NodeId};

use crate::path::Path;
use crate::Searcher;

/// The search strategies a [`Searcher`] can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    BestFirst,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::BestFirst,
        Algorithm::AStar,
    ];

    /// Short display name, also accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::BestFirst => "Best-First",
            Algorithm::AStar => "A*",
        }
    }

    /// Whether the algorithm reads node positions.
    pub const fn needs_coordinates(self) -> bool {
        matches!(self, Algorithm::BestFirst | Algorithm::AStar)
    }

    /// Whether the algorithm minimizes total edge weight (given an
    /// admissible heuristic for A*).
    pub const fn is_weighted(self) -> bool {
        matches!(self, Algorithm::Dijkstra | Algorithm::AStar)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`Algorithm::from_str`] for an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm `{0}` (expected bfs, dfs, dijkstra, best-first or astar)")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "bestfirst" | "greedy" => Ok(Algorithm::BestFirst),
            "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(ParseAlgorithmError(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

impl Searcher {
    /// Run `algorithm` from `origin` to `destination`.
    pub fn search(
        &mut self,
        graph: &CompactGraph,
        origin: NodeId,
        destination: NodeId,
        algorithm: Algorithm,
    ) -> Result<Path, GraphError> {
        let path = match algorithm {
            Algorithm::Bfs => self.bfs_path(graph, origin, destination),
            Algorithm::Dfs => self.dfs_path(graph, origin, destination),
            Algorithm::Dijkstra => self.dijkstra_path(graph, origin, destination),
            Algorithm::BestFirst => self.best_first_path(graph, origin, destination),
            Algorithm::AStar => self.astar_path(graph, origin, destination),
        }?;
        log::trace!(
            "{algorithm} {origin} -> {destination}: {} nodes, {} expanded, {} stale",
            path.len(),
            self.stats.expanded,
            self.stats.stale
        );
        Ok(path)
    }
}

/// One-shot search with a freshly allocated [`Searcher`].
///
/// Convenient for single queries; repeated queries should keep a
/// `Searcher` (or a [`SearcherPool`](crate::SearcherPool)) around instead.
pub fn search(
    graph: &CompactGraph,
    origin: NodeId,
    destination: NodeId,
    algorithm: Algorithm,
) -> Result<Path, GraphError> {
    Searcher::for_graph(graph).search(graph, origin, destination, algorithm)
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn algorithm_names_in_config_files() {
        let a: Algorithm = serde_json::from_str("\"best-first\"").unwrap();
        assert_eq!(a, Algorithm::BestFirst);
        assert_eq!(serde_json::to_string(&Algorithm::AStar).unwrap(), "\"a-star\"");
    }
}
