//! Building the benchmark graph.

use std::time::{Duration, Instant};

use anyhow::Context;
use log::info;
use waygraph_core::CompactGraph;
use waygraph_mesh::{Mesh, MeshStats, RoadNetwork};

use crate::config::{BenchConfig, GraphSource};

/// The graph under test and how it was obtained.
#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: CompactGraph,
    pub description: String,
    pub mesh: Option<MeshStats>,
    pub build_time: Duration,
}

impl LoadedGraph {
    pub fn memory_mb(&self) -> f64 {
        self.graph.memory_usage() as f64 / (1024.0 * 1024.0)
    }
}

pub fn load(config: &BenchConfig) -> anyhow::Result<LoadedGraph> {
    let start = Instant::now();
    let (graph, description, mesh) = match config.source {
        GraphSource::Mesh => {
            let mesh = Mesh::generate(&config.mesh).context("mesh generation failed")?;
            let stats = mesh.stats();
            info!("mesh seed {}: {stats}", mesh.seed());
            let graph = mesh.to_graph().context("mesh conversion failed")?;
            let description = format!(
                "{}x{} obstacle mesh (seed {})",
                stats.width,
                stats.height,
                mesh.seed()
            );
            (graph, description, Some(stats))
        }
        GraphSource::Roads => {
            let path = config
                .roads
                .as_deref()
                .context("no road network file configured")?;
            let network = RoadNetwork::load(path)
                .with_context(|| format!("failed to load road network {}", path.display()))?;
            let graph = network.to_graph()?;
            (graph, format!("road network {}", path.display()), None)
        }
        GraphSource::Sample => {
            let graph = RoadNetwork::sample().to_graph()?;
            (graph, "sample road network".to_owned(), None)
        }
    };
    let loaded = LoadedGraph {
        graph,
        description,
        mesh,
        build_time: start.elapsed(),
    };
    info!(
        "{}: {} nodes, {} edges, {:.1} MiB, built in {:.2?}",
        loaded.description,
        loaded.graph.node_count(),
        loaded.graph.edge_count(),
        loaded.memory_mb(),
        loaded.build_time,
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waygraph_mesh::MeshConfig;

    #[test]
    fn sample_source() {
        let config = BenchConfig {
            source: GraphSource::Sample,
            ..BenchConfig::default()
        };
        let loaded = load(&config).unwrap();
        assert_eq!(loaded.graph.node_count(), 35);
        assert!(loaded.mesh.is_none());
        assert!(loaded.memory_mb() > 0.0);
    }

    #[test]
    fn small_mesh_source() {
        let config = BenchConfig {
            mesh: MeshConfig::with_size(50, 40).seeded(3),
            ..BenchConfig::default()
        };
        let loaded = load(&config).unwrap();
        let stats = loaded.mesh.unwrap();
        assert_eq!(loaded.graph.node_count(), stats.free);
        assert!(loaded.description.contains("50x40"));
    }

    #[test]
    fn missing_road_file() {
        let config = BenchConfig {
            source: GraphSource::Roads,
            roads: Some("/nonexistent/roads.json".into()),
            ..BenchConfig::default()
        };
        let err = load(&config).unwrap_err();
        assert!(format!("{err:#}").contains("roads.json"));
    }
}
