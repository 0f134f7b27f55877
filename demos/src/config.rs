//! Harness configuration: an optional TOML file overridden by command-line
//! flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use waygraph_mesh::MeshConfig;
use waygraph_paths::Algorithm;

/// Where the benchmark graph comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GraphSource {
    /// Generated obstacle mesh.
    Mesh,
    /// Road network JSON file.
    Roads,
    /// Built-in sample road network.
    Sample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub source: GraphSource,
    pub mesh: MeshConfig,
    /// Road network JSON, required when `source = "roads"`.
    pub roads: Option<PathBuf>,
    /// Number of random origin/destination pairs.
    pub queries: usize,
    /// Worker threads.
    pub threads: usize,
    pub algorithms: Vec<Algorithm>,
    pub query_seed: u64,
    /// Per-run CSV output; skipped when unset.
    pub csv: Option<PathBuf>,
    /// HTML summary output; skipped when unset.
    pub html: Option<PathBuf>,
    /// Log specification, e.g. `info` or `waygraph_paths=trace`.
    pub log_level: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            source: GraphSource::Mesh,
            mesh: MeshConfig::default(),
            roads: None,
            queries: 20,
            threads: cores.min(4),
            algorithms: Algorithm::ALL.to_vec(),
            query_seed: 42,
            csv: Some(PathBuf::from("bench_results.csv")),
            html: Some(PathBuf::from("bench_report.html")),
            log_level: "info".to_owned(),
        }
    }
}

/// Compare BFS, DFS, Dijkstra, Best-First and A* on a large graph.
#[derive(Debug, Parser)]
#[command(name = "waygraph-bench", version, about)]
pub struct Cli {
    /// TOML configuration file; flags override its values.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Graph source.
    #[arg(long, value_enum)]
    pub source: Option<GraphSource>,

    /// Mesh width in cells (rescales feature counts).
    #[arg(long)]
    pub width: Option<usize>,

    /// Mesh height in cells (rescales feature counts).
    #[arg(long)]
    pub height: Option<usize>,

    /// Mesh RNG seed.
    #[arg(long)]
    pub mesh_seed: Option<u64>,

    /// Road network JSON file (implies `--source roads`).
    #[arg(long, value_name = "FILE")]
    pub roads: Option<PathBuf>,

    /// Number of random queries.
    #[arg(short, long)]
    pub queries: Option<usize>,

    /// Worker threads.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Comma-separated algorithms, e.g. `dijkstra,astar`.
    #[arg(short, long, value_delimiter = ',')]
    pub algorithms: Option<Vec<Algorithm>>,

    /// Seed for query selection.
    #[arg(long)]
    pub query_seed: Option<u64>,

    /// CSV output path.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// HTML report path.
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Do not write the CSV file.
    #[arg(long)]
    pub no_csv: bool,

    /// Do not write the HTML report.
    #[arg(long)]
    pub no_html: bool,

    /// Log specification.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl BenchConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid benchmark configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// The file named by `--config` (or defaults) with every flag applied.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(source) = cli.source {
            self.source = source;
        }
        if cli.width.is_some() || cli.height.is_some() {
            let width = cli.width.unwrap_or(self.mesh.width);
            let height = cli.height.unwrap_or(self.mesh.height);
            let scaled = MeshConfig::with_size(width, height);
            self.mesh.width = width;
            self.mesh.height = height;
            self.mesh.buildings = scaled.buildings;
            self.mesh.lakes = scaled.lakes;
            self.mesh.rivers = scaled.rivers;
        }
        if let Some(seed) = cli.mesh_seed {
            self.mesh.seed = Some(seed);
        }
        if let Some(roads) = &cli.roads {
            self.roads = Some(roads.clone());
            if cli.source.is_none() {
                self.source = GraphSource::Roads;
            }
        }
        if let Some(q) = cli.queries {
            self.queries = q;
        }
        if let Some(t) = cli.threads {
            self.threads = t;
        }
        if let Some(algorithms) = &cli.algorithms {
            self.algorithms = algorithms.clone();
        }
        if let Some(seed) = cli.query_seed {
            self.query_seed = seed;
        }
        if cli.csv.is_some() {
            self.csv = cli.csv.clone();
        }
        if cli.html.is_some() {
            self.html = cli.html.clone();
        }
        if cli.no_csv {
            self.csv = None;
        }
        if cli.no_html {
            self.html = None;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.queries == 0 {
            bail!("at least one query is required");
        }
        if self.threads == 0 {
            bail!("at least one worker thread is required");
        }
        if self.algorithms.is_empty() {
            bail!("no algorithms selected");
        }
        if self.source == GraphSource::Roads && self.roads.is_none() {
            bail!("source `roads` needs a road network file (--roads <FILE>)");
        }
        if self.source == GraphSource::Mesh {
            self.mesh.validate()?;
        }
        Ok(())
    }

    /// Selected algorithms without repeats, in their canonical order.
    pub fn algorithm_set(&self) -> Vec<Algorithm> {
        let mut set = self.algorithms.clone();
        set.sort();
        set.dedup();
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("waygraph-bench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let c = BenchConfig::default();
        assert_eq!(c.source, GraphSource::Mesh);
        assert_eq!(c.queries, 20);
        assert!((1..=4).contains(&c.threads));
        assert_eq!(c.algorithms, Algorithm::ALL);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = BenchConfig::from_toml(
            r#"
            source = "sample"
            queries = 5
            algorithms = ["dijkstra", "a-star"]

            [mesh]
            width = 200
            building_size = [3, 9]
            "#,
        )
        .unwrap();
        assert_eq!(c.source, GraphSource::Sample);
        assert_eq!(c.queries, 5);
        assert_eq!(c.algorithms, [Algorithm::Dijkstra, Algorithm::AStar]);
        assert_eq!(c.mesh.width, 200);
        assert_eq!(c.mesh.height, 1414);
        assert_eq!(c.mesh.building_size, (3, 9));
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn bundled_example_config_parses() {
        let c = BenchConfig::from_toml(include_str!("../bench.toml")).unwrap();
        assert_eq!(c.mesh, MeshConfig::default().seeded(12345));
        assert_eq!(c.algorithms, Algorithm::ALL);
        assert_eq!(c.threads, 4);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(BenchConfig::from_toml("queries = \"many\"").is_err());
        assert!(BenchConfig::from_toml("source = \"ocean\"").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut c = BenchConfig::default();
        c.apply(&cli(&[
            "--width",
            "100",
            "--height",
            "50",
            "--mesh-seed",
            "9",
            "-q",
            "7",
            "-t",
            "2",
            "-a",
            "bfs,astar",
            "--no-html",
            "--log-level",
            "debug",
        ]));
        assert_eq!((c.mesh.width, c.mesh.height), (100, 50));
        assert_eq!(c.mesh.buildings, MeshConfig::with_size(100, 50).buildings);
        assert_eq!(c.mesh.seed, Some(9));
        assert_eq!(c.queries, 7);
        assert_eq!(c.threads, 2);
        assert_eq!(c.algorithms, [Algorithm::Bfs, Algorithm::AStar]);
        assert_eq!(c.html, None);
        assert!(c.csv.is_some());
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn roads_flag_selects_the_road_source() {
        let mut c = BenchConfig::default();
        c.apply(&cli(&["--roads", "city.json"]));
        assert_eq!(c.source, GraphSource::Roads);
        assert_eq!(c.roads, Some(PathBuf::from("city.json")));

        let mut c = BenchConfig::default();
        c.apply(&cli(&["--source", "sample", "--roads", "city.json"]));
        assert_eq!(c.source, GraphSource::Sample);
    }

    #[test]
    fn validation() {
        let c = BenchConfig {
            source: GraphSource::Roads,
            ..BenchConfig::default()
        };
        assert!(c.validate().is_err());
        let c = BenchConfig {
            queries: 0,
            ..BenchConfig::default()
        };
        assert!(c.validate().is_err());
        let c = BenchConfig {
            algorithms: vec![],
            ..BenchConfig::default()
        };
        assert!(c.validate().is_err());
        assert!(Cli::try_parse_from(["waygraph-bench", "-a", "floyd"]).is_err());
    }

    #[test]
    fn algorithm_set_is_canonical() {
        let c = BenchConfig {
            algorithms: vec![Algorithm::AStar, Algorithm::Bfs, Algorithm::AStar],
            ..BenchConfig::default()
        };
        assert_eq!(c.algorithm_set(), [Algorithm::Bfs, Algorithm::AStar]);
    }
}
