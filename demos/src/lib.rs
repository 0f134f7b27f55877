//! Benchmark harness comparing the waygraph search algorithms on a large
//! graph.
//!
//! The binary resolves a [`BenchConfig`] from TOML and flags, builds the
//! graph, runs each algorithm on the same random queries across a thread
//! pool and reports per-algorithm statistics as CSV, HTML and log output.

pub mod config;
pub mod memory;
pub mod report;
pub mod runner;
pub mod source;

use log::info;

pub use config::{BenchConfig, Cli, GraphSource};
pub use report::{AlgorithmStats, Comparison};
pub use runner::{Query, Runner, Sample, random_queries};
pub use source::LoadedGraph;

/// Everything a benchmark run produced.
#[derive(Debug)]
pub struct Outcome {
    pub samples: Vec<Sample>,
    pub comparison: Comparison,
}

/// Build the graph, run every query and write the configured reports.
pub fn run(config: &BenchConfig) -> anyhow::Result<Outcome> {
    let loaded = source::load(config)?;
    let queries = random_queries(&loaded.graph, config.queries, config.query_seed)?;
    let algorithms = config.algorithm_set();
    let runner = Runner::new(config.threads)?;
    let samples = runner.run(&loaded.graph, &algorithms, &queries)?;

    let comparison = Comparison::from_samples(&samples);
    info!(
        "{} runs on {} ({} queries per algorithm)",
        samples.len(),
        loaded.description,
        queries.len()
    );
    report::log_summary(&comparison);

    if let Some(path) = &config.csv {
        report::save_csv(&samples, path)?;
    }
    if let Some(path) = &config.html {
        let title = format!("Path search on {}", loaded.description);
        report::save_html(&comparison, &title, path)?;
    }
    Ok(Outcome {
        samples,
        comparison,
    })
}
