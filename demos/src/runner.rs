//! Running every algorithm on every query across a worker pool.

use std::time::Instant;

use anyhow::{Context, bail};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use waygraph_core::{CompactGraph, NodeId};
use waygraph_paths::{Algorithm, SearcherPool};

use crate::memory::MemoryProbe;

/// One origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub origin: NodeId,
    pub destination: NodeId,
}

/// Outcome of one algorithm on one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub algorithm: Algorithm,
    pub origin: NodeId,
    pub destination: NodeId,
    pub elapsed_ms: f64,
    /// Nodes on the path, origin and destination included; 0 when none
    /// was found.
    pub path_nodes: usize,
    pub path_weight: Option<f64>,
    pub expanded: usize,
    /// Change in resident memory across the run, in MB.
    pub memory_mb: f64,
    pub found: bool,
}

/// `count` random pairs with distinct endpoints, reproducible from `seed`.
pub fn random_queries(graph: &CompactGraph, count: usize, seed: u64) -> anyhow::Result<Vec<Query>> {
    let n = graph.node_count();
    if n < 2 {
        bail!("graph has {n} node(s); queries need at least two");
    }
    let n = NodeId::try_from(n).context("graph too large for node ids")?;
    let mut rng = StdRng::seed_from_u64(seed);
    let queries = (0..count)
        .map(|_| {
            let origin = rng.random_range(0..n);
            let mut destination = rng.random_range(0..n - 1);
            if destination >= origin {
                destination += 1;
            }
            Query { origin, destination }
        })
        .collect();
    Ok(queries)
}

/// Runs algorithm/query jobs on a dedicated rayon pool, one pooled
/// searcher per job.
#[derive(Debug)]
pub struct Runner {
    workers: rayon::ThreadPool,
    searchers: SearcherPool,
}

impl Runner {
    pub fn new(threads: usize) -> anyhow::Result<Self> {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("waygraph-worker-{i}"))
            .build()
            .context("failed to start worker threads")?;
        Ok(Self {
            workers,
            searchers: SearcherPool::with_max_idle(threads),
        })
    }

    pub fn threads(&self) -> usize {
        self.workers.current_num_threads()
    }

    /// Every algorithm on every query. Samples are ordered by algorithm,
    /// then by query.
    pub fn run(
        &self,
        graph: &CompactGraph,
        algorithms: &[Algorithm],
        queries: &[Query],
    ) -> anyhow::Result<Vec<Sample>> {
        let jobs: Vec<(Algorithm, Query)> = algorithms
            .iter()
            .flat_map(|&a| queries.iter().map(move |&q| (a, q)))
            .collect();
        info!(
            "running {} searches ({} algorithms x {} queries) on {} threads",
            jobs.len(),
            algorithms.len(),
            queries.len(),
            self.threads()
        );
        let start = Instant::now();
        let samples = self.workers.install(|| {
            jobs.par_iter()
                .map(|&(algorithm, query)| self.run_one(graph, algorithm, query))
                .collect::<anyhow::Result<Vec<_>>>()
        })?;
        info!("all searches finished in {:.2?}", start.elapsed());
        Ok(samples)
    }

    fn run_one(&self, graph: &CompactGraph, algorithm: Algorithm, query: Query) -> anyhow::Result<Sample> {
        let mut searcher = self.searchers.checkout(graph);
        let mut probe = MemoryProbe::new();
        let before = probe.resident_mb();
        let start = Instant::now();
        let path = searcher
            .search(graph, query.origin, query.destination, algorithm)
            .with_context(|| format!("{algorithm} {} -> {}", query.origin, query.destination))?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let memory_mb = probe.resident_mb() - before;
        let expanded = searcher.stats().expanded;
        debug!(
            "{algorithm} {} -> {}: {} nodes in {elapsed_ms:.3} ms",
            query.origin,
            query.destination,
            path.len()
        );
        Ok(Sample {
            algorithm,
            origin: query.origin,
            destination: query.destination,
            elapsed_ms,
            path_nodes: path.len(),
            path_weight: path.total_weight(graph),
            expanded,
            memory_mb,
            found: !path.is_empty(),
        })
    }
}
