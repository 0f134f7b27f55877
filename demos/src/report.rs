//! Aggregating samples and writing the CSV, HTML and log reports.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use log::info;
use serde::Serialize;
use waygraph_paths::Algorithm;

use crate::runner::Sample;

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate of one algorithm's samples. Path lengths count nodes and only
/// cover queries where a path was found.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmStats {
    pub algorithm: Algorithm,
    pub runs: usize,
    pub found: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Population standard deviation.
    pub std_dev_ms: f64,
    pub mean_memory_mb: f64,
    pub max_memory_mb: f64,
    pub mean_path: f64,
    pub min_path: usize,
    pub max_path: usize,
    pub mean_expanded: f64,
}

impl AlgorithmStats {
    /// `None` when `samples` holds no run of `algorithm`.
    pub fn from_samples(algorithm: Algorithm, samples: &[Sample]) -> Option<Self> {
        let runs: Vec<&Sample> = samples.iter().filter(|s| s.algorithm == algorithm).collect();
        if runs.is_empty() {
            return None;
        }
        let count = runs.len() as f64;
        let times: Vec<f64> = runs.iter().map(|s| s.elapsed_ms).collect();
        let mean_ms = times.iter().sum::<f64>() / count;
        let variance = times.iter().map(|t| (t - mean_ms).powi(2)).sum::<f64>() / count;

        let lengths: Vec<usize> = runs.iter().filter(|s| s.found).map(|s| s.path_nodes).collect();
        let mean_path = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };

        Some(Self {
            algorithm,
            runs: runs.len(),
            found: lengths.len(),
            mean_ms,
            min_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
            max_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev_ms: variance.sqrt(),
            mean_memory_mb: runs.iter().map(|s| s.memory_mb).sum::<f64>() / count,
            max_memory_mb: runs
                .iter()
                .map(|s| s.memory_mb)
                .fold(f64::NEG_INFINITY, f64::max),
            mean_path,
            min_path: lengths.iter().copied().min().unwrap_or(0),
            max_path: lengths.iter().copied().max().unwrap_or(0),
            mean_expanded: runs.iter().map(|s| s.expanded as f64).sum::<f64>() / count,
        })
    }

    /// Percentage of runs that found a path.
    pub fn success_rate(&self) -> f64 {
        100.0 * self.found as f64 / self.runs as f64
    }
}

/// Per-algorithm statistics and the cross-algorithm verdicts.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub stats: Vec<AlgorithmStats>,
    pub fastest: Option<Algorithm>,
    pub slowest: Option<Algorithm>,
    pub leanest: Option<Algorithm>,
    /// Shortest mean path among algorithms that found any path.
    pub best_quality: Option<Algorithm>,
}

impl Comparison {
    pub fn from_samples(samples: &[Sample]) -> Self {
        let stats: Vec<AlgorithmStats> = Algorithm::ALL
            .into_iter()
            .filter_map(|a| AlgorithmStats::from_samples(a, samples))
            .collect();

        let pick = |key: fn(&AlgorithmStats) -> f64, want_max: bool| {
            stats
                .iter()
                .map(|s| (s.algorithm, key(s)))
                .reduce(|best, next| {
                    let better = if want_max { next.1 > best.1 } else { next.1 < best.1 };
                    if better { next } else { best }
                })
                .map(|(a, _)| a)
        };
        let best_quality = stats
            .iter()
            .filter(|s| s.found > 0)
            .map(|s| (s.algorithm, s.mean_path))
            .reduce(|best, next| if next.1 < best.1 { next } else { best })
            .map(|(a, _)| a);

        Self {
            fastest: pick(|s| s.mean_ms, false),
            slowest: pick(|s| s.mean_ms, true),
            leanest: pick(|s| s.mean_memory_mb, false),
            best_quality,
            stats,
        }
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&AlgorithmStats> {
        self.stats.iter().find(|s| s.algorithm == algorithm)
    }

    /// Mean Dijkstra time divided by mean time of `other`; above 1 means
    /// `other` is faster.
    pub fn speedup_over_dijkstra(&self, other: Algorithm) -> Option<f64> {
        let dijkstra = self.get(Algorithm::Dijkstra)?.mean_ms;
        let other = self.get(other)?.mean_ms;
        (other > 0.0).then(|| dijkstra / other)
    }
}

// ---------------------------------------------------------------------------
// Log summary
// ---------------------------------------------------------------------------

pub fn log_summary(comparison: &Comparison) {
    let name = |a: Option<Algorithm>| a.map_or("-", Algorithm::name);
    info!("fastest: {}", name(comparison.fastest));
    info!("slowest: {}", name(comparison.slowest));
    info!("lowest memory: {}", name(comparison.leanest));
    info!("shortest paths: {}", name(comparison.best_quality));

    info!(
        "{:<11}{:>11}{:>11}{:>11}{:>11}{:>11}{:>10}{:>10}{:>12}",
        "algorithm", "mean ms", "min ms", "max ms", "std ms", "mem MB", "found %", "nodes", "expanded"
    );
    for s in &comparison.stats {
        info!(
            "{:<11}{:>11.3}{:>11.3}{:>11.3}{:>11.3}{:>11.2}{:>10.1}{:>10.1}{:>12.0}",
            s.algorithm.name(),
            s.mean_ms,
            s.min_ms,
            s.max_ms,
            s.std_dev_ms,
            s.mean_memory_mb,
            s.success_rate(),
            s.mean_path,
            s.mean_expanded,
        );
    }

    for other in [Algorithm::AStar, Algorithm::Bfs] {
        if let Some(ratio) = comparison.speedup_over_dijkstra(other) {
            let verdict = if ratio >= 1.0 { "faster" } else { "slower" };
            let factor = if ratio >= 1.0 { ratio } else { 1.0 / ratio };
            info!("{other} is {factor:.2}x {verdict} than Dijkstra");
        }
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    origin: u32,
    destination: u32,
    algorithm: &'a str,
    elapsed_ms: f64,
    path_nodes: usize,
    path_weight: Option<f64>,
    expanded: usize,
    memory_mb: f64,
    found: bool,
}

impl<'a> From<&'a Sample> for CsvRow<'a> {
    fn from(s: &'a Sample) -> Self {
        Self {
            origin: s.origin,
            destination: s.destination,
            algorithm: s.algorithm.name(),
            elapsed_ms: s.elapsed_ms,
            path_nodes: s.path_nodes,
            path_weight: s.path_weight,
            expanded: s.expanded,
            memory_mb: s.memory_mb,
            found: s.found,
        }
    }
}

pub fn write_csv<W: std::io::Write>(samples: &[Sample], out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for sample in samples {
        writer.serialize(CsvRow::from(sample))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv(samples: &[Sample], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(samples, file).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// A standalone HTML page with the summary table. The fastest algorithm's
/// row is highlighted.
pub fn render_html(comparison: &Comparison, title: &str) -> String {
    let mut html = String::new();
    let title = escape(title);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\nbody {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         th, td {{ border: 1px solid #999; padding: 4px 10px; text-align: right; }}\n\
         th:first-child, td:first-child {{ text-align: left; }}\n\
         tr.best {{ background: #d4f7d4; }}\n</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    html.push_str(
        "<table>\n<tr><th>Algorithm</th><th>Mean ms</th><th>Min ms</th><th>Max ms</th>\
         <th>Std ms</th><th>Mean MB</th><th>Max MB</th><th>Success %</th>\
         <th>Mean nodes</th><th>Min nodes</th><th>Max nodes</th><th>Expanded</th></tr>\n",
    );
    for s in &comparison.stats {
        let class = if comparison.fastest == Some(s.algorithm) {
            " class=\"best\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<tr{class}><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td>\
             <td>{:.2}</td><td>{:.2}</td><td>{:.1}</td><td>{:.1}</td><td>{}</td><td>{}</td>\
             <td>{:.0}</td></tr>",
            escape(s.algorithm.name()),
            s.mean_ms,
            s.min_ms,
            s.max_ms,
            s.std_dev_ms,
            s.mean_memory_mb,
            s.max_memory_mb,
            s.success_rate(),
            s.mean_path,
            s.min_path,
            s.max_path,
            s.mean_expanded,
        );
    }
    html.push_str("</table>\n<ul>\n");

    let verdicts = [
        ("Fastest", comparison.fastest),
        ("Slowest", comparison.slowest),
        ("Lowest memory", comparison.leanest),
        ("Shortest paths", comparison.best_quality),
    ];
    for (label, algorithm) in verdicts {
        let name = algorithm.map_or("-", Algorithm::name);
        let _ = writeln!(html, "<li>{label}: <b>{}</b></li>", escape(name));
    }
    for other in [Algorithm::AStar, Algorithm::Bfs] {
        if let Some(ratio) = comparison.speedup_over_dijkstra(other) {
            let _ = writeln!(
                html,
                "<li>Dijkstra / {} mean time: {ratio:.2}</li>",
                escape(other.name())
            );
        }
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

pub fn save_html(comparison: &Comparison, title: &str, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, render_html(comparison, title))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote report to {}", path.display());
    Ok(())
}
