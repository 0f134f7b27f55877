//! Obstacle-mesh generation.
//!
//! A mesh is a rectangular grid whose free cells become graph nodes. The
//! generator layers several kinds of blocking terrain:
//! - **random obstacles**: each cell independently blocked with a fixed
//!   probability, as a plain obstacle, water or building;
//! - **buildings**: axis-aligned rectangles;
//! - **rivers**: meandering top-to-bottom strips, and round **lakes**;
//! - **roads**: a lattice of free horizontal and vertical corridors;
//!
//! then applies one majority-smoothing pass so that obstacles form coherent
//! blobs.

use std::f64::consts::SQRT_2;
use std::fmt;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use waygraph_core::{CompactGraph, GraphBuilder, NodeId};

use crate::error::MeshError;
use crate::grid::{CellGrid, CellKind};

/// Marks cells that carry no node.
const NO_NODE: NodeId = NodeId::MAX;

/// Lake centres keep this distance from the border on large meshes.
const LAKE_MARGIN: usize = 20;

/// Width of every road, in cells.
const ROAD_WIDTH: i64 = 3;

const STRAIGHT: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i64, i64); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Reference mesh side; feature counts in [`MeshConfig::default`] are
/// tuned for a square of this size (about two million cells).
pub const REFERENCE_SIDE: usize = 1414;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parameters of the obstacle mesh. Ranges are inclusive `(min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub width: usize,
    pub height: usize,
    /// Chance that a cell starts out blocked.
    pub obstacle_probability: f64,
    pub buildings: usize,
    pub building_size: (usize, usize),
    pub rivers: usize,
    pub river_width: (usize, usize),
    pub lakes: usize,
    pub lake_radius: (usize, usize),
    /// Roads per direction.
    pub roads: usize,
    /// A cell takes the majority kind of its 3x3 neighbourhood when at
    /// least this many of the nine cells agree.
    pub smoothing_threshold: usize,
    /// World units per cell.
    pub cell_size: f32,
    /// Connect a diagonal neighbour only when the source node id plus the
    /// neighbour's cell coordinates is even. Otherwise every free diagonal
    /// neighbour is connected.
    pub diagonal_parity: bool,
    /// Edge weights are the step length times a uniform factor in
    /// `[1 - weight_jitter, 1 + weight_jitter)`.
    pub weight_jitter: f64,
    /// If fewer cells than this fraction are free after generation, plain
    /// obstacles on every third row and column are cleared.
    pub min_free_ratio: f64,
    /// RNG seed; a random seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            width: REFERENCE_SIDE,
            height: REFERENCE_SIDE,
            obstacle_probability: 0.15,
            buildings: 500,
            building_size: (5, 25),
            rivers: 20,
            river_width: (2, 5),
            lakes: 30,
            lake_radius: (5, 15),
            roads: 10,
            smoothing_threshold: 6,
            cell_size: 1.0,
            diagonal_parity: true,
            weight_jitter: 0.1,
            min_free_ratio: 0.9,
            seed: None,
        }
    }
}

impl MeshConfig {
    /// Default parameters for a `width` x `height` mesh, with building,
    /// lake and river counts scaled from the reference size.
    pub fn with_size(width: usize, height: usize) -> Self {
        let base = Self::default();
        let area = (width * height) as f64 / (REFERENCE_SIDE * REFERENCE_SIDE) as f64;
        let span = width as f64 / REFERENCE_SIDE as f64;
        Self {
            width,
            height,
            buildings: (base.buildings as f64 * area).round() as usize,
            lakes: (base.lakes as f64 * area).round() as usize,
            rivers: (base.rivers as f64 * span).round() as usize,
            ..base
        }
    }

    /// Same configuration with a fixed seed.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.width == 0 || self.height == 0 {
            return Err(MeshError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        let cells = self.width.saturating_mul(self.height);
        if cells >= NO_NODE as usize {
            return Err(MeshError::TooLarge { cells });
        }
        for (name, value) in [
            ("obstacle probability", self.obstacle_probability),
            ("weight jitter", self.weight_jitter),
            ("minimum free ratio", self.min_free_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MeshError::InvalidFraction { name, value });
            }
        }
        for (name, (min, max), floor) in [
            ("building size", self.building_size, 1),
            ("river width", self.river_width, 1),
            ("lake radius", self.lake_radius, 0),
        ] {
            if min > max || min < floor {
                return Err(MeshError::InvalidRange { name, min, max });
            }
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(MeshError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Step-by-step mesh generator over a caller-supplied RNG.
///
/// [`run`](Self::run) applies every stage in order; the stages are public
/// so that tests and tools can compose their own terrain.
pub struct MeshGen<R: Rng> {
    pub rng: R,
    pub grid: CellGrid,
    config: MeshConfig,
}

impl<R: Rng> MeshGen<R> {
    /// A generator over an all-free grid.
    pub fn new(config: MeshConfig, rng: R) -> Result<Self, MeshError> {
        config.validate()?;
        Ok(Self {
            rng,
            grid: CellGrid::new(config.width, config.height),
            config,
        })
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Run every stage and number the free cells. `seed` is recorded in
    /// the result for reproducible edge weights.
    pub fn run(mut self, seed: u64) -> Mesh {
        info!(
            "generating {}x{} mesh (seed {seed})",
            self.config.width, self.config.height
        );
        self.scatter_obstacles();
        info!("random obstacles placed, {} cells blocked", self.blocked());
        self.place_buildings();
        info!("buildings placed, {} cells blocked", self.blocked());
        self.carve_rivers();
        self.carve_lakes();
        info!("rivers and lakes carved, {} cells blocked", self.blocked());
        self.lay_roads();
        let changed = self.smooth();
        debug!("smoothing changed {changed} cells");
        let relieved = self.relieve_if_congested();
        self.into_mesh(seed, relieved)
    }

    fn blocked(&self) -> usize {
        self.grid.cells().len() - self.grid.count(CellKind::Free)
    }

    /// Block each cell with probability `obstacle_probability`, picking its
    /// kind uniformly among the blocking kinds.
    pub fn scatter_obstacles(&mut self) {
        let p = self.config.obstacle_probability;
        for y in 0..self.grid.height() as i64 {
            for x in 0..self.grid.width() as i64 {
                if self.rng.random::<f64>() < p {
                    let kind = CellKind::BLOCKING[self.rng.random_range(0..CellKind::BLOCKING.len())];
                    self.grid.set(x, y, kind);
                }
            }
        }
    }

    /// Stamp rectangular buildings; rectangles are clipped at the border.
    pub fn place_buildings(&mut self) {
        let (w, h) = (self.grid.width() as i64, self.grid.height() as i64);
        let (lo, hi) = self.config.building_size;
        for _ in 0..self.config.buildings {
            let x0 = self.rng.random_range(0..w);
            let y0 = self.rng.random_range(0..h);
            let bw = self.rng.random_range(lo..=hi) as i64;
            let bh = self.rng.random_range(lo..=hi) as i64;
            for y in y0..(y0 + bh).min(h) {
                for x in x0..(x0 + bw).min(w) {
                    self.grid.set(x, y, CellKind::Building);
                }
            }
        }
    }

    /// Carve rivers from the top row to the bottom, drifting at most one
    /// column per row and varying in width.
    pub fn carve_rivers(&mut self) {
        let (w, h) = (self.grid.width() as i64, self.grid.height() as i64);
        let (lo, hi) = self.config.river_width;
        let max_x = (w - hi as i64).max(0);
        for _ in 0..self.config.rivers {
            let mut x = self.rng.random_range(0..=max_x);
            for y in 0..h {
                let width = self.rng.random_range(lo..=hi) as i64;
                for k in 0..width {
                    self.grid.set(x + k, y, CellKind::Water);
                }
                x = (x + self.rng.random_range(-1..=1)).clamp(0, max_x);
            }
        }
    }

    /// Flood round lakes, centred away from the border.
    pub fn carve_lakes(&mut self) {
        let (w, h) = (self.grid.width(), self.grid.height());
        let (lo, hi) = self.config.lake_radius;
        for _ in 0..self.config.lakes {
            let cx = self.rng.random_range(centre_range(w));
            let cy = self.rng.random_range(centre_range(h));
            let r = self.rng.random_range(lo..=hi) as i64;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy <= r * r {
                        self.grid.set(cx + dx, cy + dy, CellKind::Water);
                    }
                }
            }
        }
    }

    /// Clear evenly spaced horizontal and vertical roads, three cells wide.
    pub fn lay_roads(&mut self) {
        let (w, h) = (self.grid.width() as i64, self.grid.height() as i64);
        let n = self.config.roads as i64;
        let half = ROAD_WIDTH / 2;
        for i in 0..n {
            let y = (i + 1) * h / (n + 1);
            for x in 0..w {
                for off in -half..=half {
                    self.grid.set(x, y + off, CellKind::Free);
                }
            }
            let x = (i + 1) * w / (n + 1);
            for y in 0..h {
                for off in -half..=half {
                    self.grid.set(x + off, y, CellKind::Free);
                }
            }
        }
    }

    /// One majority pass over interior cells. Returns the number of cells
    /// that changed kind.
    pub fn smooth(&mut self) -> usize {
        let threshold = self.config.smoothing_threshold;
        let (w, h) = (self.grid.width() as i64, self.grid.height() as i64);
        let before = self.grid.clone();
        let mut changed = 0;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let mut counts = [0usize; 4];
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if let Some(k) = before.at(x + dx, y + dy) {
                            counts[k.index()] += 1;
                        }
                    }
                }
                let mut major = CellKind::Free;
                for k in CellKind::ALL {
                    if counts[k.index()] > counts[major.index()] {
                        major = k;
                    }
                }
                if counts[major.index()] >= threshold && before.at(x, y) != Some(major) {
                    self.grid.set(x, y, major);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Clear plain obstacles on every third row and column if the free
    /// fraction is below `min_free_ratio`. Returns whether it did.
    pub fn relieve_if_congested(&mut self) -> bool {
        let total = self.grid.cells().len();
        let free = self.grid.count(CellKind::Free);
        if (free as f64) >= self.config.min_free_ratio * total as f64 {
            return false;
        }
        warn!(
            "only {free} of {total} cells free ({:.1}%), clearing obstacles on every third row and column",
            100.0 * free as f64 / total as f64
        );
        for y in (0..self.grid.height() as i64).step_by(3) {
            for x in (0..self.grid.width() as i64).step_by(3) {
                if self.grid.at(x, y) == Some(CellKind::Obstacle) {
                    self.grid.set(x, y, CellKind::Free);
                }
            }
        }
        true
    }

    /// Number the free cells in row-major order.
    pub fn into_mesh(self, seed: u64, relieved: bool) -> Mesh {
        let mut node_ids = Vec::with_capacity(self.grid.cells().len());
        let mut next: NodeId = 0;
        for &kind in self.grid.cells() {
            if kind.is_passable() {
                node_ids.push(next);
                next += 1;
            } else {
                node_ids.push(NO_NODE);
            }
        }
        info!(
            "mesh has {next} free cells of {}",
            self.grid.cells().len()
        );
        Mesh {
            grid: self.grid,
            node_ids,
            node_count: next as usize,
            cell_size: self.config.cell_size,
            diagonal_parity: self.config.diagonal_parity,
            weight_jitter: self.config.weight_jitter,
            seed,
            relieved,
        }
    }
}

fn centre_range(len: usize) -> std::ops::RangeInclusive<i64> {
    let margin = LAKE_MARGIN.min(len / 2);
    let hi = (len - margin).min(len - 1).max(margin);
    margin as i64..=hi as i64
}

// ---------------------------------------------------------------------------
// Mesh
// ---------------------------------------------------------------------------

/// A generated mesh with its free cells numbered.
#[derive(Debug, Clone)]
pub struct Mesh {
    grid: CellGrid,
    node_ids: Vec<NodeId>,
    node_count: usize,
    cell_size: f32,
    diagonal_parity: bool,
    weight_jitter: f64,
    seed: u64,
    relieved: bool,
}

impl Mesh {
    /// Generate a mesh from `config` with a seeded [`StdRng`].
    pub fn generate(config: &MeshConfig) -> Result<Self, MeshError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mesh_gen = MeshGen::new(config.clone(), StdRng::seed_from_u64(seed))?;
        Ok(mesh_gen.run(seed))
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Node id of the free cell at `(x, y)`.
    pub fn node_at(&self, x: i64, y: i64) -> Option<NodeId> {
        if !self.grid.in_bounds(x, y) {
            return None;
        }
        let id = self.node_ids[y as usize * self.grid.width() + x as usize];
        (id != NO_NODE).then_some(id)
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            width: self.grid.width(),
            height: self.grid.height(),
            free: self.grid.count(CellKind::Free),
            obstacle: self.grid.count(CellKind::Obstacle),
            water: self.grid.count(CellKind::Water),
            building: self.grid.count(CellKind::Building),
            relieved: self.relieved,
        }
    }

    /// Build the graph with edge-weight jitter drawn from the mesh seed, so
    /// the same seed always yields the same graph.
    pub fn to_graph(&self) -> Result<CompactGraph, MeshError> {
        let mut rng = StdRng::seed_from_u64(self.seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15);
        self.to_graph_with(&mut rng)
    }

    /// Build the graph, drawing edge-weight jitter from `rng`.
    pub fn to_graph_with<R: Rng>(&self, rng: &mut R) -> Result<CompactGraph, MeshError> {
        let (w, h) = (self.grid.width() as i64, self.grid.height() as i64);
        let mut b = GraphBuilder::with_edge_capacity(self.node_count, self.node_count * 6);
        let straight = f64::from(self.cell_size);
        let diagonal = straight * SQRT_2;

        for y in 0..h {
            for x in 0..w {
                let Some(node) = self.node_at(x, y) else {
                    continue;
                };
                b.set_position(node, x as f32 * self.cell_size, y as f32 * self.cell_size)?;

                for (dx, dy) in STRAIGHT {
                    if let Some(next) = self.node_at(x + dx, y + dy) {
                        b.add_edge(node, next, self.jitter(straight, rng))?;
                    }
                }
                for (dx, dy) in DIAGONAL {
                    let (nx, ny) = (x + dx, y + dy);
                    let Some(next) = self.node_at(nx, ny) else {
                        continue;
                    };
                    if self.diagonal_parity && (i64::from(node) + nx + ny) % 2 != 0 {
                        continue;
                    }
                    b.add_edge(node, next, self.jitter(diagonal, rng))?;
                }
            }
        }
        Ok(b.build()?)
    }

    fn jitter<R: Rng>(&self, length: f64, rng: &mut R) -> f32 {
        let j = self.weight_jitter;
        let factor = if j > 0.0 {
            rng.random_range(1.0 - j..1.0 + j)
        } else {
            1.0
        };
        (length * factor) as f32
    }
}

/// Cell-kind counts of a generated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    pub width: usize,
    pub height: usize,
    pub free: usize,
    pub obstacle: usize,
    pub water: usize,
    pub building: usize,
    /// Whether the congestion fallback cleared obstacles.
    pub relieved: bool,
}

impl MeshStats {
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Share of `count` among all cells, in percent.
    pub fn percent(&self, count: usize) -> f64 {
        100.0 * count as f64 / self.cells().max(1) as f64
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} cells: {} free ({:.1}%), {} obstacle ({:.1}%), {} water ({:.1}%), {} building ({:.1}%)",
            self.width,
            self.height,
            self.free,
            self.percent(self.free),
            self.obstacle,
            self.percent(self.obstacle),
            self.water,
            self.percent(self.water),
            self.building,
            self.percent(self.building),
        )
    }
}
