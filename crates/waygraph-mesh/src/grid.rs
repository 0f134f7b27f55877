//! A dense rectangular grid of terrain cells.

/// Terrain of one mesh cell. Only [`CellKind::Free`] cells become graph
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CellKind {
    #[default]
    Free = 0,
    Obstacle = 1,
    Water = 2,
    Building = 3,
}

impl CellKind {
    pub const ALL: [CellKind; 4] = [
        CellKind::Free,
        CellKind::Obstacle,
        CellKind::Water,
        CellKind::Building,
    ];

    /// The three blocking kinds, in the order random scattering picks
    /// from.
    pub const BLOCKING: [CellKind; 3] = [CellKind::Obstacle, CellKind::Water, CellKind::Building];

    #[inline]
    pub const fn is_passable(self) -> bool {
        matches!(self, CellKind::Free)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Row-major grid of [`CellKind`] values. Out-of-bounds reads return
/// `None`; out-of-bounds writes are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl CellGrid {
    /// A grid filled with free cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Free; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn at(&self, x: i64, y: i64) -> Option<CellKind> {
        self.in_bounds(x, y)
            .then(|| self.cells[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn set(&mut self, x: i64, y: i64, kind: CellKind) {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize] = kind;
        }
    }

    pub fn fill(&mut self, kind: CellKind) {
        self.cells.fill(kind);
    }

    /// Number of cells of `kind`.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_enforced() {
        let mut g = CellGrid::new(4, 3);
        assert_eq!(g.at(3, 2), Some(CellKind::Free));
        assert_eq!(g.at(4, 0), None);
        assert_eq!(g.at(0, -1), None);
        g.set(-1, 0, CellKind::Water);
        g.set(9, 9, CellKind::Water);
        assert_eq!(g.count(CellKind::Water), 0);
    }

    #[test]
    fn set_and_count() {
        let mut g = CellGrid::new(5, 5);
        g.set(1, 2, CellKind::Building);
        g.set(2, 2, CellKind::Building);
        assert_eq!(g.at(1, 2), Some(CellKind::Building));
        assert_eq!(g.count(CellKind::Building), 2);
        assert_eq!(g.count(CellKind::Free), 23);
        g.fill(CellKind::Obstacle);
        assert_eq!(g.count(CellKind::Obstacle), 25);
        assert_eq!(g.cells()[7], CellKind::Obstacle);
    }

    #[test]
    fn only_free_is_passable() {
        let passable: Vec<_> = CellKind::ALL.into_iter().filter(|k| k.is_passable()).collect();
        assert_eq!(passable, [CellKind::Free]);
    }
}
