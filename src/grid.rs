/// Value of a cell that holds no particle. Never a valid paint color.
pub const EMPTY: u32 = 0;

/// What a coordinate holds, with off-grid kept distinct from empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    OffGrid,
    Empty,
    Occupied(u32),
}

impl Probe {
    pub fn is_empty(self) -> bool {
        matches!(self, Probe::Empty)
    }
}

/// Square grid of packed 24-bit colors.
///
/// Storage is column-major (`x * size + y`) because the simulation scans one
/// column at a time. All accessors take signed coordinates and treat anything
/// outside `[0, size)²` as off-grid instead of panicking.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![EMPTY; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size
    }

    pub fn height(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(x as usize * self.size + y as usize)
        } else {
            None
        }
    }

    /// Stored value, or `EMPTY` for off-grid coordinates.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u32 {
        self.idx(x, y).map_or(EMPTY, |i| self.cells[i])
    }

    #[inline]
    pub fn probe(&self, x: i32, y: i32) -> Probe {
        match self.idx(x, y) {
            None => Probe::OffGrid,
            Some(i) if self.cells[i] == EMPTY => Probe::Empty,
            Some(i) => Probe::Occupied(self.cells[i]),
        }
    }

    /// Overwrites the cell; silently ignored when off-grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: u32) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = value & 0xFF_FFFF;
        }
    }

    #[inline]
    pub fn clear_cell(&mut self, x: i32, y: i32) {
        self.set(x, y, EMPTY);
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Re-allocates to `size`, keeping whatever overlaps the old grid.
    pub fn resize(&mut self, size: usize) {
        if size == self.size {
            return;
        }
        let mut next = Grid::new(size);
        let keep = self.size.min(size);
        for x in 0..keep {
            let src = x * self.size;
            let dst = x * size;
            next.cells[dst..dst + keep].copy_from_slice(&self.cells[src..src + keep]);
        }
        *self = next;
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    pub fn occupied_in_row(&self, y: i32) -> usize {
        (0..self.size as i32)
            .filter(|&x| self.get(x, y) != EMPTY)
            .count()
    }

    /// Every cell as `(x, y, value)`, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, u32)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| ((i / size) as i32, (i % size) as i32, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let grid = Grid::new(8);
        assert_eq!(grid.occupied(), 0);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 8);
    }

    #[test]
    fn off_grid_reads_and_writes_are_no_ops() {
        let mut grid = Grid::new(5);
        for (x, y) in [(-1, -1), (5, 0), (0, 5), (i32::MIN, i32::MAX)] {
            grid.set(x, y, 0xABCDEF);
            assert_eq!(grid.get(x, y), EMPTY);
            assert_eq!(grid.probe(x, y), Probe::OffGrid);
        }
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn probe_distinguishes_empty_from_occupied() {
        let mut grid = Grid::new(3);
        assert_eq!(grid.probe(1, 1), Probe::Empty);
        grid.set(1, 1, 0x00FF00);
        assert_eq!(grid.probe(1, 1), Probe::Occupied(0x00FF00));
        grid.clear_cell(1, 1);
        assert!(grid.probe(1, 1).is_empty());
    }

    #[test]
    fn set_masks_to_24_bits() {
        let mut grid = Grid::new(2);
        grid.set(0, 0, 0xFF12_3456);
        assert_eq!(grid.get(0, 0), 0x12_3456);
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut grid = Grid::new(4);
        grid.set(1, 2, 7);
        grid.set(3, 3, 9);
        grid.resize(3);
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.get(1, 2), 7);
        assert_eq!(grid.occupied(), 1);

        grid.resize(6);
        assert_eq!(grid.get(1, 2), 7);
        assert_eq!(grid.probe(5, 5), Probe::Empty);
    }

    #[test]
    fn row_count_and_iter_agree() {
        let mut grid = Grid::new(4);
        grid.set(0, 3, 1);
        grid.set(2, 3, 2);
        grid.set(2, 0, 3);
        assert_eq!(grid.occupied_in_row(3), 2);
        assert_eq!(grid.occupied_in_row(-1), 0);
        let cells: Vec<_> = grid.iter().filter(|c| c.2 != EMPTY).collect();
        assert_eq!(cells, vec![(0, 3, 1), (2, 0, 3), (2, 3, 2)]);
    }
}
