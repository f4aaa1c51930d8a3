use crate::brush::{Brush, BrushMode};
use crate::grid::Grid;
use crate::sim::{self, StepStats};
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

/// Everything a session mutates: the grid, the brush, and the run flags.
pub struct World {
    pub grid: Grid,
    pub brush: Brush,
    rng: StdRng,
    paused: bool,
    draining: bool,
    ticks: u64,
}

impl World {
    /// `seed == 0` seeds from the OS.
    pub fn new(size: usize, brush: Brush, seed: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Self {
            grid: Grid::new(size),
            brush,
            rng,
            paused: false,
            draining: false,
            ticks: 0,
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn draining(&self) -> bool {
        self.draining
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One simulation step, unless paused.
    pub fn tick(&mut self) -> Option<StepStats> {
        if self.paused {
            return None;
        }
        let stats = sim::step(&mut self.grid, &mut self.rng, self.draining);
        self.ticks += 1;
        trace!(
            "tick {}: fell={} spread={} drained={}",
            self.ticks,
            stats.fell,
            stats.spread,
            stats.drained
        );
        Some(stats)
    }

    pub fn paint_at(&mut self, coord: (i32, i32), mode: BrushMode) -> usize {
        self.brush.apply(&mut self.grid, coord, mode)
    }

    pub fn resize(&mut self, size: usize) {
        if size != self.grid.size() {
            debug!("grid resize {} -> {}", self.grid.size(), size);
            self.grid.resize(size);
        }
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("paused={}", self.paused);
    }

    pub fn set_draining(&mut self, on: bool) {
        if self.draining != on {
            self.draining = on;
            debug!("draining={}", on);
        }
    }

    pub fn toggle_draining(&mut self) {
        self.set_draining(!self.draining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Shape;

    fn world() -> World {
        World::new(10, Brush::new(0.5, Shape::Disc), 42)
    }

    #[test]
    fn paused_world_does_not_step() {
        let mut w = world();
        w.grid.set(3, 3, 0xABCDEF);
        w.toggle_pause();
        assert!(w.tick().is_none());
        assert_eq!(w.grid.get(3, 3), 0xABCDEF);
        assert_eq!(w.ticks(), 0);

        w.toggle_pause();
        assert_eq!(w.tick().map(|s| s.fell), Some(1));
        assert_eq!(w.grid.get(3, 4), 0xABCDEF);
        assert_eq!(w.ticks(), 1);
    }

    #[test]
    fn paint_then_fall() {
        let mut w = world();
        assert_eq!(w.paint_at((5, 5), BrushMode::Paint), 1);
        let color = w.grid.get(5, 5);
        assert_ne!(color, 0);
        w.tick();
        assert_eq!(w.grid.get(5, 5), 0);
        assert_eq!(w.grid.get(5, 6), color);

        assert_eq!(w.paint_at((5, 6), BrushMode::Erase), 1);
        assert_eq!(w.grid.occupied(), 0);
    }

    #[test]
    fn draining_flag_empties_the_floor() {
        let mut w = world();
        for x in 0..10 {
            w.grid.set(x, 9, 1);
        }
        w.toggle_draining();
        assert!(w.draining());
        for _ in 0..100 {
            w.tick();
        }
        assert_eq!(w.grid.occupied(), 0);

        w.set_draining(false);
        w.grid.set(0, 9, 1);
        w.tick();
        assert_eq!(w.grid.occupied(), 1);
    }

    #[test]
    fn resize_and_clear() {
        let mut w = world();
        w.grid.set(1, 1, 5);
        w.resize(20);
        assert_eq!(w.grid.size(), 20);
        assert_eq!(w.grid.get(1, 1), 5);
        w.clear();
        assert_eq!(w.grid.occupied(), 0);
    }
}
