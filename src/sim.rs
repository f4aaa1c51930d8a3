use crate::grid::{Grid, Probe, EMPTY};
use rand::Rng;

/// What one pass over the grid did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub fell: usize,
    pub spread: usize,
    pub drained: usize,
}

impl StepStats {
    pub fn moved(&self) -> usize {
        self.fell + self.spread
    }
}

/// Which diagonal a blocked particle slides to, given one uniform draw `r`
/// in `[0, 1)`. `-1` is left, `1` is right.
///
/// Returns `None` without touching the ratio when both sides are closed.
pub fn pick_diagonal(left_open: bool, right_open: bool, r: f64) -> Option<i32> {
    let left = left_open as u8 as f64;
    let right = right_open as u8 as f64;
    let total = left + right;
    if total == 0.0 {
        return None;
    }
    if left_open && r <= left / total {
        Some(-1)
    } else if right_open && r >= 1.0 - right / total {
        Some(1)
    } else {
        None
    }
}

/// Advances the automaton by one tick.
///
/// Columns are scanned right to left and each column bottom to top, so a
/// particle that falls lands on a row that was already visited. Cells that
/// received a particle this tick are skipped for the rest of the scan; that
/// covers slides into the next (not yet scanned) column as well.
///
/// With `draining` set, every bottom-row cell is cleared on a fair coin
/// after the movement rules had their turn at it.
pub fn step<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, draining: bool) -> StepStats {
    let size = grid.size() as i32;
    let floor = size - 1;
    let mut landed = vec![false; grid.size() * grid.size()];
    let at = |x: i32, y: i32| (x * size + y) as usize;
    let mut stats = StepStats::default();

    for i in (0..size).rev() {
        for j in (0..size).rev() {
            if let Probe::Occupied(color) = grid.probe(i, j) {
                if !landed[at(i, j)] {
                    if grid.probe(i, j + 1).is_empty() {
                        grid.set(i, j + 1, color);
                        grid.clear_cell(i, j);
                        landed[at(i, j + 1)] = true;
                        stats.fell += 1;
                    } else {
                        let left_open = grid.probe(i - 1, j + 1).is_empty();
                        let right_open = grid.probe(i + 1, j + 1).is_empty();
                        if left_open || right_open {
                            let r: f64 = rng.gen();
                            if let Some(dx) = pick_diagonal(left_open, right_open, r) {
                                grid.set(i + dx, j + 1, color);
                                grid.clear_cell(i, j);
                                landed[at(i + dx, j + 1)] = true;
                                stats.spread += 1;
                            }
                        }
                    }
                }
            }

            if draining && j == floor && rng.gen_bool(0.5) {
                if grid.get(i, j) != EMPTY {
                    stats.drained += 1;
                }
                grid.clear_cell(i, j);
            }
        }
    }

    stats
}
