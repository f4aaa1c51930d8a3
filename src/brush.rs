use crate::color::hsl_to_rgb;
use crate::grid::{Grid, Probe, EMPTY};
use std::f64::consts::TAU;

pub const MIN_RADIUS: f32 = 0.5;
pub const MAX_RADIUS: f32 = 64.0;

pub const DEFAULT_PHASE: f64 = 0.1;
pub const DEFAULT_PHASE_STEP: f64 = 1.0 / 30_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Disc,
    Star { points: u32 },
}

impl Shape {
    pub fn star() -> Self {
        Shape::Star { points: 5 }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Disc => "disc",
            Shape::Star { .. } => "star",
        }
    }

    /// Disc -> star -> disc.
    pub fn cycle(self, star_points: u32) -> Self {
        match self {
            Shape::Disc => Shape::Star {
                points: star_points.max(1),
            },
            Shape::Star { .. } => Shape::Disc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    Paint,
    Erase,
}

/// The stamping tool: a shape scaled by `radius`, plus the hue phase that
/// colors painted cells and spins the star.
#[derive(Clone, Debug)]
pub struct Brush {
    radius: f32,
    pub shape: Shape,
    phase: f64,
    phase_step: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(10.0, Shape::Disc)
    }
}

impl Brush {
    pub fn new(radius: f32, shape: Shape) -> Self {
        Self {
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            shape,
            phase: DEFAULT_PHASE,
            phase_step: DEFAULT_PHASE_STEP,
        }
    }

    pub fn with_phase_step(mut self, step: f64) -> Self {
        self.phase_step = step.abs().rem_euclid(1.0);
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase.rem_euclid(1.0);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn adjust_radius(&mut self, delta: f32) {
        self.radius = (self.radius + delta).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub fn advance_phase(&mut self) {
        self.phase = (self.phase + self.phase_step).rem_euclid(1.0);
    }

    /// Color for the next painted cell. Never `EMPTY`.
    pub fn color(&self) -> u32 {
        match hsl_to_rgb(self.phase, 1.0, 0.5) {
            EMPTY => 0x00_0001,
            c => c,
        }
    }

    pub fn contains(&self, dx: i32, dy: i32) -> bool {
        let (x, y) = (dx as f64, dy as f64);
        let radius = self.radius as f64;
        match self.shape {
            Shape::Disc => x * x + y * y <= radius * radius,
            Shape::Star { points } => {
                let n = points.max(1) as f64;
                let r = (x * x + y * y).sqrt();
                let theta = y.atan2(x);
                let spin = self.phase * TAU;
                r <= radius * ((n * (theta + spin)).sin() + n) / n
            }
        }
    }

    /// Offsets inside the brush, row by row across the bounding box.
    pub fn offsets(&self) -> Vec<(i32, i32)> {
        let r = self.radius.floor() as i32;
        let mut out = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for dy in -r..=r {
            for dx in -r..=r {
                if self.contains(dx, dy) {
                    out.push((dx, dy));
                }
            }
        }
        out
    }

    /// Stamps the brush at `center`. Paint fills only empty on-grid cells
    /// and advances the phase once per filled cell; erase clears every
    /// covered cell. Returns how many cells changed.
    pub fn apply(&mut self, grid: &mut Grid, center: (i32, i32), mode: BrushMode) -> usize {
        let (cx, cy) = center;
        let mut changed = 0;
        for (dx, dy) in self.offsets() {
            let (x, y) = (cx + dx, cy + dy);
            match (mode, grid.probe(x, y)) {
                (BrushMode::Paint, Probe::Empty) => {
                    grid.set(x, y, self.color());
                    self.advance_phase();
                    changed += 1;
                }
                (BrushMode::Erase, Probe::Occupied(_)) => {
                    grid.clear_cell(x, y);
                    changed += 1;
                }
                _ => {}
            }
        }
        changed
    }
}
