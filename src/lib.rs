//! Falling-sand automaton core: a square grid of packed colors, the brush
//! that stamps particles onto it, and the per-tick update rule.
//!
//! The terminal front end lives in the `sandfall` binary; nothing here
//! touches the terminal.

pub mod brush;
pub mod color;
pub mod grid;
pub mod sim;
pub mod world;

pub use brush::{Brush, BrushMode, Shape};
pub use grid::{Grid, Probe, EMPTY};
pub use sim::{step, StepStats};
pub use world::World;
