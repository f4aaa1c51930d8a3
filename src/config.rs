use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use log::{info, warn};
use sandfall::brush::{Shape, DEFAULT_PHASE_STEP};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ShapeKind {
    Disc,
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RenderMode {
    /// Two grid rows per terminal row, full color per cell
    Blocks,
    /// 2x4 grid cells per terminal cell, averaged color
    Braille,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Grid cells per side. 0 fits the grid to the terminal.
    pub(crate) resolution: usize,
    pub(crate) tick_ms: u64,
    pub(crate) fps: u32,
    pub(crate) brush_radius: f32,
    pub(crate) shape: ShapeKind,
    pub(crate) star_points: u32,
    pub(crate) phase_step: f64,
    pub(crate) render: RenderMode,
    pub(crate) continuous_paint: bool,
    pub(crate) start_paused: bool,
    pub(crate) seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: 100,
            tick_ms: 20,
            fps: 60,
            brush_radius: 10.0,
            shape: ShapeKind::Disc,
            star_points: 5,
            phase_step: DEFAULT_PHASE_STEP,
            render: RenderMode::Blocks,
            continuous_paint: false,
            start_paused: false,
            seed: 0,
        }
    }
}

impl Settings {
    pub(crate) fn brush_shape(&self) -> Shape {
        match self.shape {
            ShapeKind::Disc => Shape::Disc,
            ShapeKind::Star => Shape::Star {
                points: self.star_points,
            },
        }
    }

    fn apply(&mut self, args: &Args) {
        if let Some(v) = args.resolution {
            self.resolution = v;
        }
        if let Some(v) = args.tick_ms {
            self.tick_ms = v;
        }
        if let Some(v) = args.fps {
            self.fps = v;
        }
        if let Some(v) = args.brush_radius {
            self.brush_radius = v;
        }
        if let Some(v) = args.shape {
            self.shape = v;
        }
        if let Some(v) = args.star_points {
            self.star_points = v;
        }
        if let Some(v) = args.render {
            self.render = v;
        }
        if let Some(v) = args.seed {
            self.seed = v;
        }
        self.continuous_paint |= args.continuous_paint;
        self.start_paused |= args.paused;
    }

    fn sanitize(&mut self) {
        self.tick_ms = self.tick_ms.clamp(1, 1000);
        self.fps = self.fps.clamp(10, 240);
        self.star_points = self.star_points.clamp(1, 32);
        if !self.phase_step.is_finite() || self.phase_step <= 0.0 {
            self.phase_step = DEFAULT_PHASE_STEP;
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sandfall")]
#[command(about = "Falling sand you paint with the mouse", long_about = None)]
pub(crate) struct Args {
    /// Settings file (JSON). Defaults to settings.json in the config dir.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Append logs to this file (RUST_LOG picks the level)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// Grid cells per side; 0 fits the terminal
    #[arg(long)]
    pub(crate) resolution: Option<usize>,

    /// Milliseconds per simulation tick
    #[arg(long)]
    pub(crate) tick_ms: Option<u64>,

    /// Render rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    #[arg(long)]
    pub(crate) brush_radius: Option<f32>,

    #[arg(long, value_enum)]
    pub(crate) shape: Option<ShapeKind>,

    #[arg(long)]
    pub(crate) star_points: Option<u32>,

    #[arg(long, value_enum)]
    pub(crate) render: Option<RenderMode>,

    /// Keep painting while a button is held, even without pointer motion
    #[arg(long, default_value_t = false)]
    pub(crate) continuous_paint: bool,

    /// Start in paused state
    #[arg(long, default_value_t = false)]
    pub(crate) paused: bool,

    /// RNG seed; 0 seeds from the OS
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "sandfall", "sandfall").map(|p| p.config_dir().join("settings.json"))
}

pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("could not read settings from {}", path.display()))?;
    serde_json::from_str(&s)
        .with_context(|| format!("could not parse settings in {}", path.display()))
}

/// File settings (explicit path, else the default location), then command
/// line overrides.
pub(crate) fn resolve(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            info!("settings from {}", path.display());
            load_settings(path)?
        }
        None => match default_settings_path() {
            Some(path) if path.exists() => match load_settings(&path) {
                Ok(s) => {
                    info!("settings from {}", path.display());
                    s
                }
                Err(e) => {
                    warn!("{e:#}; using defaults");
                    Settings::default()
                }
            },
            _ => Settings::default(),
        },
    };
    settings.apply(args);
    settings.sanitize();
    Ok(settings)
}
