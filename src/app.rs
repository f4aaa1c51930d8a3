use crate::config::Settings;
use crate::input::{collect_events_nonblocking, Action, InputMapper};
use crate::render::{draw_grid, draw_text, Layout, Terminal};
use crossterm::style::Color;
use log::info;
use sandfall::{Brush, World};
use std::time::{Duration, Instant};

/// Ticks allowed per frame before the backlog is dropped.
const MAX_TICKS_PER_FRAME: u32 = 8;

pub(crate) struct App {
    settings: Settings,
    world: World,
    term: Terminal,
    input: InputMapper,
    layout: Layout,
    fit_to_terminal: bool,
    full_redraw: bool,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let layout = Layout::new(settings.render);
        let fit_to_terminal = settings.resolution == 0;
        let size = if fit_to_terminal {
            layout.fit_resolution(term.cols, term.rows)
        } else {
            settings.resolution
        };

        let brush = Brush::new(settings.brush_radius, settings.brush_shape())
            .with_phase_step(settings.phase_step);
        let mut world = World::new(size, brush, settings.seed);
        if settings.start_paused {
            world.toggle_pause();
        }

        let input = InputMapper::new(term.reports_key_release());
        info!(
            "start: grid {size}x{size}, terminal {}x{}, render {:?}, key release {}",
            term.cols,
            term.rows,
            settings.render,
            term.reports_key_release()
        );

        Ok(Self {
            settings,
            world,
            term,
            input,
            layout,
            fit_to_terminal,
            full_redraw: true,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps as f32);
        let sim_step = Duration::from_millis(self.settings.tick_ms);

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            let frame_start = Instant::now();
            if self.term.resize_if_needed()? {
                self.full_redraw = true;
                info!("terminal resized to {}x{}", self.term.cols, self.term.rows);
                if self.fit_to_terminal {
                    let size = self.layout.fit_resolution(self.term.cols, self.term.rows);
                    self.world.resize(size);
                }
            }

            // input
            for ev in collect_events_nonblocking(frame_dt)? {
                if let Some(action) = self.input.map(ev) {
                    self.apply(action);
                }
                if self.should_quit {
                    break;
                }
            }

            // sim fixed-step
            let now = Instant::now();
            sim_accum = sim_accum.saturating_add(now.saturating_duration_since(last_frame));
            last_frame = now;

            let mut ticks = 0;
            while sim_accum >= sim_step {
                if self.settings.continuous_paint {
                    if let Some((mode, (col, row))) = self.input.held() {
                        self.apply(Action::Stroke { col, row, mode });
                    }
                }
                self.world.tick();
                sim_accum = sim_accum.saturating_sub(sim_step);
                ticks += 1;
                if ticks >= MAX_TICKS_PER_FRAME {
                    sim_accum = Duration::ZERO;
                }
            }

            self.render_frame()?;

            // frame cap
            spin_sleep(frame_dt, frame_start);
        }

        info!(
            "quit after {} ticks, {} particles",
            self.world.ticks(),
            self.world.grid.occupied()
        );
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Stroke { col, row, mode } => {
                if let Some(at) = self.layout.to_grid(col, row) {
                    self.world.paint_at(at, mode);
                }
            }
            Action::Radius(delta) => self.world.brush.adjust_radius(delta),
            Action::Drain(on) => self.world.set_draining(on),
            Action::DrainToggle => self.world.toggle_draining(),
            Action::PauseToggle => self.world.toggle_pause(),
            Action::CycleShape => {
                let shape = self.world.brush.shape.cycle(self.settings.star_points);
                self.world.brush.shape = shape;
            }
            Action::Clear => self.world.clear(),
            Action::Quit => self.should_quit = true,
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear();
        draw_grid(&self.world.grid, &mut self.term.cur, self.layout);

        let size = self.world.grid.size();
        let status = format!(
            " sandfall | tick {} | particles {} | brush {:.0} {} | {}{} | grid {}x{} | LMB paint  RMB erase  wheel/[ ] size  space drain  k pause  s shape  c clear  q quit",
            self.world.ticks(),
            self.world.grid.occupied(),
            self.world.brush.radius(),
            self.world.brush.shape.name(),
            if self.world.paused() { "PAUSED" } else { "running" },
            if self.world.draining() { " DRAINING" } else { "" },
            size,
            size,
        );
        let status = format!("{status:<w$}", w = self.term.cols as usize);
        draw_text(&mut self.term.cur, 0, 0, &status, Color::White, Color::DarkGrey);

        self.term.present(!self.full_redraw)?;
        self.full_redraw = false;
        Ok(())
    }
}

pub(crate) fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    app.run()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
