use crate::config::RenderMode;
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use sandfall::{color::rgb_channels, Grid, EMPTY};
use std::io::{self, Write};

pub(crate) const HUD_ROWS: u16 = 1;

const EMPTY_BG: Color = Color::Black;
const OFF_GRID_BG: Color = Color::Rgb {
    r: 22,
    g: 22,
    b: 28,
};
const UPPER_HALF: char = '▀';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: EMPTY_BG,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Cell {
        self.cells[self.idx(x, y)]
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

/// How grid cells map onto terminal cells below the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) mode: RenderMode,
    pub(crate) top: u16,
}

impl Layout {
    pub(crate) fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            top: HUD_ROWS,
        }
    }

    /// Grid cells per terminal cell, horizontally and vertically.
    pub(crate) fn scale(&self) -> (i32, i32) {
        match self.mode {
            RenderMode::Blocks => (1, 2),
            RenderMode::Braille => (2, 4),
        }
    }

    /// Grid coordinate under a terminal cell, `None` on the HUD.
    pub(crate) fn to_grid(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        if row < self.top {
            return None;
        }
        let (sx, sy) = self.scale();
        let x = col as i32 * sx + (sx - 1) / 2;
        let y = (row - self.top) as i32 * sy + (sy - 1) / 2;
        Some((x, y))
    }

    /// Largest square grid that fits the terminal.
    pub(crate) fn fit_resolution(&self, cols: u16, rows: u16) -> usize {
        let (sx, sy) = self.scale();
        let w = cols as i32 * sx;
        let h = rows.saturating_sub(self.top) as i32 * sy;
        w.min(h).max(1) as usize
    }
}

fn cell_color(c: u32) -> Color {
    let (r, g, b) = rgb_channels(c);
    Color::Rgb { r, g, b }
}

fn grid_color(grid: &Grid, x: i32, y: i32) -> Color {
    if !grid.in_bounds(x, y) {
        return OFF_GRID_BG;
    }
    match grid.get(x, y) {
        EMPTY => EMPTY_BG,
        c => cell_color(c),
    }
}

/// One terminal cell per grid column and two grid rows: the upper cell is
/// the glyph color, the lower one the background.
pub(crate) fn draw_grid_blocks(grid: &Grid, buf: &mut CellBuffer, top: u16) {
    for row in top..buf.h {
        let y = (row - top) as i32 * 2;
        for col in 0..buf.w {
            let x = col as i32;
            let upper = grid_color(grid, x, y);
            let lower = grid_color(grid, x, y + 1);
            let cell = if upper == lower {
                Cell {
                    ch: ' ',
                    fg: upper,
                    bg: lower,
                }
            } else {
                Cell {
                    ch: UPPER_HALF,
                    fg: upper,
                    bg: lower,
                }
            };
            buf.set(col, row, cell);
        }
    }
}

/* -----------------------------
   Braille encoding: 2×4 cells -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: i32, dy: i32) -> u8 {
    // Dot mapping:
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Each terminal cell covers a 2×4 block; occupied cells become dots and the
/// glyph takes their average color.
pub(crate) fn draw_grid_braille(grid: &Grid, buf: &mut CellBuffer, top: u16) {
    for row in top..buf.h {
        for col in 0..buf.w {
            let x0 = col as i32 * 2;
            let y0 = (row - top) as i32 * 4;

            if !grid.in_bounds(x0, y0) {
                buf.set(
                    col,
                    row,
                    Cell {
                        ch: ' ',
                        fg: Color::White,
                        bg: OFF_GRID_BG,
                    },
                );
                continue;
            }

            let mut mask: u8 = 0;
            let (mut sum_r, mut sum_g, mut sum_b) = (0u32, 0u32, 0u32);
            let mut ink_count: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let c = grid.get(x0 + dx, y0 + dy);
                    if c != EMPTY {
                        mask |= braille_bit(dx, dy);
                        let (r, g, b) = rgb_channels(c);
                        sum_r += r as u32;
                        sum_g += g as u32;
                        sum_b += b as u32;
                        ink_count += 1;
                    }
                }
            }

            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            let fg = if ink_count > 0 {
                Color::Rgb {
                    r: (sum_r / ink_count) as u8,
                    g: (sum_g / ink_count) as u8,
                    b: (sum_b / ink_count) as u8,
                }
            } else {
                Color::White
            };

            buf.set(col, row, Cell { ch, fg, bg: EMPTY_BG });
        }
    }
}

pub(crate) fn draw_grid(grid: &Grid, buf: &mut CellBuffer, layout: Layout) {
    match layout.mode {
        RenderMode::Blocks => draw_grid_blocks(grid, buf, layout.top),
        RenderMode::Braille => draw_grid_braille(grid, buf, layout.top),
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

/// Owns the alternate screen, raw mode and mouse capture; restores the
/// terminal when dropped.
pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    enhanced_keys: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;

        // Key release events need the kitty protocol.
        let enhanced_keys = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if enhanced_keys {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            enhanced_keys,
        })
    }

    pub(crate) fn reports_key_release(&self) -> bool {
        self.enhanced_keys
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Writes `cur` to the screen; with `diff_only` only cells that changed
    /// since the last present.
    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_pos: Option<(u16, u16)> = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                // consecutive cells on a row need no cursor move
                if last_pos != Some((x.wrapping_sub(1), y)) {
                    queue!(self.out, cursor::MoveTo(x, y))?;
                }
                last_pos = Some((x, y));

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.enhanced_keys {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
