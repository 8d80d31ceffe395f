/// Terminal presenter: shows a framebuffer with truecolor half blocks
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use flat3d_core::geometry::unpack_rgb;
use flat3d_core::{FrameBuffer, Presenter};
use std::io::{self, Write};
use std::time::Instant;

/// Upper half block; foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

const HUD: &str = "Flat3D | WASD=Move Q/E=Down/Up Arrows=Look Esc=Quit";

/// One terminal cell: the two framebuffer pixels it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub top: u32,
    pub bottom: u32,
}

/// Nearest-neighbour sample of `frame` onto a `cols` × `rows` cell grid.
///
/// Every cell covers two vertically stacked samples, so the grid resolves
/// `cols` × `2 * rows` pixels.
pub fn downsample(frame: &FrameBuffer, cols: usize, rows: usize) -> Vec<Cell> {
    let (width, height) = (frame.width(), frame.height());
    let sample = |col: usize, sub_row: usize| {
        let x = (col * width / cols).min(width - 1);
        let y = (sub_row * height / (rows * 2)).min(height - 1);
        frame.pixel(x, y)
    };

    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(Cell {
                top: sample(col, row * 2),
                bottom: sample(col, row * 2 + 1),
            });
        }
    }
    cells
}

fn rgb(color: u32) -> Color {
    let (r, g, b) = unpack_rgb(color);
    Color::Rgb { r, g, b }
}

/// Writes frames to a terminal, with an FPS line on top
pub struct TerminalPresenter<W: Write> {
    out: W,
    fixed_size: Option<(u16, u16)>,
    frame_count: u32,
    last_sample: Instant,
    fps: f32,
}

impl<W: Write> TerminalPresenter<W> {
    /// Follows the terminal size, re-reading it every frame.
    pub fn new(out: W) -> Self {
        Self {
            out,
            fixed_size: None,
            frame_count: 0,
            last_sample: Instant::now(),
            fps: 0.0,
        }
    }

    /// Always draws onto a `cols` × `rows` grid.
    pub fn with_size(out: W, cols: u16, rows: u16) -> Self {
        Self {
            fixed_size: Some((cols, rows)),
            ..Self::new(out)
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let elapsed = self.last_sample.elapsed();
        if elapsed.as_secs() >= 1 {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_sample = Instant::now();
        }
    }

    fn draw(&mut self, cells: &[Cell], cols: usize) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(0, 0))?;

        let mut current: Option<Cell> = None;
        for (row, line) in cells.chunks(cols).enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for &cell in line {
                if current.map(|c| c.top) != Some(cell.top) {
                    self.out.queue(SetForegroundColor(rgb(cell.top)))?;
                }
                if current.map(|c| c.bottom) != Some(cell.bottom) {
                    self.out.queue(SetBackgroundColor(rgb(cell.bottom)))?;
                }
                current = Some(cell);
                self.out.queue(Print(HALF_BLOCK))?;
            }
        }

        self.out
            .queue(cursor::MoveTo(0, 0))?
            .queue(ResetColor)?
            .queue(SetForegroundColor(Color::Yellow))?
            .queue(Print(format!("{HUD} | FPS: {:.1}", self.fps)))?
            .queue(ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    type Error = io::Error;

    fn present(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        let (cols, rows) = match self.fixed_size {
            Some(size) => size,
            None => terminal::size()?,
        };
        let (cols, rows) = (cols as usize, rows as usize);
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        self.update_fps();
        let cells = downsample(frame, cols, rows);
        self.draw(&cells, cols)
    }
}
