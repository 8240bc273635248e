/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Expand the scene's `Canvas` into `front` (one Cell per terminal
///      column, two columns per logical pixel)
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The canvas is anchored at the top-left corner so that pointer
/// coordinates map back to pixels by halving the column.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::geometry::Point;
use crate::ui::canvas::Canvas;

/// Terminal columns per logical pixel.
pub const CELL_W: usize = 2;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell the canvas does not cover
    /// (and for transparent pixels). Using the same RGB for `Clear` and the
    /// cells keeps VTE terminals from showing lines between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by a real frame; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        // control characters would move the cursor
        let ch = if ch.is_control() { ' ' } else { ch };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Overwrite the whole buffer with `canvas`; whatever the canvas does
    /// not reach stays blank.
    fn compose(&mut self, canvas: &Canvas) {
        self.cells.fill(Cell::BLANK);
        let size = canvas.size();
        for py in 0..size.h.max(0) as usize {
            for px in 0..size.w.max(0) as usize {
                let Some(pixel) = canvas.get(Point::new(px as i32, py as i32)) else {
                    continue;
                };
                for (k, &ch) in pixel.glyphs.iter().enumerate() {
                    self.set(px * CELL_W + k, py, Cell::new(ch, pixel.fg, pixel.bg));
                }
            }
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.invalidate();

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.compose(canvas);
        flush_diff(&mut self.writer, &self.front, &self.back)?;
        self.writer.flush()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}

// ── Diff flush: only write changed cells ──

fn flush_diff<W: Write>(out: &mut W, front: &FrameBuffer, back: &FrameBuffer) -> io::Result<()> {
    let mut last_fg = Color::White;
    let mut last_bg = Cell::BASE_BG;
    // where the terminal cursor sits, when known
    let mut cursor_at: Option<(usize, usize)> = None;

    // Explicit base colors; ResetColor would fall back to the terminal's
    // own default, which may not match BASE_BG.
    queue!(out, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

    for y in 0..front.height {
        for x in 0..front.width {
            let cell = front.get(x, y);
            if cell == back.get(x, y) {
                continue;
            }
            if cursor_at != Some((x, y)) {
                queue!(out, MoveTo(x as u16, y as u16))?;
            }
            if cell.fg != last_fg {
                queue!(out, SetForegroundColor(cell.fg))?;
                last_fg = cell.fg;
            }
            if cell.bg != last_bg {
                queue!(out, SetBackgroundColor(cell.bg))?;
                last_bg = cell.bg;
            }
            queue!(out, Print(cell.ch))?;
            cursor_at = Some((x + 1, y));
        }
    }
    Ok(())
}
