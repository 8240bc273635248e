//! Off-screen drawing surface in logical pixels.
//!
//! Scenes never talk to the terminal. They draw into a `Canvas` with three
//! primitives (`fill_rect`, `blit`, `put_text`) and the renderer presents
//! the finished canvas. The same type doubles as an "image": menu
//! backgrounds, button faces and tile art are small canvases blitted onto
//! the frame.
//!
//! Each pixel carries two glyphs because it covers two terminal columns.
//! A pixel may be transparent (`None`), which `blit` skips.

use crossterm::style::Color;

use crate::domain::geometry::{Point, Rect, Size};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pixel {
    pub glyphs: [char; 2],
    pub fg: Color,
    pub bg: Color,
}

impl Pixel {
    pub const fn solid(bg: Color) -> Self {
        Pixel { glyphs: [' ', ' '], fg: Color::White, bg }
    }

    pub const fn glyph(ch: char, fg: Color, bg: Color) -> Self {
        Pixel { glyphs: [ch, ch], fg, bg }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    size: Size,
    pixels: Vec<Option<Pixel>>,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(size: Size) -> Self {
        Canvas {
            size,
            pixels: vec![None; size.area()],
        }
    }

    pub fn filled(size: Size, color: Color) -> Self {
        let mut canvas = Canvas::new(size);
        canvas.clear(color);
        canvas
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn get(&self, p: Point) -> Option<Pixel> {
        self.index(p).and_then(|i| self.pixels[i])
    }

    pub fn set(&mut self, p: Point, pixel: Pixel) {
        if let Some(i) = self.index(p) {
            self.pixels[i] = Some(pixel);
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(Some(Pixel::solid(color)));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.paint_rect(rect, Pixel::solid(color));
    }

    /// Fill a rectangle with one repeated pixel; clipped to the canvas.
    pub fn paint_rect(&mut self, rect: Rect, pixel: Pixel) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.w).min(self.size.w);
        let y1 = (rect.y + rect.h).min(self.size.h);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(Point::new(x, y), pixel);
            }
        }
    }

    /// Copy `image` with its top-left corner at `pos`, skipping
    /// transparent pixels and anything that falls off this canvas.
    pub fn blit(&mut self, image: &Canvas, pos: Point) {
        for y in 0..image.size.h {
            for x in 0..image.size.w {
                if let Some(px) = image.get(Point::new(x, y)) {
                    self.set(pos.offset(x, y), px);
                }
            }
        }
    }

    /// Write text two characters per pixel, keeping whatever background is
    /// already there (or `bg` over transparent pixels).
    pub fn put_text(&mut self, pos: Point, text: &str, fg: Color, bg: Color) {
        let chars: Vec<char> = text.chars().collect();
        for (i, pair) in chars.chunks(2).enumerate() {
            let p = pos.offset(i as i32, 0);
            let under = self.get(p).map_or(bg, |px| px.bg);
            let right = pair.get(1).copied().unwrap_or(' ');
            self.set(p, Pixel { glyphs: [pair[0], right], fg, bg: under });
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.size.w || p.y >= self.size.h {
            return None;
        }
        Some((p.y * self.size.w + p.x) as usize)
    }
}

/// Width in pixels of `text` once packed two characters per pixel.
pub fn text_width(text: &str) -> i32 {
    (text.chars().count() as i32 + 1) / 2
}
