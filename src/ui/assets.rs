//! Tile art: the three tile images and their integrity check.
//!
//! The grid only needs the side length of a tile, which it reads from the
//! art. That only works if all three images are square and the same size,
//! so this is checked once at startup instead of every frame.

use crossterm::style::Color;

use crate::config::SpriteConfig;
use crate::domain::geometry::{Point, Rect, Size};
use crate::domain::tile::TileLook;
use crate::error::{Error, Result};
use crate::ui::canvas::{Canvas, Pixel};

#[derive(Clone, Debug)]
pub struct TileArt {
    hidden: Canvas,
    correct: Canvas,
    wrong: Canvas,
}

impl TileArt {
    pub fn new(hidden: Canvas, correct: Canvas, wrong: Canvas) -> Result<Self> {
        for (name, image) in [("hidden", &hidden), ("correct", &correct), ("wrong", &wrong)] {
            let size = image.size();
            if size.w <= 0 || !size.is_square() {
                return Err(Error::InvalidAsset(format!(
                    "{name} tile is {}x{}, expected a non-empty square",
                    size.w, size.h
                )));
            }
        }
        if hidden.size() != correct.size() || hidden.size() != wrong.size() {
            return Err(Error::InvalidAsset(format!(
                "tile sizes differ: hidden {:?}, correct {:?}, wrong {:?}",
                hidden.size(),
                correct.size(),
                wrong.size()
            )));
        }
        Ok(TileArt { hidden, correct, wrong })
    }

    /// Build the art from the `[tiles.*]` config sections.
    pub fn from_config(hidden: &SpriteConfig, correct: &SpriteConfig, wrong: &SpriteConfig) -> Result<Self> {
        TileArt::new(sprite(hidden), sprite(correct), sprite(wrong))
    }

    pub fn side(&self) -> i32 {
        self.hidden.size().w
    }

    pub fn image(&self, look: TileLook) -> &Canvas {
        match look {
            TileLook::Hidden => &self.hidden,
            TileLook::Correct => &self.correct,
            TileLook::Wrong => &self.wrong,
        }
    }
}

/// A tile face: glyph-filled block with a one-pixel darker rim when the
/// sprite is big enough to show one.
fn sprite(cfg: &SpriteConfig) -> Canvas {
    let size = Size::new(cfg.size.0, cfg.size.1);
    let mut image = Canvas::new(size);
    image.paint_rect(Rect::at(Point::new(0, 0), size), Pixel::glyph(cfg.glyph, cfg.fg, cfg.bg));
    if size.w >= 3 && size.h >= 3 {
        let inner = Rect::new(1, 1, size.w - 2, size.h - 2);
        image.paint_rect(inner, Pixel::glyph(cfg.glyph, cfg.fg, lighten(cfg.bg)));
    }
    image
}

fn lighten(color: Color) -> Color {
    match color {
        Color::Rgb { r, g, b } => Color::Rgb {
            r: r.saturating_add(24),
            g: g.saturating_add(24),
            b: b.saturating_add(24),
        },
        other => other,
    }
}
