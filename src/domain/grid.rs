//! The tile grid: layout, hit-testing and scoring.
//!
//! ## Layout
//!
//! The grid is centered inside a container (the play area of the game
//! scene). With `n` tiles of side `s` and margin `m` along an axis the grid
//! spans `n*s + (n-1)*m` pixels, and the offset is
//! `(container - span) / 2`, floor-divided. A grid that outgrows its
//! container gets a negative offset and is clipped when drawn.
//!
//! ## Hit-testing
//!
//! `tile_at` works in container space. Points in the margin between two
//! tiles belong to no tile; they are not snapped to the nearest one.

use std::fmt;

use rand::Rng;

use crate::domain::geometry::{Point, Rect, Size};
use crate::domain::tile::Tile;
use crate::error::{Error, Result};

/// `(row, column)` of a tile.
pub type Cell = (usize, usize);

/// Pixel metrics shared by every tile of a grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileMetrics {
    pub side: i32,
    pub margin: i32,
}

impl TileMetrics {
    fn step(self) -> i32 {
        self.side + self.margin
    }

    /// How many tiles fit side by side in `length` pixels.
    pub fn fit(self, length: i32) -> usize {
        if self.step() <= 0 {
            return 0;
        }
        ((length + self.margin) / self.step()).max(0) as usize
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    columns: usize,
    metrics: TileMetrics,
    offset: Point,
    tiles: Vec<Vec<Tile>>,
    targets: Vec<Cell>,
}

impl Grid {
    /// Build a grid whose `nb_target` targets are drawn uniformly, without
    /// replacement, from every cell. All tiles start revealed.
    pub fn new<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        nb_target: usize,
        container: Size,
        metrics: TileMetrics,
        rng: &mut R,
    ) -> Result<Self> {
        check_dimensions(rows, columns, nb_target)?;
        let targets: Vec<Cell> = rand::seq::index::sample(rng, rows * columns, nb_target)
            .into_iter()
            .map(|i| (i / columns, i % columns))
            .collect();
        Self::build(rows, columns, targets, container, metrics)
    }

    /// Build a grid with an explicit target set.
    #[cfg(test)]
    pub fn with_targets(
        rows: usize,
        columns: usize,
        targets: &[Cell],
        container: Size,
        metrics: TileMetrics,
    ) -> Result<Self> {
        check_dimensions(rows, columns, targets.len())?;
        for (i, &(r, c)) in targets.iter().enumerate() {
            if r >= rows || c >= columns {
                return Err(Error::InvalidConfiguration(format!(
                    "target ({r}, {c}) lies outside a {rows}x{columns} grid"
                )));
            }
            if targets[..i].contains(&(r, c)) {
                return Err(Error::InvalidConfiguration(format!(
                    "target ({r}, {c}) listed twice"
                )));
            }
        }
        Self::build(rows, columns, targets.to_vec(), container, metrics)
    }

    fn build(
        rows: usize,
        columns: usize,
        mut targets: Vec<Cell>,
        container: Size,
        metrics: TileMetrics,
    ) -> Result<Self> {
        if metrics.side <= 0 || metrics.margin < 0 {
            return Err(Error::InvalidConfiguration(format!(
                "tile side {} / margin {} cannot be laid out",
                metrics.side, metrics.margin
            )));
        }
        targets.sort_unstable();

        let mut tiles = vec![vec![Tile::new(false, true); columns]; rows];
        for &(r, c) in &targets {
            tiles[r][c] = Tile::new(true, true);
        }

        let span = span(rows, columns, metrics);
        let offset = Point::new(
            (container.w - span.w).div_euclid(2),
            (container.h - span.h).div_euclid(2),
        );

        Ok(Grid { rows, columns, metrics, offset, tiles, targets })
    }

    // ── Accessors ──

    #[allow(dead_code)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[allow(dead_code)]
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn nb_target(&self) -> usize {
        self.targets.len()
    }

    /// Target cells in row-major order.
    #[allow(dead_code)]
    pub fn targets(&self) -> &[Cell] {
        &self.targets
    }

    pub fn tile(&self, (row, col): Cell) -> Option<Tile> {
        self.tiles.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Top-left corner of the grid in container space.
    #[allow(dead_code)]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Pixel size of the whole grid.
    pub fn span(&self) -> Size {
        span(self.rows, self.columns, self.metrics)
    }

    /// Container-space rectangle covered by one tile.
    pub fn tile_rect(&self, (row, col): Cell) -> Rect {
        let step = self.metrics.step();
        Rect::new(
            self.offset.x + col as i32 * step,
            self.offset.y + row as i32 * step,
            self.metrics.side,
            self.metrics.side,
        )
    }

    /// Every tile with its cell, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(c, &tile)| ((r, c), tile))
        })
    }

    // ── Hit-testing ──

    /// Which tile, if any, lies under a container-space point.
    pub fn tile_at(&self, point: Point) -> Option<Cell> {
        let span = self.span();
        let x = point.x - self.offset.x;
        let y = point.y - self.offset.y;
        if x < 0 || y < 0 || x > span.w || y > span.h {
            return None;
        }

        let step = self.metrics.step();
        // the margin after each tile is dead space
        if x % step >= self.metrics.side || y % step >= self.metrics.side {
            return None;
        }

        let (row, col) = ((y / step) as usize, (x / step) as usize);
        if row >= self.rows || col >= self.columns {
            return None;
        }
        Some((row, col))
    }

    // ── State transitions ──

    #[allow(dead_code)]
    pub fn reveal_all(&mut self) {
        self.tiles.iter_mut().flatten().for_each(|t| {
            t.reveal();
        });
    }

    pub fn hide_all(&mut self) {
        self.tiles.iter_mut().flatten().for_each(Tile::hide);
    }

    /// Reveal the tile under `point`.
    ///
    /// `None` when the point hits no tile; otherwise the outcome of
    /// [`Tile::reveal`].
    pub fn reveal_tile(&mut self, point: Point) -> Option<bool> {
        let (row, col) = self.tile_at(point)?;
        Some(self.tiles[row][col].reveal())
    }

    /// Number of revealed targets: the running score.
    pub fn points(&self) -> usize {
        self.tiles
            .iter()
            .flatten()
            .filter(|t| t.is_revealed() && t.is_target())
            .count()
    }

    pub fn all_found(&self) -> bool {
        self.points() == self.nb_target()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.tiles.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str("|")?;
            for tile in row {
                write!(f, "{tile}|")?;
            }
        }
        Ok(())
    }
}

fn check_dimensions(rows: usize, columns: usize, nb_target: usize) -> Result<()> {
    if rows == 0 || columns == 0 {
        return Err(Error::InvalidConfiguration(format!(
            "a {rows}x{columns} grid has no tiles"
        )));
    }
    if nb_target == 0 || nb_target > rows * columns {
        return Err(Error::InvalidConfiguration(format!(
            "{nb_target} targets do not fit a {rows}x{columns} grid"
        )));
    }
    Ok(())
}

fn span(rows: usize, columns: usize, metrics: TileMetrics) -> Size {
    let along = |n: usize| n as i32 * metrics.side + (n as i32 - 1) * metrics.margin;
    Size::new(along(columns), along(rows))
}
