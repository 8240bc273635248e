pub mod difficulty;
pub mod geometry;
pub mod grid;
pub mod tile;
