//! Shared colors for menus and the game screen.

use crossterm::style::Color;

pub const BACKGROUND: Color = Color::Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };
pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
pub const YELLOW: Color = Color::Rgb { r: 255, g: 220, b: 58 };
pub const BLUE_1: Color = Color::Rgb { r: 67, g: 137, b: 215 };
pub const BLUE_2: Color = Color::Rgb { r: 56, g: 116, b: 181 };
