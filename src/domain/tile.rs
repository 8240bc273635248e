//! A single memory tile.
//!
//! The target flag is fixed at creation; only the revealed flag changes.
//! What the tile looks like is derived from the two flags, never stored.

use std::fmt;

/// Which of the three tile images to draw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileLook {
    Hidden,
    Correct,
    Wrong,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tile {
    target: bool,
    revealed: bool,
}

impl Tile {
    pub fn new(target: bool, revealed: bool) -> Self {
        Tile { target, revealed }
    }

    pub fn is_target(self) -> bool {
        self.target
    }

    pub fn is_revealed(self) -> bool {
        self.revealed
    }

    /// Reveal the tile and report whether the click was a good one.
    ///
    /// A tile that is already revealed answers `true`: clicking it again
    /// must never cost the player a try.
    pub fn reveal(&mut self) -> bool {
        if self.revealed {
            return true;
        }
        self.revealed = true;
        self.target
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    /// Cosmetic toggle for idle animations; gameplay never flips.
    #[allow(dead_code)]
    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn look(self) -> TileLook {
        match (self.revealed, self.target) {
            (false, _) => TileLook::Hidden,
            (true, true) => TileLook::Correct,
            (true, false) => TileLook::Wrong,
        }
    }
}

/// `O` revealed target, `X` revealed decoy, blank when hidden.
impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self.look() {
            TileLook::Hidden => ' ',
            TileLook::Correct => 'O',
            TileLook::Wrong => 'X',
        };
        write!(f, "{ch}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_hidden_target_succeeds() {
        let mut t = Tile::new(true, false);
        assert!(t.reveal());
        assert!(t.is_revealed());
    }

    #[test]
    fn reveal_hidden_decoy_fails() {
        let mut t = Tile::new(false, false);
        assert!(!t.reveal());
        assert!(t.is_revealed());
    }

    #[test]
    fn reveal_twice_never_fails() {
        let mut t = Tile::new(false, false);
        t.reveal();
        assert!(t.reveal());
        assert!(t.is_revealed());
    }

    #[test]
    fn hide_is_idempotent() {
        let mut t = Tile::new(true, true);
        t.hide();
        let once = t;
        t.hide();
        assert_eq!(t, once);
        assert!(!t.is_revealed());
    }

    #[test]
    fn flip_toggles() {
        let mut t = Tile::new(true, false);
        t.flip();
        assert!(t.is_revealed());
        t.flip();
        assert!(!t.is_revealed());
        assert!(t.is_target());
    }

    #[test]
    fn look_follows_flags() {
        assert_eq!(Tile::new(true, false).look(), TileLook::Hidden);
        assert_eq!(Tile::new(false, false).look(), TileLook::Hidden);
        assert_eq!(Tile::new(true, true).look(), TileLook::Correct);
        assert_eq!(Tile::new(false, true).look(), TileLook::Wrong);
    }

    #[test]
    fn display_matches_look() {
        assert_eq!(Tile::new(true, true).to_string(), "O");
        assert_eq!(Tile::new(false, true).to_string(), "X");
        assert_eq!(Tile::new(true, false).to_string(), " ");
    }
}
