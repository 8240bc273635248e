//! Events flowing into and out of scenes.
//!
//! `InputEvent` is what the platform hands the stage each frame.
//! `Cue` is what scenes hand back: fire-and-forget sound requests that the
//! stage plays after the scene has finished its update.

use crossterm::event::KeyCode;

use crate::domain::geometry::Point;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    /// Primary button pressed, in surface coordinates.
    PointerPress(Point),
    Key(KeyCode),
    /// Output surface changed size; forwarded as-is.
    Resize,
    /// Close request (Ctrl+C or hang-up). Handled by the stage, never
    /// forwarded to scenes.
    Close,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Navigate,
    Correct,
    Wrong,
    RoundWon,
    RoundLost,
}
