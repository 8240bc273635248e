//! The scene contract and the per-frame context handed to scenes.

use crate::domain::geometry::Size;
use crate::error::Result;
use crate::stage::event::{Cue, InputEvent};
use crate::stage::navigator::Navigator;
use crate::ui::canvas::Canvas;

/// One screen of the game. The stage keeps a table of these and drives
/// the one named by its current target once per frame: first
/// `handle_inputs`, then `draw`.
pub trait Scene {
    /// Consume this frame's input batch. Must not block; may request
    /// navigation through `ctx.navigator`.
    fn handle_inputs(&mut self, events: &[InputEvent], ctx: &mut Context) -> Result<()>;

    /// Render the current state onto the shared frame.
    fn draw(&self, frame: &mut Canvas);
}

/// What a scene may reach while handling input: timing, navigation and the
/// sound queue. Built once by the stage and reused every frame.
pub struct Context {
    pub frame_rate: u32,
    pub surface: Size,
    pub navigator: Navigator,
    cues: Vec<Cue>,
}

impl Context {
    pub fn new(frame_rate: u32, surface: Size, navigator: Navigator) -> Self {
        Context {
            frame_rate,
            surface,
            navigator,
            cues: Vec::with_capacity(4),
        }
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}
