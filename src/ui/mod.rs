pub mod assets;
pub mod canvas;
pub mod input;
pub mod renderer;
pub mod sound;

use std::io;

use crate::stage::event::InputEvent;
use crate::stage::Platform;
use canvas::Canvas;
use input::InputState;
use renderer::Renderer;

/// The real terminal: crossterm input plus the diff renderer.
pub struct Terminal {
    input: InputState,
    renderer: Renderer,
}

impl Terminal {
    /// Switch the terminal into raw alternate-screen mode with mouse capture.
    pub fn init() -> io::Result<Self> {
        let mut renderer = Renderer::new();
        if let Err(e) = renderer.init() {
            // raw mode may already be on
            let _ = renderer.cleanup();
            return Err(e);
        }
        Ok(Terminal { input: InputState::new(), renderer })
    }
}

impl Platform for Terminal {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        self.input.drain_events()
    }

    fn present(&mut self, frame: &Canvas) -> io::Result<()> {
        self.renderer.present(frame)
    }

    fn teardown(&mut self) -> io::Result<()> {
        self.renderer.cleanup()
    }
}
