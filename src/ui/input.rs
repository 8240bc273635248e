/// Terminal input source.
///
/// Drains everything crossterm has queued since the last frame and turns it
/// into the stage's `InputEvent`s. Mouse columns are halved so that pointer
/// positions land in logical pixels, matching the renderer's two columns per
/// pixel.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use log::warn;

use crate::domain::geometry::Point;
use crate::stage::event::InputEvent;
use crate::ui::renderer::CELL_W;

pub struct InputState {
    events: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking, in arrival order.
    ///
    /// A read failure after a successful poll means the terminal went away;
    /// it is reported as a close request rather than an error.
    pub fn drain_events(&mut self) -> io::Result<Vec<InputEvent>> {
        self.events.clear();
        while poll(Duration::ZERO)? {
            match event::read() {
                Ok(ev) => self.events.extend(translate(ev)),
                Err(e) => {
                    warn!("terminal read failed, closing: {e}");
                    self.events.push(InputEvent::Close);
                    break;
                }
            }
        }
        Ok(std::mem::take(&mut self.events))
    }
}

/// Map one terminal event onto the stage's vocabulary. Anything the game
/// has no use for (releases, drags, focus changes, pastes) maps to `None`.
pub fn translate(ev: Event) -> Option<InputEvent> {
    match ev {
        Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
            let x = column as usize / CELL_W;
            Some(InputEvent::PointerPress(Point::new(x as i32, row as i32)))
        }
        Event::Key(key) => translate_key(key),
        Event::Resize(..) => Some(InputEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => Some(InputEvent::Close),
        code => Some(InputEvent::Key(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent { code, modifiers, kind, state: KeyEventState::NONE })
    }

    #[test]
    fn left_click_halves_the_column() {
        let ev = mouse(MouseEventKind::Down(MouseButton::Left), 7, 3);
        assert_eq!(translate(ev), Some(InputEvent::PointerPress(Point::new(3, 3))));
        let ev = mouse(MouseEventKind::Down(MouseButton::Left), 8, 0);
        assert_eq!(translate(ev), Some(InputEvent::PointerPress(Point::new(4, 0))));
    }

    #[test]
    fn other_mouse_activity_is_dropped() {
        assert_eq!(translate(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)), None);
        assert_eq!(translate(mouse(MouseEventKind::Up(MouseButton::Left), 1, 1)), None);
        assert_eq!(translate(mouse(MouseEventKind::Moved, 1, 1)), None);
    }

    #[test]
    fn ctrl_c_is_a_close_request() {
        let ev = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(translate(ev), Some(InputEvent::Close));
        let ev = key(KeyCode::Char('c'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translate(ev), Some(InputEvent::Key(KeyCode::Char('c'))));
    }

    #[test]
    fn key_releases_are_dropped() {
        let ev = key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate(ev), None);
        let ev = key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(translate(ev), Some(InputEvent::Key(KeyCode::Esc)));
    }

    #[test]
    fn resize_is_forwarded() {
        assert_eq!(translate(Event::Resize(100, 40)), Some(InputEvent::Resize));
        assert_eq!(translate(Event::FocusLost), None);
    }
}
