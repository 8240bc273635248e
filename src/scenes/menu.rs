//! Menus: a static background plus a column of clickable buttons.
//!
//! Button faces are composited once into a widget layer when the button is
//! added; drawing a menu is then two blits, background first.

use crossterm::style::Color;

use crate::domain::geometry::{Point, Rect, Size};
use crate::error::Result;
use crate::stage::event::{Cue, InputEvent};
use crate::stage::scene::{Context, Scene};
use crate::ui::canvas::{text_width, Canvas};

/// What a button does when pressed.
pub type Action = Box<dyn FnMut() -> Result<()>>;

/// Look of a text button. `size: None` sizes the block to fit the label.
#[derive(Clone, Copy, Debug)]
pub struct ButtonStyle {
    pub size: Option<Size>,
    pub bg: Color,
    pub fg: Color,
}

pub struct Button {
    image: Canvas,
    rect: Rect,
    action: Action,
}

impl Button {
    pub fn new(image: Canvas, action: Action) -> Self {
        let rect = Rect::at(Point::new(0, 0), image.size());
        Button { image, rect, action }
    }

    /// A colored block with `label` centered on it.
    pub fn from_text(label: &str, style: ButtonStyle, action: Action) -> Self {
        let size = style
            .size
            .unwrap_or_else(|| Size::new(text_width(label) + 2, 3));
        let mut image = Canvas::filled(size, style.bg);
        let pos = Point::new((size.w - text_width(label)) / 2, (size.h - 1) / 2);
        image.put_text(pos, label, style.fg, style.bg);
        Button::new(image, action)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn press(&mut self) -> Result<()> {
        (self.action)()
    }
}

pub struct Menu {
    background: Canvas,
    widgets: Canvas,
    buttons: Vec<Button>,
}

impl Menu {
    pub fn new(background: Canvas) -> Self {
        let widgets = Canvas::new(background.size());
        Menu {
            background,
            widgets,
            buttons: Vec::new(),
        }
    }

    /// Place `button` with its top-left corner at `pos`.
    pub fn add_button_at(&mut self, mut button: Button, pos: Point) {
        button.rect = Rect::at(pos, button.image.size());
        self.widgets.blit(&button.image, pos);
        self.buttons.push(button);
    }

    /// Static layer under the buttons, for pages that add their own text.
    pub fn background_mut(&mut self) -> &mut Canvas {
        &mut self.background
    }

    #[allow(dead_code)]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

impl Scene for Menu {
    fn handle_inputs(&mut self, events: &[InputEvent], ctx: &mut Context) -> Result<()> {
        let switches = ctx.navigator.switches();
        for event in events {
            // the rest of the batch belongs to a menu that is no longer shown
            if ctx.navigator.switches() != switches || !ctx.navigator.is_active() {
                break;
            }
            let InputEvent::PointerPress(pos) = *event else {
                continue;
            };
            if let Some(button) = self.buttons.iter_mut().find(|b| b.rect.contains(pos)) {
                ctx.cue(Cue::Navigate);
                button.press()?;
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Canvas) {
        frame.blit(&self.background, Point::new(0, 0));
        frame.blit(&self.widgets, Point::new(0, 0));
    }
}
