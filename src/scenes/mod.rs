//! The concrete screens of Memoz and how they are wired together.
//!
//! ```text
//!   main menu ──Play──────► game ──out of lives──► main menu
//!       │ ├──Difficulty──► difficulty ──Easy/Medium/Hard/Back──► main menu
//!       │ └──Credits─────► credits ──Back──► main menu
//!       └──Quit──► (stage stops)
//! ```

pub mod game;
pub mod menu;
pub mod palette;

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::config::{GameConfig, RoundSettings};
use crate::domain::difficulty::Difficulty;
use crate::domain::geometry::{Point, Rect, Size};
use crate::stage::navigator::{Navigator, MAIN, QUIT};
use crate::stage::{Platform, Stage};
use crate::ui::assets::TileArt;
use crate::ui::canvas::Canvas;
use game::GameScene;
use menu::{Action, Button, ButtonStyle, Menu};

pub const CREDITS: &str = "credits";
pub const DIFFICULTY: &str = "difficulty";

const BUTTON: ButtonStyle = ButtonStyle {
    size: Some(Size::new(10, 3)),
    bg: palette::BLUE_1,
    fg: palette::BLACK,
};

/// Register every scene on `stage`. The difficulty menu and the game share
/// one set of base round settings, seeded from the config.
pub fn install<P: Platform>(stage: &mut Stage<P>, config: &GameConfig, art: TileArt) {
    let nav = stage.navigator();
    let size = stage.size();
    let settings = Rc::new(RefCell::new(config.round));

    let game = GameScene::new(config, settings.clone(), art, nav.clone());
    stage.register(GameScene::NAME, Box::new(game));
    stage.register(MAIN, Box::new(main_menu(&nav, size)));
    stage.register(CREDITS, Box::new(credits(&nav, size)));
    stage.register(DIFFICULTY, Box::new(difficulty_menu(&nav, size, settings)));
}

// ── Layout ──

/// A menu page: the title banner on top, buttons stacked below it.
struct Page {
    menu: Menu,
    left: i32,
    next_y: i32,
}

impl Page {
    fn new(title: &str, size: Size) -> Self {
        let mut background = Canvas::filled(size, palette::BACKGROUND);
        let banner = title_banner(title, size.w);
        let left = banner.x;
        background.blit(&banner_image(title, banner), Point::new(0, 0));
        Page {
            menu: Menu::new(background),
            left,
            next_y: banner.y + banner.h + 2,
        }
    }

    fn text(&mut self, text: &str, color: crossterm::style::Color) {
        let pos = Point::new(self.left, self.next_y);
        self.menu.background_mut().put_text(pos, text, color, palette::BACKGROUND);
        self.next_y += 2;
    }

    fn button(&mut self, label: &str, action: Action) {
        let button = Button::from_text(label, BUTTON, action);
        let h = button.rect().h;
        self.menu.add_button_at(button, Point::new(self.left, self.next_y));
        self.next_y += h + 1;
    }
}

/// Where the banner goes: 80% of the width, centered, one row from the
/// top. The height is the side of one letter square.
fn title_banner(title: &str, width: i32) -> Rect {
    let n = title.chars().count().max(1) as i32;
    let banner_w = width * 4 / 5;
    let side = (banner_w * 9 / 10 / n).max(1);
    Rect::new((width - banner_w) / 2, 1, banner_w, side)
}

/// Each letter of `title` in its own blue square; `o` is highlighted.
fn banner_image(title: &str, banner: Rect) -> Canvas {
    let n = title.chars().count() as i32;
    let side = banner.h;
    let gap = if n > 1 { (banner.w - n * side) / (n - 1) } else { 0 };
    let mut image = Canvas::new(Size::new(banner.x + banner.w, banner.y + banner.h));
    for (i, letter) in title.chars().enumerate() {
        let x = banner.x + (side + gap) * i as i32;
        image.fill_rect(Rect::new(x, banner.y, side, side), palette::BLUE_1);
        let color = if letter == 'o' { palette::YELLOW } else { palette::BLACK };
        let center = Rect::new(x, banner.y, side, side).center();
        image.put_text(Point::new(center.x, center.y), &letter.to_string(), color, palette::BLUE_1);
    }
    image
}

// ── Pages ──

fn main_menu(nav: &Navigator, size: Size) -> Menu {
    let mut page = Page::new("Memoz", size);
    page.button("Play", Box::new(nav.link(GameScene::NAME)));
    page.button("Difficulty", Box::new(nav.link(DIFFICULTY)));
    page.button("Credits", Box::new(nav.link(CREDITS)));
    page.button("Quit", Box::new(nav.link(QUIT)));
    page.menu
}

fn credits(nav: &Navigator, size: Size) -> Menu {
    let mut page = Page::new("Credits", size);
    page.text("Everything by:", palette::BLUE_2);
    page.text("Noé Calbrix & Louison Calbrix", palette::YELLOW);
    page.button("Back", Box::new(nav.link(MAIN)));
    page.menu
}

fn difficulty_menu(nav: &Navigator, size: Size, settings: Rc<RefCell<RoundSettings>>) -> Menu {
    let mut page = Page::new("Difficulty", size);
    for level in Difficulty::ALL {
        let settings = settings.clone();
        let nav = nav.clone();
        page.button(
            level.label(),
            Box::new(move || {
                *settings.borrow_mut() = level.settings();
                info!("difficulty set to {}", level.label());
                nav.request(MAIN)
            }),
        );
    }
    page.button("Back", Box::new(nav.link(MAIN)));
    page.menu
}
