//! The memory round.
//!
//! A round moves through three phases, all counted in frames:
//!
//! ```text
//!   reveal (timer > 0) ──timer hits 0, hide grid──► guess
//!      ▲                                              │
//!      └──── next input cycle ◄── round over ◄────────┘
//! ```
//!
//! Winning raises the level by one, losing lowers it (not below 0) and
//! costs a life. Running out of lives resets the run and sends the player
//! back to the main menu.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GameConfig, RoundSettings, ScalingConfig};
use crate::domain::difficulty;
use crate::domain::geometry::{Point, Rect};
use crate::domain::grid::{Grid, TileMetrics};
use crate::error::Result;
use crate::scenes::palette;
use crate::stage::event::{Cue, InputEvent};
use crate::stage::navigator::{Navigator, MAIN};
use crate::stage::scene::{Context, Scene};
use crate::ui::assets::TileArt;
use crate::ui::canvas::Canvas;

/// Rows reserved above the play area for the timer bar and status line.
const HUD_ROWS: i32 = 2;

pub struct GameScene {
    navigator: Navigator,
    /// Base settings, shared with the difficulty menu.
    settings: Rc<RefCell<RoundSettings>>,
    scaling: ScalingConfig,
    lives: u32,
    remaining_lives: u32,
    level: usize,
    remaining_tries: u32,
    /// Frames left in the reveal phase.
    timer: u32,
    timer_total: u32,
    game_over: bool,
    grid: Option<Grid>,
    art: TileArt,
    margin: i32,
    /// Where the grid is centered, in surface coordinates.
    area: Rect,
    frame_rate: u32,
    rng: StdRng,
}

impl GameScene {
    pub const NAME: &'static str = "game";

    /// A scene waiting for its first round; the round starts on the first
    /// input cycle.
    pub fn new(
        config: &GameConfig,
        settings: Rc<RefCell<RoundSettings>>,
        art: TileArt,
        navigator: Navigator,
    ) -> Self {
        let surface = config.stage.size;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GameScene {
            navigator,
            settings,
            scaling: config.scaling,
            lives: config.lives,
            remaining_lives: config.lives,
            level: 0,
            remaining_tries: 0,
            timer: 0,
            timer_total: 0,
            game_over: true,
            grid: None,
            art,
            margin: config.margin,
            area: Rect::new(0, HUD_ROWS, surface.w, (surface.h - HUD_ROWS).max(0)),
            frame_rate: config.stage.fps,
            rng,
        }
    }

    fn metrics(&self) -> TileMetrics {
        TileMetrics { side: self.art.side(), margin: self.margin }
    }

    /// Targets for the current level, leaving at least one decoy on the grid.
    pub fn effective_target_count(&self) -> usize {
        let wanted =
            difficulty::effective_target_count(self.settings.borrow().targets, self.level, self.scaling);
        let (rows, columns) = self.effective_grid_dim();
        wanted.min((rows * columns).saturating_sub(1).max(1))
    }

    /// `(rows, columns)` for the current level, capped to what fits the
    /// play area.
    pub fn effective_grid_dim(&self) -> (usize, usize) {
        let base = *self.settings.borrow();
        let (rows, columns) =
            difficulty::effective_grid_dim((base.rows, base.columns), self.level, self.scaling);
        let metrics = self.metrics();
        let max_rows = metrics.fit(self.area.h).max(1);
        let max_columns = metrics.fit(self.area.w).max(1);
        (rows.min(max_rows), columns.min(max_columns))
    }

    /// Deal a fresh, fully revealed grid and restart the reveal timer.
    pub fn start_game(&mut self) -> Result<()> {
        let base = *self.settings.borrow();
        let (rows, columns) = self.effective_grid_dim();
        let nb_target = self.effective_target_count();
        let grid = Grid::new(rows, columns, nb_target, self.area.size(), self.metrics(), &mut self.rng)?;

        self.game_over = false;
        self.remaining_tries = base.tries;
        self.timer_total = base.time.saturating_mul(self.frame_rate);
        self.timer = self.timer_total;
        debug!(
            "round at level {}: {rows}x{columns}, {nb_target} targets, {} frames\n{grid}",
            self.level, self.timer_total
        );
        self.grid = Some(grid);
        if self.timer == 0 {
            self.hide_grid();
        }
        Ok(())
    }

    fn hide_grid(&mut self) {
        if let Some(grid) = self.grid.as_mut() {
            grid.hide_all();
        }
    }

    /// Resolve one press during the guess phase.
    fn guess(&mut self, at: Point, ctx: &mut Context) -> Result<()> {
        let Some(grid) = self.grid.as_mut() else {
            return Ok(());
        };
        let local = at.offset(-self.area.x, -self.area.y);
        let Some(cell) = grid.tile_at(local) else {
            return Ok(());
        };
        let was_revealed = grid.tile(cell).is_some_and(|t| t.is_revealed());
        if grid.reveal_tile(local) != Some(true) {
            self.remaining_tries = self.remaining_tries.saturating_sub(1);
            ctx.cue(Cue::Wrong);
        } else if !was_revealed {
            ctx.cue(Cue::Correct);
        }

        let found_all = grid.all_found();
        if self.remaining_tries == 0 {
            self.lose_round(ctx)?;
        } else if found_all {
            self.level += 1;
            self.game_over = true;
            ctx.cue(Cue::RoundWon);
            info!("round won, level {}", self.level);
        }
        Ok(())
    }

    fn lose_round(&mut self, ctx: &mut Context) -> Result<()> {
        self.level = self.level.saturating_sub(1);
        self.game_over = true;
        self.remaining_lives = self.remaining_lives.saturating_sub(1);
        ctx.cue(Cue::RoundLost);
        info!("round lost, level {}, {} lives left", self.level, self.remaining_lives);

        if self.remaining_lives == 0 {
            info!("out of lives, back to the menu");
            self.remaining_lives = self.lives;
            self.level = 0;
            self.navigator.request(MAIN)?;
        }
        Ok(())
    }

    // ── Drawing ──

    fn draw_hud(&self, frame: &mut Canvas) {
        let width = frame.size().w;
        frame.fill_rect(Rect::new(0, 0, width, HUD_ROWS), palette::BACKGROUND);
        if self.timer_total > 0 && self.timer > 0 {
            let bar = (width as i64 * self.timer as i64 / self.timer_total as i64) as i32;
            frame.fill_rect(Rect::new(0, 0, bar, 1), palette::YELLOW);
        }
        let status = format!(
            "Tries: {}   Level: {}   Lives: {}",
            self.remaining_tries, self.level, self.remaining_lives
        );
        frame.put_text(Point::new(1, 1), &status, palette::WHITE, palette::BACKGROUND);
    }
}

impl Scene for GameScene {
    fn handle_inputs(&mut self, events: &[InputEvent], ctx: &mut Context) -> Result<()> {
        if self.game_over {
            self.start_game()?;
        }

        if self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.hide_grid();
            }
            return Ok(());
        }

        for event in events {
            if self.game_over {
                break;
            }
            if let InputEvent::PointerPress(at) = *event {
                self.guess(at, ctx)?;
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Canvas) {
        frame.clear(palette::BACKGROUND);
        if let Some(grid) = self.grid.as_ref() {
            let origin = self.area.pos();
            for (cell, tile) in grid.iter() {
                let pos = grid.tile_rect(cell).pos().offset(origin.x, origin.y);
                frame.blit(self.art.image(tile.look()), pos);
            }
        }
        // drawn last so an oversized grid never covers it
        self.draw_hud(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Size;
    use crate::domain::grid::Cell;
    use crate::domain::tile::TileLook;
    use crate::ui::canvas::Pixel;

    const FPS: u32 = 10;

    fn config(time: u32, tries: u32) -> GameConfig {
        let text = format!(
            "[stage]\nfps = {FPS}\n[game]\ntime = {time}\ntries = {tries}\nlives = 2\nseed = 7\n"
        );
        GameConfig::parse(&text).unwrap()
    }

    fn setup_with(cfg: &GameConfig) -> (GameScene, Context) {
        let nav = Navigator::new(MAIN);
        nav.register(MAIN);
        nav.register(GameScene::NAME);
        nav.request(GameScene::NAME).unwrap();
        let t = &cfg.tiles;
        let art = TileArt::from_config(&t.hidden, &t.correct, &t.wrong).unwrap();
        let settings = Rc::new(RefCell::new(cfg.round));
        let scene = GameScene::new(cfg, settings, art, nav.clone());
        (scene, Context::new(FPS, cfg.stage.size, nav))
    }

    fn setup() -> (GameScene, Context) {
        setup_with(&config(1, 3))
    }

    /// Start a round and run the reveal timer out.
    fn to_guess_phase(scene: &mut GameScene, ctx: &mut Context) {
        scene.handle_inputs(&[], ctx).unwrap();
        for _ in 1..scene.timer_total {
            scene.handle_inputs(&[], ctx).unwrap();
        }
        assert_eq!(scene.timer, 0);
        ctx.take_cues();
    }

    fn press(scene: &GameScene, cell: Cell) -> InputEvent {
        let grid = scene.grid.as_ref().unwrap();
        let r = grid.tile_rect(cell);
        InputEvent::PointerPress(r.pos().offset(scene.area.x, scene.area.y))
    }

    fn decoys(scene: &GameScene) -> Vec<Cell> {
        let grid = scene.grid.as_ref().unwrap();
        grid.iter().filter(|(_, t)| !t.is_target()).map(|(c, _)| c).collect()
    }

    fn targets(scene: &GameScene) -> Vec<Cell> {
        scene.grid.as_ref().unwrap().targets().to_vec()
    }

    #[test]
    fn first_cycle_starts_a_revealed_round() {
        let (mut scene, mut ctx) = setup();
        assert!(scene.game_over && scene.grid.is_none());
        scene.handle_inputs(&[], &mut ctx).unwrap();

        let grid = scene.grid.as_ref().unwrap();
        assert!(!scene.game_over);
        assert_eq!((grid.rows(), grid.columns()), (3, 4));
        assert_eq!(grid.nb_target(), 2);
        assert_eq!(grid.points(), 2);
        assert_eq!(scene.remaining_tries, 3);
        assert_eq!(scene.timer, FPS - 1, "the starting cycle already counts down");
    }

    #[test]
    fn reveal_lasts_time_times_frame_rate_cycles() {
        let (mut scene, mut ctx) = setup();
        let mut cycles = 0;
        loop {
            scene.handle_inputs(&[], &mut ctx).unwrap();
            cycles += 1;
            if scene.grid.as_ref().unwrap().points() == 0 {
                break;
            }
            assert!(cycles < 2 * FPS, "grid never hid");
        }
        assert_eq!(cycles, FPS);
    }

    #[test]
    fn presses_during_reveal_are_ignored() {
        let (mut scene, mut ctx) = setup();
        scene.handle_inputs(&[], &mut ctx).unwrap();
        let click = press(&scene, decoys(&scene)[0]);
        scene.handle_inputs(&[click, click, click], &mut ctx).unwrap();
        assert_eq!(scene.remaining_tries, 3);
        assert_eq!(scene.timer, FPS - 2);
        assert!(ctx.take_cues().is_empty());
    }

    #[test]
    fn grid_is_hidden_once_when_timer_runs_out() {
        let (mut scene, mut ctx) = setup();
        scene.handle_inputs(&[], &mut ctx).unwrap();
        for _ in 0..FPS - 2 {
            scene.handle_inputs(&[], &mut ctx).unwrap();
        }
        assert_eq!(scene.timer, 1);
        assert_eq!(scene.grid.as_ref().unwrap().points(), 2);
        scene.handle_inputs(&[], &mut ctx).unwrap();
        assert!(scene.grid.as_ref().unwrap().iter().all(|(_, t)| !t.is_revealed()));

        let target = targets(&scene)[0];
        scene.handle_inputs(&[press(&scene, target)], &mut ctx).unwrap();
        scene.handle_inputs(&[], &mut ctx).unwrap();
        assert_eq!(scene.grid.as_ref().unwrap().points(), 1, "not hidden again");
    }

    #[test]
    fn zero_reveal_time_hides_immediately() {
        let (mut scene, mut ctx) = setup_with(&config(0, 3));
        scene.handle_inputs(&[], &mut ctx).unwrap();
        assert_eq!(scene.timer, 0);
        assert_eq!(scene.grid.as_ref().unwrap().points(), 0);
    }

    #[test]
    fn zero_reveal_time_takes_presses_on_the_starting_cycle() {
        let (mut scene, mut ctx) = setup_with(&config(0, 3));
        scene.handle_inputs(&[], &mut ctx).unwrap();
        scene.game_over = true;
        let click = press(&scene, (0, 0));
        scene.handle_inputs(&[click], &mut ctx).unwrap();
        let grid = scene.grid.as_ref().unwrap();
        assert!(grid.tile((0, 0)).unwrap().is_revealed());
        assert_eq!(grid.iter().filter(|(_, t)| t.is_revealed()).count(), 1);
    }

    #[test]
    fn huge_reveal_time_saturates() {
        let (mut scene, mut ctx) = setup_with(&config(u32::MAX, 3));
        scene.handle_inputs(&[], &mut ctx).unwrap();
        assert_eq!(scene.timer_total, u32::MAX);
    }

    #[test]
    fn running_out_of_tries_loses_the_round() {
        let (mut scene, mut ctx) = setup();
        to_guess_phase(&mut scene, &mut ctx);
        let clicks: Vec<InputEvent> = decoys(&scene)[..3].iter().map(|&c| press(&scene, c)).collect();
        scene.handle_inputs(&clicks, &mut ctx).unwrap();

        assert_eq!(scene.remaining_tries, 0);
        assert!(scene.game_over);
        assert_eq!(scene.level, 0);
        assert_eq!(scene.remaining_lives, 1);
        assert_eq!(
            ctx.take_cues(),
            vec![Cue::Wrong, Cue::Wrong, Cue::Wrong, Cue::RoundLost]
        );
    }

    #[test]
    fn finding_every_target_wins_the_round() {
        let (mut scene, mut ctx) = setup();
        to_guess_phase(&mut scene, &mut ctx);
        let mut clicks = vec![press(&scene, decoys(&scene)[0])];
        clicks.extend(targets(&scene).into_iter().map(|c| press(&scene, c)));
        scene.handle_inputs(&clicks, &mut ctx).unwrap();

        assert!(scene.game_over);
        assert_eq!(scene.level, 1);
        assert_eq!(scene.remaining_tries, 2);
        assert_eq!(scene.remaining_lives, 2);
        assert_eq!(
            ctx.take_cues(),
            vec![Cue::Wrong, Cue::Correct, Cue::Correct, Cue::RoundWon]
        );
    }

    #[test]
    fn next_round_starts_one_cycle_after_the_last() {
        let (mut scene, mut ctx) = setup();
        to_guess_phase(&mut scene, &mut ctx);
        let clicks: Vec<InputEvent> = targets(&scene).into_iter().map(|c| press(&scene, c)).collect();
        scene.handle_inputs(&clicks, &mut ctx).unwrap();
        assert!(scene.game_over);

        let stale = press(&scene, decoys(&scene)[0]);
        scene.handle_inputs(&[stale], &mut ctx).unwrap();
        assert!(!scene.game_over);
        assert_eq!(scene.remaining_tries, 3);
        assert_eq!(scene.timer, FPS - 1);
        assert_eq!(scene.grid.as_ref().unwrap().points(), 2, "stale press ignored");
    }

    #[test]
    fn revealed_tiles_cost_nothing() {
        let (mut scene, mut ctx) = setup();
        to_guess_phase(&mut scene, &mut ctx);
        let (decoy, target) = (decoys(&scene)[0], targets(&scene)[0]);
        let clicks = [press(&scene, decoy), press(&scene, decoy), press(&scene, target), press(&scene, target)];
        scene.handle_inputs(&clicks, &mut ctx).unwrap();
        assert_eq!(scene.remaining_tries, 2);
        assert_eq!(ctx.take_cues(), vec![Cue::Wrong, Cue::Correct]);
    }

    #[test]
    fn clicks_off_the_tiles_do_nothing() {
        let (mut scene, mut ctx) = setup();
        to_guess_phase(&mut scene, &mut ctx);
        let grid = scene.grid.as_ref().unwrap();
        let corner = grid.tile_rect((0, 0)).pos().offset(scene.area.x, scene.area.y);
        let clicks = [
            InputEvent::PointerPress(Point::new(0, 0)),
            InputEvent::PointerPress(corner.offset(-1, 0)),
            InputEvent::PointerPress(corner.offset(grid.tile_rect((0, 0)).w, 0)),
        ];
        scene.handle_inputs(&clicks, &mut ctx).unwrap();
        assert_eq!(scene.remaining_tries, 3);
        assert_eq!(scene.grid.as_ref().unwrap().points(), 0);
    }

    #[test]
    fn presses_after_the_round_ends_are_dropped() {
        let (mut scene, mut ctx) = setup_with(&config(1, 1));
        to_guess_phase(&mut scene, &mut ctx);
        let clicks = [press(&scene, decoys(&scene)[0]), press(&scene, targets(&scene)[0])];
        scene.handle_inputs(&clicks, &mut ctx).unwrap();
        assert!(scene.game_over);
        assert_eq!(scene.grid.as_ref().unwrap().points(), 0);
    }

    #[test]
    fn losing_lowers_the_level() {
        let (mut scene, mut ctx) = setup_with(&config(1, 1));
        scene.level = 3;
        to_guess_phase(&mut scene, &mut ctx);
        scene.handle_inputs(&[press(&scene, decoys(&scene)[0])], &mut ctx).unwrap();
        assert_eq!(scene.level, 2);
    }

    #[test]
    fn last_life_resets_and_returns_to_menu_once() {
        let (mut scene, mut ctx) = setup_with(&config(1, 1));
        let nav = ctx.navigator.clone();
        let before = nav.switches();

        for _ in 0..2 {
            to_guess_phase(&mut scene, &mut ctx);
            scene.level = 4;
            scene.handle_inputs(&[press(&scene, decoys(&scene)[0])], &mut ctx).unwrap();
        }

        assert_eq!(nav.target(), MAIN);
        assert_eq!(nav.switches(), before + 1);
        assert_eq!(scene.remaining_lives, 2);
        assert_eq!(scene.level, 0);
    }

    #[test]
    fn level_scales_the_next_round() {
        let (mut scene, mut ctx) = setup();
        scene.level = 12;
        assert_eq!(scene.effective_target_count(), 8);
        assert_eq!(scene.effective_grid_dim(), (5, 6));
        scene.handle_inputs(&[], &mut ctx).unwrap();
        let grid = scene.grid.as_ref().unwrap();
        assert_eq!((grid.rows(), grid.columns(), grid.nb_target()), (5, 6, 8));
    }

    #[test]
    fn high_levels_stay_inside_the_play_area() {
        let (mut scene, mut ctx) = setup();
        *scene.settings.borrow_mut() = difficulty::Difficulty::Hard.settings();
        scene.level = 200;
        // 22 rows and 40 columns of play area, 2px tiles, 1px margin
        assert_eq!(scene.effective_grid_dim(), (7, 13));
        assert_eq!(scene.effective_target_count(), 7 * 13 - 1);

        scene.handle_inputs(&[], &mut ctx).unwrap();
        let grid = scene.grid.as_ref().unwrap();
        let area = Rect::at(Point::new(0, 0), scene.area.size());
        for (cell, _) in grid.iter() {
            let r = grid.tile_rect(cell);
            assert!(area.contains(r.pos()), "{cell:?} starts outside");
            assert!(area.contains(r.pos().offset(r.w - 1, r.h - 1)), "{cell:?} ends outside");
        }
    }

    #[test]
    fn new_settings_wait_for_the_next_round() {
        let (mut scene, mut ctx) = setup();
        scene.handle_inputs(&[], &mut ctx).unwrap();
        *scene.settings.borrow_mut() = difficulty::Difficulty::Hard.settings();
        assert_eq!(scene.grid.as_ref().unwrap().rows(), 3);
        assert_eq!(scene.remaining_tries, 3);

        scene.game_over = true;
        scene.handle_inputs(&[], &mut ctx).unwrap();
        let grid = scene.grid.as_ref().unwrap();
        assert_eq!((grid.rows(), grid.columns(), grid.nb_target()), (4, 5, 6));
        assert_eq!(scene.remaining_tries, 2);
    }

    #[test]
    fn draw_shows_timer_status_and_tiles() {
        let (mut scene, mut ctx) = setup();
        scene.handle_inputs(&[], &mut ctx).unwrap();
        let size = Size::new(40, 24);
        let mut frame = Canvas::new(size);
        scene.draw(&mut frame);

        // one cycle into the reveal: 9/10 of the width
        assert_eq!(frame.get(Point::new(35, 0)), Some(Pixel::solid(palette::YELLOW)));
        assert_eq!(frame.get(Point::new(36, 0)), Some(Pixel::solid(palette::BACKGROUND)));
        assert_eq!(frame.get(Point::new(1, 1)).unwrap().glyphs, ['T', 'r']);

        let grid = scene.grid.as_ref().unwrap();
        let target = grid.targets()[0];
        let pos = grid.tile_rect(target).pos().offset(scene.area.x, scene.area.y);
        let expected = scene.art.image(TileLook::Correct).get(Point::new(0, 0));
        assert_eq!(frame.get(pos), expected);
    }

    #[test]
    fn timer_bar_shrinks() {
        let (mut scene, mut ctx) = setup();
        scene.handle_inputs(&[], &mut ctx).unwrap();
        for _ in 1..FPS / 2 {
            scene.handle_inputs(&[], &mut ctx).unwrap();
        }
        assert_eq!(scene.timer, FPS / 2);
        let mut frame = Canvas::new(Size::new(40, 24));
        scene.draw(&mut frame);
        assert_eq!(frame.get(Point::new(19, 0)), Some(Pixel::solid(palette::YELLOW)));
        assert_eq!(frame.get(Point::new(20, 0)), Some(Pixel::solid(palette::BACKGROUND)));
    }
}
