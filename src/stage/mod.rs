//! Stage: scene table, navigation and the frame loop.
//!
//! One loop iteration is one frame:
//!
//! ```text
//!   poll_events ──► Close? ──► navigator.stop()
//!        │
//!        └─► scene[target].handle_inputs(rest) ──► play cues
//!                                        │
//!              scene[target].draw(frame) ◄┘
//!                    │
//!              platform.present(frame) ──► clock.tick()
//! ```
//!
//! A quit request only clears the active flag, so the frame in flight is
//! still drawn and presented; the loop exits at the top of the next one.

pub mod clock;
pub mod event;
pub mod navigator;
pub mod scene;

use std::collections::HashMap;
use std::io;

use crossterm::style::Color;
use log::{info, warn};

use crate::config::StageConfig;
use crate::domain::geometry::Size;
use crate::error::{Error, Result};
use crate::ui::canvas::Canvas;
use crate::ui::sound::SoundEngine;
use clock::FrameClock;
use event::InputEvent;
use navigator::{Navigator, MAIN};
use scene::{Context, Scene};

/// Host integration: where input comes from and where frames go.
pub trait Platform {
    /// Every event that arrived since the previous call, in order.
    /// Must not block.
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>>;

    fn present(&mut self, frame: &Canvas) -> io::Result<()>;

    /// Release the display. Called exactly once.
    fn teardown(&mut self) -> io::Result<()>;
}

pub struct Stage<P: Platform> {
    scenes: HashMap<String, Box<dyn Scene>>,
    navigator: Navigator,
    ctx: Context,
    frame: Canvas,
    clock: FrameClock,
    platform: P,
    sound: Option<SoundEngine>,
    torn_down: bool,
}

impl<P: Platform> Stage<P> {
    /// An empty stage whose first target is [`MAIN`].
    pub fn new(config: StageConfig, platform: P, sound: Option<SoundEngine>) -> Self {
        let navigator = Navigator::new(MAIN);
        Stage {
            scenes: HashMap::new(),
            ctx: Context::new(config.fps, config.size, navigator.clone()),
            navigator,
            frame: Canvas::filled(config.size, Color::Black),
            clock: FrameClock::new(config.fps),
            platform,
            sound,
            torn_down: false,
        }
    }

    // ── Scene table ──

    /// Register `scene` under `name`, replacing any scene already there.
    pub fn register(&mut self, name: &str, scene: Box<dyn Scene>) {
        self.navigator.register(name);
        if self.scenes.insert(name.to_string(), scene).is_some() {
            warn!("scene {name:?} was already registered and has been replaced");
        }
    }

    #[allow(dead_code)]
    pub fn scene(&self, name: &str) -> Option<&dyn Scene> {
        self.scenes.get(name).map(|s| s.as_ref())
    }

    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    #[allow(dead_code)]
    pub fn frame_rate(&self) -> u32 {
        self.ctx.frame_rate
    }

    pub fn size(&self) -> Size {
        self.ctx.surface
    }

    // ── Navigation ──

    pub fn target(&self) -> String {
        self.navigator.target()
    }

    #[allow(dead_code)]
    pub fn set_target(&mut self, name: &str) -> Result<()> {
        self.navigator.request(name)
    }

    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.navigator.is_active()
    }

    // ── Loop ──

    /// Run frames until a quit request or a close event, then tear down.
    pub fn play(&mut self) -> Result<()> {
        let target = self.target();
        if !self.scenes.contains_key(&target) {
            return Err(Error::UnknownScene(target));
        }
        info!("stage running at {} fps, starting in {target:?}", self.ctx.frame_rate);

        let result = self.run();
        let torn = self.teardown();
        info!("stage stopped after {} frames", self.clock.frames());
        result?;
        torn
    }

    fn run(&mut self) -> Result<()> {
        while self.navigator.is_active() {
            self.step()?;
            self.clock.tick();
        }
        Ok(())
    }

    /// One frame without pacing.
    fn step(&mut self) -> Result<()> {
        let (closes, batch): (Vec<InputEvent>, Vec<InputEvent>) = self
            .platform
            .poll_events()?
            .into_iter()
            .partition(|e| matches!(e, InputEvent::Close));
        if !closes.is_empty() {
            info!("close event received");
            self.navigator.stop();
        }

        let target = self.navigator.target();
        let scene = self
            .scenes
            .get_mut(&target)
            .ok_or_else(|| Error::UnknownScene(target.clone()))?;
        scene.handle_inputs(&batch, &mut self.ctx)?;
        self.play_cues();

        // the scene may have switched the target while handling input
        let target = self.navigator.target();
        let scene = self
            .scenes
            .get(&target)
            .ok_or_else(|| Error::UnknownScene(target.clone()))?;
        scene.draw(&mut self.frame);
        self.platform.present(&self.frame)?;
        Ok(())
    }

    fn play_cues(&mut self) {
        let cues = self.ctx.take_cues();
        if let Some(sfx) = self.sound.as_ref() {
            for cue in cues {
                sfx.play(cue);
            }
        }
    }

    /// Hand the display back. Safe to call more than once; only the first
    /// call reaches the platform.
    pub fn teardown(&mut self) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        self.platform.teardown()?;
        Ok(())
    }
}
