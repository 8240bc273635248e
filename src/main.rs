/// Entry point: config, logging, terminal, then the stage loop.

mod config;
mod domain;
mod error;
mod logging;
mod scenes;
mod stage;
mod ui;

use std::process::ExitCode;

use log::{error, info, warn};

use config::GameConfig;
use error::Result;
use stage::Stage;
use ui::assets::TileArt;
use ui::sound::SoundEngine;
use ui::Terminal;

fn main() -> ExitCode {
    let config = GameConfig::load();

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Warning: could not open log file {}: {e}", config.log.file.display());
    }

    match run(&config) {
        Ok(()) => {
            println!();
            println!("Thanks for playing Memoz!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Memoz error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &GameConfig) -> Result<()> {
    config.validate()?;
    let t = &config.tiles;
    let art = TileArt::from_config(&t.hidden, &t.correct, &t.wrong)?;

    let sound = if config.sound { SoundEngine::new() } else { None };
    if config.sound && sound.is_none() {
        warn!("sound enabled but unavailable");
    }

    let terminal = Terminal::init()?;
    info!("terminal ready, surface {:?}", config.stage.size);

    let mut stage = Stage::new(config.stage, terminal, sound);
    scenes::install(&mut stage, config, art);
    let result = stage.play();

    // play() does not tear down when it refuses to start
    if let Err(e) = stage.teardown() {
        warn!("terminal cleanup failed: {e}");
    }
    result
}
