//! Log backend setup.
//!
//! The terminal is in raw alternate-screen mode while the game runs, so
//! records go to a file. `RUST_LOG` still wins over the configured level.

use std::fs::OpenOptions;
use std::io::Write;

use env_logger::{Builder, Env, Target};

use crate::config::LogConfig;
use crate::error::Result;

pub fn init(config: &LogConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let installed = Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init();
    if installed.is_err() {
        // a logger is already in place (tests, embedding); keep it
        log::debug!("logger already initialized");
    }
    Ok(())
}
