//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.

use std::path::PathBuf;

use crossterm::style::Color;
use serde::Deserialize;

use crate::domain::geometry::Size;
use crate::error::{Error, Result};

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub stage: StageConfig,
    pub round: RoundSettings,
    pub lives: u32,
    pub margin: i32,
    pub seed: Option<u64>,
    pub scaling: ScalingConfig,
    pub tiles: TilesConfig,
    pub sound: bool,
    pub log: LogConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageConfig {
    /// Output surface, in logical pixels.
    pub size: Size,
    pub fps: u32,
}

/// The base configuration of a round, before level scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSettings {
    pub rows: usize,
    pub columns: usize,
    pub targets: usize,
    /// Seconds the tiles stay revealed.
    pub time: u32,
    /// Wrong clicks allowed per round.
    pub tries: u32,
}

/// Level divisors: every `target_step` levels adds a target, every
/// `grid_step` levels adds a row and a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalingConfig {
    pub target_step: usize,
    pub grid_step: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TilesConfig {
    pub hidden: SpriteConfig,
    pub correct: SpriteConfig,
    pub wrong: SpriteConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteConfig {
    pub size: (i32, i32),
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    stage: TomlStage,
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    difficulty: TomlDifficulty,
    #[serde(default)]
    tiles: TomlTiles,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlStage {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_columns")]
    columns: usize,
    #[serde(default = "default_targets")]
    targets: usize,
    #[serde(default = "default_time")]
    time: u32,
    #[serde(default = "default_tries")]
    tries: u32,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_margin")]
    margin: i32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlDifficulty {
    #[serde(default = "default_target_step")]
    target_step: usize,
    #[serde(default = "default_grid_step")]
    grid_step: usize,
}

#[derive(Deserialize, Debug)]
struct TomlTiles {
    #[serde(default = "default_hidden")]
    hidden: TomlSprite,
    #[serde(default = "default_correct")]
    correct: TomlSprite,
    #[serde(default = "default_wrong")]
    wrong: TomlSprite,
}

#[derive(Deserialize, Debug)]
struct TomlSprite {
    size: [i32; 2],
    glyph: char,
    fg: [u8; 3],
    bg: [u8; 3],
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_width() -> i32 { 40 }   // 80 terminal columns
fn default_height() -> i32 { 24 }
fn default_fps() -> u32 { 40 }
fn default_rows() -> usize { 3 }
fn default_columns() -> usize { 4 }
fn default_targets() -> usize { 2 }
fn default_time() -> u32 { 2 }
fn default_tries() -> u32 { 3 }
fn default_lives() -> u32 { 3 }
fn default_margin() -> i32 { 1 }
fn default_target_step() -> usize { 2 }
fn default_grid_step() -> usize { 5 }
fn default_sound() -> bool { true }
fn default_log_file() -> String { "memoz.log".into() }
fn default_log_level() -> String { "info".into() }

// blue face-down, green and orange face-up
fn default_hidden() -> TomlSprite {
    TomlSprite { size: [2, 2], glyph: '░', fg: [56, 116, 181], bg: [67, 137, 215] }
}
fn default_correct() -> TomlSprite {
    TomlSprite { size: [2, 2], glyph: ' ', fg: [0, 0, 0], bg: [0, 200, 0] }
}
fn default_wrong() -> TomlSprite {
    TomlSprite { size: [2, 2], glyph: '╳', fg: [0, 0, 0], bg: [250, 147, 0] }
}

impl Default for TomlStage {
    fn default() -> Self {
        TomlStage {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            rows: default_rows(),
            columns: default_columns(),
            targets: default_targets(),
            time: default_time(),
            tries: default_tries(),
            lives: default_lives(),
            margin: default_margin(),
            seed: None,
        }
    }
}

impl Default for TomlDifficulty {
    fn default() -> Self {
        TomlDifficulty {
            target_step: default_target_step(),
            grid_step: default_grid_step(),
        }
    }
}

impl Default for TomlTiles {
    fn default() -> Self {
        TomlTiles {
            hidden: default_hidden(),
            correct: default_correct(),
            wrong: default_wrong(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl From<TomlSprite> for SpriteConfig {
    fn from(s: TomlSprite) -> Self {
        SpriteConfig {
            size: (s.size[0], s.size[1]),
            glyph: s.glyph,
            fg: rgb(s.fg),
            bg: rgb(s.bg),
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home, (4) system data directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse a config document directly; used by tests and tools.
    #[allow(dead_code)]
    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Relative log paths land next to the first searched directory
        let log_file = PathBuf::from(&toml_cfg.log.file);
        let log_file = match search_dirs.first() {
            Some(dir) if log_file.is_relative() => dir.join(log_file),
            _ => log_file,
        };

        GameConfig {
            stage: StageConfig {
                size: Size::new(toml_cfg.stage.width, toml_cfg.stage.height),
                fps: toml_cfg.stage.fps,
            },
            round: RoundSettings {
                rows: toml_cfg.game.rows,
                columns: toml_cfg.game.columns,
                targets: toml_cfg.game.targets,
                time: toml_cfg.game.time,
                tries: toml_cfg.game.tries,
            },
            lives: toml_cfg.game.lives,
            margin: toml_cfg.game.margin,
            seed: toml_cfg.game.seed,
            scaling: ScalingConfig {
                target_step: toml_cfg.difficulty.target_step,
                grid_step: toml_cfg.difficulty.grid_step,
            },
            tiles: TilesConfig {
                hidden: toml_cfg.tiles.hidden.into(),
                correct: toml_cfg.tiles.correct.into(),
                wrong: toml_cfg.tiles.wrong.into(),
            },
            sound: toml_cfg.sound.enabled,
            log: LogConfig {
                file: log_file,
                level: toml_cfg.log.level,
            },
        }
    }

    /// Reject values the game loop cannot run with. Grid-shape problems
    /// are caught later, when a grid is actually built.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(Error::InvalidConfiguration(msg.to_string()));
        if self.stage.fps == 0 {
            return bad("stage.fps must be positive");
        }
        if self.stage.size.w <= 0 || self.stage.size.h <= 0 {
            return bad("stage width and height must be positive");
        }
        if self.round.time.checked_mul(self.stage.fps).is_none() {
            return bad("game.time is too long for stage.fps");
        }
        if self.round.tries == 0 {
            return bad("game.tries must be positive");
        }
        if self.lives == 0 {
            return bad("game.lives must be positive");
        }
        if self.margin < 0 {
            return bad("game.margin cannot be negative");
        }
        if self.scaling.target_step == 0 || self.scaling.grid_step == 0 {
            return bad("difficulty steps must be positive");
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/memoz)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/memoz");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/memoz)
    let sys = PathBuf::from("/usr/share/memoz");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
/// Runs before the logger exists, so problems go to stderr.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.stage.fps, 40);
        assert_eq!(cfg.stage.size, Size::new(40, 24));
        assert_eq!(
            cfg.round,
            RoundSettings { rows: 3, columns: 4, targets: 2, time: 2, tries: 3 }
        );
        assert_eq!(cfg.lives, 3);
        assert_eq!(cfg.scaling, ScalingConfig { target_step: 2, grid_step: 5 });
        assert_eq!(cfg.tiles.hidden.size, (2, 2));
        assert!(cfg.sound);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[game]\ntries = 5\nseed = 42\n\n[stage]\nfps = 30\n",
        )
        .unwrap();
        assert_eq!(cfg.round.tries, 5);
        assert_eq!(cfg.round.rows, 3);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.stage.fps, 30);
        assert_eq!(cfg.stage.size.w, 40);
    }

    #[test]
    fn sprite_tables_parse_colors() {
        let cfg = GameConfig::parse(
            "[tiles.wrong]\nsize = [3, 3]\nglyph = \"x\"\nfg = [1, 2, 3]\nbg = [4, 5, 6]\n",
        )
        .unwrap();
        assert_eq!(cfg.tiles.wrong.size, (3, 3));
        assert_eq!(cfg.tiles.wrong.glyph, 'x');
        assert_eq!(cfg.tiles.wrong.bg, Color::Rgb { r: 4, g: 5, b: 6 });
        assert_eq!(cfg.tiles.hidden.size, (2, 2));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[stage]\nfps = \"fast\"\n").is_err());
    }

    #[test]
    fn zero_step_fails_validation() {
        let cfg = GameConfig::parse("[difficulty]\ngrid_step = 0\n").unwrap();
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn reveal_frames_must_fit_a_counter() {
        let cfg = GameConfig::parse("[game]\ntime = 200000000\n").unwrap();
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfiguration(_))));
        let cfg = GameConfig::parse("[game]\ntime = 3600\n").unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_fps_fails_validation() {
        let cfg = GameConfig::parse("[stage]\nfps = 0\n").unwrap();
        assert!(cfg.validate().is_err());
    }
}
