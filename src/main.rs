//! Zen-T-Block: a calm falling-block puzzle in the terminal.

mod app;
mod collision;
mod game;
mod gesture;
mod grid;
mod i18n;
mod input;
mod logging;
mod piece;
mod pieces;
mod score;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use i18n::Lang;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Narrowest and shortest board the catalog's pieces can spawn on.
pub const MIN_BOARD_SIDE: usize = 4;
/// Widest and tallest board the terminal layout handles.
pub const MAX_BOARD_SIDE: usize = 100;

/// Options that shape a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Gravity step period.
    pub drop_interval: Duration,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min} cells, got {width}x{height}")]
    BoardTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[error("board must be at most {max}x{max} cells, got {width}x{height}")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("drop interval must be positive")]
    ZeroDropInterval,
    #[error("frame rate must be a positive number, got {0}")]
    BadFrameRate(f64),
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        logging::init(path, args.log_level)
            .with_context(|| format!("setting up logging to {}", path.display()))?;
    }
    let config = args.game_config()?;
    let theme = theme::Theme::load(args.theme.as_deref())
        .with_context(|| format!("loading theme {:?}", args.theme))?;
    log::info!("starting with {:?}", config);
    let mut app = App::new(args, &config, theme)?;
    app.run()?;
    Ok(())
}

/// Zen-T-Block: falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "zen-t-block",
    version,
    about = "Zen-T-Block: a calm falling-block puzzle in the terminal, in English or Spanish.",
    long_about = "Zen-T-Block is a terminal falling-block puzzle.\n\n\
        Move and rotate the falling pieces and fill whole rows to clear them. Rows cleared \
        together score 10, 20, 40, 80... points each.\n\n\
        CONTROLS:\n  Left/Right  Move    Up        Rotate    Down     Drop\n  \
        Space/Enter Change piece   S  Start   P  Pause/Resume   L  Language   Q / Esc  Quit\n\n\
        With a mouse: drag sideways to move, drag up to rotate, drag down to drop, double \
        click to change piece."
)]
pub struct Args {
    /// Interface language.
    #[arg(short, long, default_value = "en")]
    pub lang: Lang,

    /// Board width in columns.
    #[arg(long, default_value = "12", value_name = "COLS")]
    pub width: usize,

    /// Board height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: usize,

    /// Milliseconds between gravity steps.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub drop_interval_ms: u64,

    /// Seed for the piece sequence (random when omitted).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]="#RRGGBB").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Append log records to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level used with --log-file.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,

    /// Start playing immediately instead of waiting for Start.
    #[arg(long)]
    pub no_menu: bool,
}

impl Args {
    /// Validate the board and timing options.
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        if self.width < MIN_BOARD_SIDE || self.height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_SIDE,
            });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        Ok(GameConfig {
            width: self.width,
            height: self.height,
            drop_interval: Duration::from_millis(self.drop_interval_ms),
        })
    }

    /// Time budget of one frame.
    pub fn frame_duration(&self) -> Result<Duration, ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::BadFrameRate(self.frame_rate));
        }
        Ok(Duration::from_secs_f64(1.0 / self.frame_rate))
    }
}
