use crate::error::GameError;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Smallest world side that leaves room for the spawn margin.
pub const MIN_WORLD_SIDE: i32 = 10;

/// Startup configuration, read once before the game begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheduler ticks per simulation step. Lower is faster.
    pub game_speed: u32,
    /// Scheduler ticks per second.
    pub frame_rate: u32,
    /// Size of one world square in pixels, for renderers that scale.
    pub square_size: u32,
    /// Width of the world in squares.
    pub world_width: i32,
    /// Height of the world in squares.
    pub world_height: i32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            game_speed: 2,
            frame_rate: 60,
            square_size: 10,
            world_width: 40,
            world_height: 40,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.game_speed < 1 {
            return Err(GameError::InvalidConfig("game_speed must be at least 1"));
        }
        if self.frame_rate < 1 {
            return Err(GameError::InvalidConfig("frame_rate must be positive"));
        }
        if self.square_size < 1 {
            return Err(GameError::InvalidConfig("square_size must be positive"));
        }
        if self.world_width < MIN_WORLD_SIDE || self.world_height < MIN_WORLD_SIDE {
            return Err(GameError::InvalidConfig("world sides must be at least 10"));
        }
        Ok(())
    }

    /// How long one scheduler tick lasts.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frame_rate))
    }

    pub fn load(path: &Path) -> Result<Config, GameError> {
        Config::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(text: &str) -> Result<Config, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// World dimensions parsed from a `WIDTHxHEIGHT` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSize {
    pub width: i32,
    pub height: i32,
}

impl FromStr for WorldSize {
    type Err = String;

    fn from_str(value: &str) -> Result<WorldSize, Self::Err> {
        let (width, height) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected format WIDTHxHEIGHT".to_string())?;
        let width = width
            .trim()
            .parse::<i32>()
            .map_err(|error| format!("invalid width: {error}"))?;
        let height = height
            .trim()
            .parse::<i32>()
            .map_err(|error| format!("invalid height: {error}"))?;
        if width < 1 || height < 1 {
            return Err("world dimensions must be positive".to_string());
        }
        Ok(WorldSize { width, height })
    }
}

/// Command-line arguments; every flag overrides the config file.
#[derive(Debug, Parser)]
#[command(author, version, about = "Classic grid snake for the terminal")]
pub struct Args {
    /// Path to a JSON configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// World dimensions in squares.
    #[arg(short, long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<WorldSize>,
    /// Scheduler ticks per simulation step (higher is slower).
    #[arg(long, value_name = "TICKS")]
    pub speed: Option<u32>,
    /// Scheduler ticks per second.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,
}

impl Args {
    pub fn into_config(self) -> Result<Config, GameError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(size) = self.size {
            config.world_width = size.width;
            config.world_height = size.height;
        }
        if let Some(speed) = self.speed {
            config.game_speed = speed;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        config.validate()?;
        Ok(config)
    }
}
