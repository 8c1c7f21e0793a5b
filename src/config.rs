//! Session configuration
//!
//! Everything a host can choose when starting a session. Values are checked
//! once in [`GameConfig::validate`]; a session never starts on a bad config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{REFERENCE_HEIGHT, REFERENCE_WIDTH, TICK_RATE};
use crate::sim::Layout;

/// Largest brick grid a session accepts
pub const MAX_BRICKS: u32 = 10_000;

/// How the paddle is steered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlScheme {
    /// Paddle center follows the pointer/touch x coordinate
    #[default]
    Pointer,
    /// Paddle moves at a fixed speed while left/right is held
    Keyboard,
}

/// Errors raised when validating or parsing a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas must be larger than zero (got {width}x{height})")]
    NonPositiveCanvas { width: f32, height: f32 },
    #[error("brick grid must have at least one column and one row (got {columns}x{rows})")]
    EmptyGrid { columns: u32, rows: u32 },
    #[error("brick grid {columns}x{rows} exceeds {max} bricks", max = MAX_BRICKS)]
    GridTooLarge { columns: u32, rows: u32 },
    #[error("minimum brick durability must be at least 1")]
    ZeroDurability,
    #[error("durability range {min}..={max} is inverted")]
    InvertedDurability { min: u8, max: u8 },
    #[error("power-up chance {0} must be between 0.0 and 1.0")]
    InvalidPowerUpChance(f64),
    #[error("initial lives must be at least 1")]
    NoLives,
    #[error("power-up duration {0}s must be positive")]
    InvalidPowerUpDuration(f32),
    #[error("max level must be at least 1 when set")]
    ZeroMaxLevel,
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session configuration (grid size, lives, layout scale and rules)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas size in pixels; every layout constant scales from it
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Brick grid dimensions
    pub columns: u32,
    pub rows: u32,
    /// Inclusive durability range for freshly built bricks
    pub durability_min: u8,
    pub durability_max: u8,
    /// Probability that a brick carries a power-up
    pub power_up_chance: f64,
    pub initial_lives: u32,
    pub control: ControlScheme,
    /// Gradually accelerate balls up to the speed cap
    pub speed_ramp: bool,
    /// Emit cosmetic particles behind the lead ball
    pub trail_particles: bool,
    /// Lifetime of timed power-ups (expand, sticky)
    pub power_up_seconds: f32,
    /// Clearing this level completes the session (endless when `None`)
    pub max_level: Option<u32>,
    /// RNG seed; a random seed is drawn when `None`
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: REFERENCE_WIDTH,
            canvas_height: REFERENCE_HEIGHT,
            columns: 9,
            rows: 5,
            durability_min: 1,
            durability_max: 3,
            power_up_chance: 0.1,
            initial_lives: 3,
            control: ControlScheme::Pointer,
            speed_ramp: true,
            trail_particles: true,
            power_up_seconds: 10.0,
            max_level: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config (missing fields fall back to defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce undefined play
    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas_ok = self.canvas_width.is_finite()
            && self.canvas_height.is_finite()
            && self.canvas_width > 0.0
            && self.canvas_height > 0.0;
        if !canvas_ok {
            return Err(ConfigError::NonPositiveCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self
            .columns
            .checked_mul(self.rows)
            .is_none_or(|count| count > MAX_BRICKS)
        {
            return Err(ConfigError::GridTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.durability_min == 0 {
            return Err(ConfigError::ZeroDurability);
        }
        if self.durability_min > self.durability_max {
            return Err(ConfigError::InvertedDurability {
                min: self.durability_min,
                max: self.durability_max,
            });
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(ConfigError::InvalidPowerUpChance(self.power_up_chance));
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if !(self.power_up_seconds.is_finite() && self.power_up_seconds > 0.0) {
            return Err(ConfigError::InvalidPowerUpDuration(self.power_up_seconds));
        }
        if self.max_level == Some(0) {
            return Err(ConfigError::ZeroMaxLevel);
        }
        Ok(())
    }

    /// Non-fatal layout problems worth logging (the game still runs)
    pub fn warnings(&self) -> Vec<String> {
        let mut w = Vec::new();
        let layout = Layout::new(self.canvas_width, self.canvas_height);
        if layout.grid_right(self.columns) > layout.width {
            w.push(format!(
                "{} columns overflow the canvas width ({:.0} > {:.0})",
                self.columns,
                layout.grid_right(self.columns),
                layout.width
            ));
        }
        if layout.grid_bottom(self.rows) > layout.paddle_plane() {
            w.push(format!(
                "{} rows reach below the paddle plane; bricks there are unreachable",
                self.rows
            ));
        }
        if self.power_up_chance == 0.0 {
            w.push("power-up chance is zero; no drops will spawn".into());
        }
        w
    }

    /// Number of bricks in a full grid
    pub fn brick_count(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    /// Timed power-up lifetime in simulation ticks
    pub fn power_up_ticks(&self) -> u64 {
        (self.power_up_seconds * TICK_RATE as f32).round().max(1.0) as u64
    }
}
