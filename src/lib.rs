//! Brick Breaker - a responsive Breakout/Arkanoid clone
//!
//! Core modules:
//! - `sim`: Simulation (paddle, balls, bricks, power-ups, particles)
//! - `session`: Session lifecycle boundary for a host shell
//! - `frame`: Per-frame orchestration (input -> tick -> render)
//! - `renderer`: Canvas-neutral draw lists (replayed on a 2D canvas in the browser)
//! - `platform`: Input sampling
//! - `config` / `settings`: Session configuration and player preferences

pub mod audio;
pub mod config;
pub mod frame;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, ControlScheme, GameConfig};
pub use frame::{FrameOrchestrator, FrameOutput, Screen};
pub use session::{EndReason, Session, SessionSummary};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Sizes are ratios of the canvas so the whole layout scales with the
/// viewport. Multiply by canvas width (`W`) or height (`H`) as noted.
pub mod consts {
    /// Simulation rate (one tick per display refresh at 60 Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Reference canvas size (4:3)
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 600.0;
    /// Fraction of the viewport the canvas may occupy
    pub const VIEWPORT_FILL: f32 = 0.9;

    /// Paddle (W, H, W per tick)
    pub const PADDLE_WIDTH_RATIO: f32 = 0.15;
    pub const PADDLE_HEIGHT_RATIO: f32 = 0.02;
    pub const PADDLE_SPEED_RATIO: f32 = 0.01;

    /// Ball (W, W per tick, H per tick)
    pub const BALL_RADIUS_RATIO: f32 = 0.01;
    pub const BALL_SPEED_X_RATIO: f32 = 0.005;
    pub const BALL_SPEED_Y_RATIO: f32 = 0.005;
    /// Speed ramp: per-tick increment and per-component cap (W)
    pub const BALL_SPEED_INCREMENT_RATIO: f32 = 0.0002;
    pub const BALL_MAX_SPEED_RATIO: f32 = 0.01;

    /// Brick grid (W, H, W, H, W)
    pub const BRICK_WIDTH_RATIO: f32 = 0.08;
    pub const BRICK_HEIGHT_RATIO: f32 = 0.03;
    pub const BRICK_PADDING_RATIO: f32 = 0.01;
    pub const BRICK_OFFSET_TOP_RATIO: f32 = 0.05;
    pub const BRICK_OFFSET_LEFT_RATIO: f32 = 0.03;

    /// Power-up drops (W, H, H per tick)
    pub const DROP_WIDTH_RATIO: f32 = 0.05;
    pub const DROP_HEIGHT_RATIO: f32 = 0.02;
    pub const DROP_SPEED_RATIO: f32 = 0.003;
    /// Expand-paddle bonus (W)
    pub const EXPAND_BONUS_RATIO: f32 = 0.03;

    /// Particles spawned when a brick is destroyed
    pub const BURST_PARTICLES: usize = 10;
    /// Burst particle radius: base + random span (W)
    pub const BURST_RADIUS_BASE_RATIO: f32 = 0.002;
    pub const BURST_RADIUS_SPAN_RATIO: f32 = 0.005;
    /// Burst particle velocity span, centered on zero (W per tick)
    pub const BURST_SPEED_SPAN_RATIO: f32 = 0.003;
    /// Burst particle shrink (W per tick)
    pub const BURST_DECAY_RATIO: f32 = 0.0001;
    pub const BURST_ALPHA: f32 = 0.5;

    /// Trail particles (absolute, per tick)
    pub const TRAIL_ALPHA_DECAY: f32 = 0.02;
    pub const TRAIL_RADIUS_DECAY: f32 = 0.05;

    /// Screen shake after a brick hit
    pub const SHAKE_SECONDS: f32 = 0.5;
    pub const SHAKE_INTENSITY_RATIO: f32 = 0.005;

    /// Hard particle ceiling (settings may lower it)
    pub const MAX_PARTICLES: usize = 2000;
}

/// Fit a canvas of the reference aspect ratio inside a viewport
///
/// Returns `(width, height)` filling at most [`consts::VIEWPORT_FILL`] of
/// either dimension.
pub fn fit_canvas(viewport_width: f32, viewport_height: f32) -> (f32, f32) {
    use consts::*;

    let aspect = REFERENCE_WIDTH / REFERENCE_HEIGHT;
    let max_w = viewport_width * VIEWPORT_FILL;
    let max_h = viewport_height * VIEWPORT_FILL;

    let mut width = max_w;
    let mut height = width / aspect;
    if height > max_h {
        height = max_h;
        width = height * aspect;
    }
    (width, height)
}
