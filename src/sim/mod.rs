//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (balls by spawn order, bricks column-major)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod powerup;
pub mod state;
pub mod tick;

pub use collision::{Rect, WallHit, point_in_rect, side_wall_hit, top_wall_hit, within_span};
pub use layout::Layout;
pub use powerup::{ExpandEffect, PowerUpState};
pub use state::{
    Ball, BallState, Brick, GameEvent, GamePhase, GameState, Paddle, Particle, ParticleKind,
    PowerUpDrop, PowerUpKind, SpawnPolicy,
};
pub use tick::{TickInput, tick};
