//! Game state and core simulation types
//!
//! `GameState` is the single aggregate for a session: it owns every entity
//! collection and the session counters. Nothing in the simulation lives in
//! module-level state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::layout::Layout;
use super::powerup::PowerUpState;
use crate::config::GameConfig;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused (tick clock frozen)
    Paused,
    /// Out of lives
    GameOver,
    /// Cleared the configured final level
    Completed,
}

impl GamePhase {
    /// True once the session can no longer be played
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Completed)
    }
}

/// Ball state - free-moving or held by the sticky paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    Free,
    /// Held on a sticky paddle at `offset` from its center, velocity zeroed
    Stuck { offset: f32 },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn is_free(&self) -> bool {
        self.state == BallState::Free
    }

    /// Keep a stuck ball riding on the paddle
    pub fn follow_paddle(&mut self, paddle: &Paddle) {
        if let BallState::Stuck { offset } = self.state {
            self.pos.x = paddle.center() + offset;
        }
    }

    /// Grow each velocity component by `increment`, keeping its sign,
    /// then clamp each component to `[-max, max]`
    ///
    /// A zero component stays zero.
    pub fn ramp_speed(&mut self, increment: f32, max: f32) {
        let ramp = |v: f32| {
            let sign = if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            };
            (v + increment * sign).clamp(-max, max)
        };
        self.vel = Vec2::new(ramp(self.vel.x), ramp(self.vel.y));
    }
}

/// Where a freshly spawned ball starts horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPolicy {
    /// Horizontal center of the canvas
    CanvasCenter,
    /// Above the middle of the paddle
    AbovePaddle,
}

/// The player's paddle (pinned to the bottom edge of the canvas)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Keyboard movement per tick
    pub speed: f32,
}

impl Paddle {
    pub fn new(layout: &Layout) -> Self {
        Self {
            x: (layout.width - layout.paddle_width) / 2.0,
            width: layout.paddle_width,
            height: layout.paddle_height,
            speed: layout.paddle_speed,
        }
    }

    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Keep the paddle on the canvas
    pub fn clamp_to(&mut self, canvas_width: f32) {
        self.x = self.x.clamp(0.0, (canvas_width - self.width).max(0.0));
    }

    /// Center the paddle under a pointer x coordinate
    pub fn track(&mut self, target_x: f32, canvas_width: f32) {
        self.x = target_x - self.width / 2.0;
        self.clamp_to(canvas_width);
    }

    /// Move one keyboard step (`direction` is -1, 0 or 1)
    pub fn step(&mut self, direction: f32, canvas_width: f32) {
        self.x += self.speed * direction;
        self.clamp_to(canvas_width);
    }

    pub fn rect(&self, layout: &Layout) -> Rect {
        Rect::new(self.x, layout.paddle_top(), self.width, self.height)
    }
}

/// Power-up kinds carried by bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Wider paddle for a while
    Expand,
    /// Balls stick to the paddle for a while
    Sticky,
    /// Two extra balls (one-shot)
    MultiBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Expand,
        PowerUpKind::Sticky,
        PowerUpKind::MultiBall,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "expand",
            PowerUpKind::Sticky => "sticky",
            PowerUpKind::MultiBall => "multiball",
        }
    }
}

/// A brick in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub column: u32,
    pub row: u32,
    /// Pixel rect derived from the grid index and the layout
    pub rect: Rect,
    /// Remaining hits; 0 means destroyed (inert, not drawn)
    pub durability: u8,
    pub power_up: Option<PowerUpKind>,
}

impl Brick {
    pub fn is_alive(&self) -> bool {
        self.durability > 0
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpDrop {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Downward pixels per tick
    pub speed: f32,
}

/// Particle flavor (drives color and decay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Debris from a destroyed brick
    Burst,
    /// Fading dot behind the lead ball
    Trail,
}

/// A cosmetic particle (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub radius_decay: f32,
    pub alpha: f32,
    pub alpha_decay: f32,
}

impl Particle {
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.radius -= self.radius_decay;
        self.alpha -= self.alpha_decay;
    }

    pub fn is_dead(&self) -> bool {
        self.radius <= 0.0 || self.alpha <= 0.0
    }
}

/// Notifications for the render/audio collaborators, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Session began (starts the background loop)
    SessionStarted,
    PaddleHit,
    /// A ball hit a brick (raised whether or not it broke)
    BrickHit { destroyed: bool },
    BallLost,
    LifeLost { lives_left: u32 },
    LevelUp { level: u32 },
    PowerUpCaught(PowerUpKind),
    PowerUpMissed(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    GameOver,
    SessionCompleted { level: u32 },
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: GameConfig,
    pub layout: Layout,
    /// Seed this session's RNG was built from
    pub seed: u64,
    #[serde(skip)]
    rng: Pcg32,
    /// Simulation tick counter (monotonic clock for power-up deadlines)
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Bricks destroyed since the last level-up
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Bricks destroyed over the whole session
    pub bricks_destroyed: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    /// Column-major grid: index = column * rows + row
    pub bricks: Vec<Brick>,
    pub drops: Vec<PowerUpDrop>,
    pub particles: Vec<Particle>,
    pub power_ups: PowerUpState,
    /// Remaining screen shake ticks and this tick's offset
    pub shake_ticks: u32,
    pub shake_offset: Vec2,
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session state (config must already be validated)
    pub fn new(config: &GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let layout = Layout::new(config.canvas_width, config.canvas_height);
        let mut state = Self {
            config: config.clone(),
            layout,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            lives: config.initial_lives,
            level: 1,
            bricks_destroyed: 0,
            paddle: Paddle::new(&layout),
            balls: Vec::new(),
            bricks: Vec::new(),
            drops: Vec::new(),
            particles: Vec::new(),
            power_ups: PowerUpState::default(),
            shake_ticks: 0,
            shake_offset: Vec2::ZERO,
            events: Vec::new(),
            next_id: 1,
        };

        state.rebuild_grid();
        state.spawn_ball(SpawnPolicy::CanvasCenter);
        state.emit(GameEvent::SessionStarted);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Bricks ===

    /// Rebuild the grid from the session config
    pub fn rebuild_grid(&mut self) {
        let GameConfig {
            columns,
            rows,
            durability_min,
            durability_max,
            power_up_chance,
            ..
        } = self.config;
        self.reset_bricks(columns, rows, durability_min..=durability_max, power_up_chance);
    }

    /// Replace the grid with fresh bricks
    ///
    /// Durability is uniform over `durability`; each brick carries a power-up
    /// with probability `power_up_chance`, uniform over the kinds.
    pub fn reset_bricks(
        &mut self,
        columns: u32,
        rows: u32,
        durability: std::ops::RangeInclusive<u8>,
        power_up_chance: f64,
    ) {
        self.bricks.clear();
        self.bricks.reserve((columns * rows) as usize);
        for column in 0..columns {
            for row in 0..rows {
                let durability = self.rng.random_range(durability.clone());
                let power_up = if self.rng.random_bool(power_up_chance.clamp(0.0, 1.0)) {
                    Some(PowerUpKind::random(&mut self.rng))
                } else {
                    None
                };
                self.bricks.push(Brick {
                    column,
                    row,
                    rect: self.layout.brick_rect(column, row),
                    durability,
                    power_up,
                });
            }
        }
    }

    /// Brick at a grid cell
    pub fn brick_at(&self, column: u32, row: u32) -> Option<&Brick> {
        if column >= self.config.columns || row >= self.config.rows {
            return None;
        }
        self.bricks.get((column * self.config.rows + row) as usize)
    }

    pub fn destroyed_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| !b.is_alive()).count()
    }

    /// True iff every brick of the grid has been destroyed
    pub fn all_bricks_cleared(&self) -> bool {
        self.destroyed_bricks() == self.config.brick_count() as usize
    }

    // === Balls ===

    /// Append a ball at the start position with the session-default velocity
    pub fn spawn_ball(&mut self, policy: SpawnPolicy) -> &mut Ball {
        let x = match policy {
            SpawnPolicy::CanvasCenter => self.layout.width / 2.0,
            SpawnPolicy::AbovePaddle => self.paddle.center(),
        };
        let radius = self.layout.ball_radius;
        let pos = Vec2::new(x, self.layout.height - self.layout.paddle_height - radius);
        let vel = Vec2::new(self.layout.ball_speed_x, -self.layout.ball_speed_y);
        let id = self.next_entity_id();
        self.balls.push(Ball {
            id,
            pos,
            vel,
            radius,
            state: BallState::Free,
        });
        let last = self.balls.len() - 1;
        &mut self.balls[last]
    }

    pub fn remove_ball(&mut self, index: usize) -> Option<Ball> {
        (index < self.balls.len()).then(|| self.balls.remove(index))
    }

    /// Release every stuck ball upward, away from the paddle center
    pub fn release_stuck_balls(&mut self) -> usize {
        let (sx, sy) = (self.layout.ball_speed_x, self.layout.ball_speed_y);
        let mut released = 0;
        for ball in self.balls.iter_mut() {
            let BallState::Stuck { offset } = ball.state else {
                continue;
            };
            let dir = if offset < 0.0 { -1.0 } else { 1.0 };
            ball.vel = Vec2::new(sx * dir, -sy);
            ball.state = BallState::Free;
            released += 1;
        }
        released
    }

    /// Center the paddle (after a lost life or a level-up)
    pub fn recenter_paddle(&mut self) {
        self.paddle.x = (self.layout.width - self.paddle.width) / 2.0;
        self.paddle.clamp_to(self.layout.width);
    }

    // === Drops ===

    /// Spawn a falling pickup centered on `center`
    pub fn spawn_drop(&mut self, kind: PowerUpKind, center: Vec2) {
        let id = self.next_entity_id();
        let pos = center - Vec2::new(self.layout.drop_width, self.layout.drop_height) / 2.0;
        self.drops.push(PowerUpDrop {
            id,
            kind,
            pos,
            speed: self.layout.drop_speed,
        });
    }

    pub fn remove_drop(&mut self, index: usize) -> Option<PowerUpDrop> {
        (index < self.drops.len()).then(|| self.drops.remove(index))
    }

    // === Particles ===

    /// Spawn a fixed-size debris burst at `center`
    pub fn spawn_burst(&mut self, center: Vec2) {
        let w = self.layout.width;
        for _ in 0..BURST_PARTICLES {
            let radius = self.rng.random::<f32>() * w * BURST_RADIUS_SPAN_RATIO
                + w * BURST_RADIUS_BASE_RATIO;
            let span = w * BURST_SPEED_SPAN_RATIO;
            let vel = Vec2::new(
                self.rng.random::<f32>() * span - span / 2.0,
                self.rng.random::<f32>() * span - span / 2.0,
            );
            self.push_particle(Particle {
                kind: ParticleKind::Burst,
                pos: center,
                vel,
                radius,
                radius_decay: w * BURST_DECAY_RATIO,
                alpha: BURST_ALPHA,
                alpha_decay: 0.0,
            });
        }
    }

    /// Drop a fading trail dot at `pos`
    pub fn emit_trail(&mut self, pos: Vec2) {
        self.push_particle(Particle {
            kind: ParticleKind::Trail,
            pos,
            vel: Vec2::ZERO,
            radius: self.layout.ball_radius / 2.0,
            radius_decay: TRAIL_RADIUS_DECAY,
            alpha: 1.0,
            alpha_decay: TRAIL_ALPHA_DECAY,
        });
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    pub fn remove_particle(&mut self, index: usize) -> Option<Particle> {
        (index < self.particles.len()).then(|| self.particles.remove(index))
    }

    /// Drop the oldest particles beyond `max`
    pub fn trim_particles(&mut self, max: usize) {
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    // === Lifecycle ===

    /// Arm the screen shake
    pub fn shake(&mut self) {
        self.shake_ticks = (SHAKE_SECONDS * TICK_RATE as f32).round() as u32;
    }

    /// Tear down a finished session: cancel timers and drain collections
    pub(crate) fn shutdown(&mut self) {
        self.power_ups.cancel_all(&mut self.paddle);
        self.balls.clear();
        self.bricks.clear();
        self.drops.clear();
        self.particles.clear();
        self.shake_ticks = 0;
        self.shake_offset = Vec2::ZERO;
    }

    /// Rescale everything for a new canvas size
    ///
    /// Layout constants are recomputed, brick rects rebuilt from their grid
    /// index, and live entities keep their relative position and speed.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        let old_width = self.layout.width;
        let sx = width / old_width;
        let sy = height / self.layout.height;
        self.layout = Layout::new(width, height);
        self.config.canvas_width = width;
        self.config.canvas_height = height;

        for brick in &mut self.bricks {
            brick.rect = self.layout.brick_rect(brick.column, brick.row);
        }

        let scale = Vec2::new(sx, sy);
        for ball in &mut self.balls {
            ball.pos *= scale;
            ball.vel *= scale;
            ball.radius = self.layout.ball_radius;
            if let BallState::Stuck { offset } = &mut ball.state {
                *offset *= sx;
            }
        }
        for drop in &mut self.drops {
            drop.pos *= scale;
            drop.speed = self.layout.drop_speed;
        }
        for particle in &mut self.particles {
            particle.pos *= scale;
            particle.vel *= scale;
        }

        let center_ratio = self.paddle.center() / old_width;
        self.paddle.width = self.layout.paddle_width;
        self.paddle.height = self.layout.paddle_height;
        self.paddle.speed = self.layout.paddle_speed;
        self.power_ups.rescale(&mut self.paddle, self.layout.expand_bonus);
        self.paddle.x = center_ratio * width - self.paddle.width / 2.0;
        self.paddle.clamp_to(width);
        for ball in &mut self.balls {
            ball.follow_paddle(&self.paddle);
        }

        log::debug!("Resized to {:.0}x{:.0}", width, height);
    }
}
