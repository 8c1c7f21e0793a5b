//! Power-up state machine
//!
//! Timed modifiers go `inactive -> active(expires_at) -> inactive`. Deadlines
//! are simulation ticks checked at the top of every tick, so an expiry can
//! never interleave with a half-finished step. Catching a modifier that is
//! already active re-arms its deadline without stacking its effect.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Paddle, PowerUpKind, SpawnPolicy};

/// An applied paddle-width bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpandEffect {
    pub expires_at: u64,
    /// Width added to the paddle (removed exactly on expiry)
    pub bonus: f32,
}

/// Active timed modifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpState {
    pub expand: Option<ExpandEffect>,
    /// Sticky paddle deadline
    pub sticky_until: Option<u64>,
}

impl PowerUpState {
    pub fn sticky_active(&self) -> bool {
        self.sticky_until.is_some()
    }

    pub fn expand_active(&self) -> bool {
        self.expand.is_some()
    }

    /// Widen the paddle, or push the deadline back if already wide
    ///
    /// Returns true when the width changed.
    pub fn arm_expand(&mut self, paddle: &mut Paddle, bonus: f32, expires_at: u64) -> bool {
        match &mut self.expand {
            Some(effect) => {
                effect.expires_at = expires_at;
                false
            }
            None => {
                paddle.width += bonus;
                self.expand = Some(ExpandEffect { expires_at, bonus });
                true
            }
        }
    }

    pub fn arm_sticky(&mut self, expires_at: u64) {
        self.sticky_until = Some(expires_at);
    }

    /// Revert every modifier whose deadline is at or before `now`
    pub fn expire(&mut self, now: u64, paddle: &mut Paddle) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        if let Some(effect) = self.expand {
            if now >= effect.expires_at {
                paddle.width -= effect.bonus;
                self.expand = None;
                expired.push(PowerUpKind::Expand);
            }
        }
        if let Some(until) = self.sticky_until {
            if now >= until {
                self.sticky_until = None;
                expired.push(PowerUpKind::Sticky);
            }
        }
        expired
    }

    /// Drop every pending reversion, restoring the paddle immediately
    pub fn cancel_all(&mut self, paddle: &mut Paddle) {
        if let Some(effect) = self.expand.take() {
            paddle.width -= effect.bonus;
        }
        self.sticky_until = None;
    }

    /// Re-apply an active width bonus after the paddle was resized to its
    /// base width
    pub fn rescale(&mut self, paddle: &mut Paddle, bonus: f32) {
        if let Some(effect) = &mut self.expand {
            effect.bonus = bonus;
            paddle.width += bonus;
        }
    }
}

impl GameState {
    /// Apply a caught power-up
    ///
    /// Multi-ball is a strict one-shot: with exactly one ball in play two
    /// more spawn above the paddle (heading in opposite directions);
    /// otherwise nothing happens.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) {
        let expires_at = self.time_ticks + self.config.power_up_ticks();
        match kind {
            PowerUpKind::Expand => {
                let bonus = self.layout.expand_bonus;
                if !self.power_ups.arm_expand(&mut self.paddle, bonus, expires_at) {
                    log::debug!("Expand re-armed until tick {}", expires_at);
                }
                self.paddle.clamp_to(self.layout.width);
            }
            PowerUpKind::Sticky => {
                self.power_ups.arm_sticky(expires_at);
            }
            PowerUpKind::MultiBall => {
                if self.balls.len() == 1 {
                    self.spawn_ball(SpawnPolicy::AbovePaddle);
                    let ball = self.spawn_ball(SpawnPolicy::AbovePaddle);
                    ball.vel.x = -ball.vel.x;
                } else {
                    log::debug!("Multi-ball ignored with {} balls in play", self.balls.len());
                }
            }
        }
        log::info!("Power-up {} activated", kind.as_str());
        self.emit(GameEvent::PowerUpCaught(kind));
    }

    /// Revert modifiers whose deadline has passed
    ///
    /// Balls held by the sticky paddle are launched when it wears off.
    pub(crate) fn expire_power_ups(&mut self) {
        let expired = self.power_ups.expire(self.time_ticks, &mut self.paddle);
        for kind in expired {
            if kind == PowerUpKind::Sticky {
                let released = self.release_stuck_balls();
                if released > 0 {
                    log::debug!("Sticky expired, released {} balls", released);
                }
            }
            log::info!("Power-up {} expired", kind.as_str());
            self.emit(GameEvent::PowerUpExpired(kind));
        }
        self.paddle.clamp_to(self.layout.width);
    }
}
