//! Session lifecycle
//!
//! A session is one play-through: it starts from a validated config and ends
//! with a summary, either because the host quit or because the simulation
//! reached a terminal phase.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::sim::{GamePhase, GameState, TickInput, tick};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    PlayerQuit,
    OutOfLives,
    Completed,
}

/// What a finished session reports to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub seed: u64,
    pub level: u32,
    pub lives: u32,
    /// Simulation ticks played (paused time excluded)
    pub ticks: u64,
    /// Bricks destroyed across every level
    pub bricks_destroyed: u64,
}

/// A running session
pub struct Session {
    state: GameState,
}

impl Session {
    /// Validate the config and set up level 1
    pub fn start(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        for warning in config.warnings() {
            log::warn!("Config: {}", warning);
        }

        let state = GameState::new(&config);
        log::info!(
            "Session started: {}x{} grid, {} lives, seed {}",
            config.columns,
            config.rows,
            config.initial_lives,
            state.seed
        );
        Ok(Self { state })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Advance one fixed tick
    pub fn tick(&mut self, input: &TickInput) {
        tick(&mut self.state, input);
    }

    /// Reason the simulation finished on its own, if it has
    pub fn outcome(&self) -> Option<EndReason> {
        match self.state.phase {
            GamePhase::GameOver => Some(EndReason::OutOfLives),
            GamePhase::Completed => Some(EndReason::Completed),
            GamePhase::Playing | GamePhase::Paused => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state.phase.is_terminal()
    }

    /// Summary of the session so far
    pub fn summary(&self, reason: EndReason) -> SessionSummary {
        SessionSummary {
            reason,
            seed: self.state.seed,
            level: self.state.level,
            lives: self.state.lives,
            ticks: self.state.time_ticks,
            bricks_destroyed: self.state.bricks_destroyed,
        }
    }

    /// Tear the session down and report how it went
    ///
    /// A session that already finished keeps its own reason; `reason` only
    /// applies to sessions still in play.
    pub fn end(mut self, reason: EndReason) -> SessionSummary {
        let reason = self.outcome().unwrap_or(reason);
        self.state.shutdown();
        let summary = self.summary(reason);
        log::info!(
            "Session ended ({:?}) on level {} after {} ticks, {} bricks destroyed",
            summary.reason,
            summary.level,
            summary.ticks,
            summary.bricks_destroyed
        );
        summary
    }
}
