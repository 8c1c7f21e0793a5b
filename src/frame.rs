//! Per-frame orchestration
//!
//! The host calls [`FrameOrchestrator::frame`] once per display refresh with
//! the elapsed wall time. Simulation runs in fixed ticks from an accumulator;
//! the title menu and end screen live here, outside the simulation.

use crate::config::{ConfigError, GameConfig};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::InputState;
use crate::renderer::{DrawCmd, Scene, build_frame};
use crate::session::{EndReason, Session, SessionSummary};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Longest frame delta fed to the accumulator (tab switches, breakpoints)
const MAX_FRAME_DT: f32 = 0.1;

/// What the orchestrator is showing
pub enum Screen {
    Menu,
    Playing(Session),
    Ended(SessionSummary),
}

/// Result of one frame
#[derive(Debug, Default)]
pub struct FrameOutput {
    /// Simulation events raised during this frame's ticks
    pub events: Vec<GameEvent>,
    /// Ticks run this frame
    pub ticks: u32,
    /// Set on the frame a session finished
    pub ended: Option<SessionSummary>,
}

pub struct FrameOrchestrator {
    config: GameConfig,
    settings: Settings,
    screen: Screen,
    input: InputState,
    accumulator: f32,
    fps: f32,
}

impl FrameOrchestrator {
    /// Validate the config up front; sessions started later reuse it
    pub fn new(config: GameConfig, settings: Settings) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            settings,
            screen: Screen::Menu,
            input: InputState::default(),
            accumulator: 0.0,
            fps: 0.0,
        })
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.config.canvas_width, self.config.canvas_height)
    }

    /// Smoothed frames per second
    pub fn fps(&self) -> u32 {
        self.fps.round() as u32
    }

    /// Advance by `dt` seconds of wall time
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }

        let mut out = FrameOutput::default();

        let finished = match &mut self.screen {
            Screen::Menu | Screen::Ended(_) => {
                if self.input.pressed() {
                    self.input.clear_one_shots();
                    self.start_session();
                }
                None
            }
            Screen::Playing(session) => {
                self.accumulator += dt;
                while self.accumulator >= SIM_DT && out.ticks < MAX_SUBSTEPS {
                    session.tick(&self.input.sample());
                    self.accumulator -= SIM_DT;
                    out.ticks += 1;

                    // Clear one-shot inputs after processing
                    self.input.clear_one_shots();

                    if session.is_over() {
                        break;
                    }
                }
                if out.ticks == MAX_SUBSTEPS {
                    // Drop the backlog instead of catching up forever
                    self.accumulator = self.accumulator.min(SIM_DT);
                }

                let state = session.state_mut();
                state.trim_particles(self.settings.max_particles());
                out.events = state.drain_events();
                session.outcome()
            }
        };

        if let Some(reason) = finished {
            if let Screen::Playing(session) = std::mem::replace(&mut self.screen, Screen::Menu) {
                let summary = session.end(reason);
                out.ended = Some(summary.clone());
                self.screen = Screen::Ended(summary);
            }
        }

        out
    }

    fn start_session(&mut self) {
        match Session::start(self.config.clone()) {
            Ok(session) => {
                self.accumulator = 0.0;
                self.screen = Screen::Playing(session);
            }
            Err(e) => log::error!("Failed to start session: {}", e),
        }
    }

    /// Quit the running session, if any, and return to the menu
    pub fn quit(&mut self) -> Option<SessionSummary> {
        match std::mem::replace(&mut self.screen, Screen::Menu) {
            Screen::Playing(session) => Some(session.end(EndReason::PlayerQuit)),
            Screen::Ended(summary) => {
                self.screen = Screen::Ended(summary);
                None
            }
            Screen::Menu => None,
        }
    }

    /// Canvas was resized
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let sx = width / self.config.canvas_width;
        self.input.rescale(sx);
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        if let Screen::Playing(session) = &mut self.screen {
            session.state_mut().resize(width, height);
        }
    }

    /// Draw list for the current screen
    pub fn render(&self) -> Vec<DrawCmd> {
        let (w, h) = self.canvas_size();
        let fps = Some(self.fps());
        match &self.screen {
            Screen::Menu => build_frame(&Scene::Menu, w, h, &self.settings, fps),
            Screen::Playing(session) => {
                build_frame(&Scene::Playing(session.state()), w, h, &self.settings, fps)
            }
            Screen::Ended(summary) => build_frame(&Scene::Ended(summary), w, h, &self.settings, fps),
        }
    }
}
