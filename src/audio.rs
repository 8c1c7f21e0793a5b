//! Audio system using Web Audio API
//!
//! Procedurally generated square-wave tones - no external files needed.
//! Which tone a game event plays is decided here on every platform; only the
//! [`AudioManager`] that actually makes noise is browser-only.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a brick (broken or not)
    BrickHit,
    /// Power-up caught
    PowerUp,
    /// Out of lives
    GameOver,
    /// One beat of the looping background drone
    Background,
}

/// A single enveloped tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Pitch reached at the end of the tone (equal to `frequency` when flat)
    pub end_frequency: f32,
    /// Seconds until the gain has decayed to silence
    pub duration: f64,
    /// Starting gain before volume scaling
    pub gain: f32,
}

impl SoundEffect {
    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::PaddleHit => Tone {
                frequency: 300.0,
                end_frequency: 300.0,
                duration: 0.1,
                gain: 1.0,
            },
            SoundEffect::BrickHit => Tone {
                frequency: 500.0,
                end_frequency: 500.0,
                duration: 0.1,
                gain: 1.0,
            },
            SoundEffect::PowerUp => Tone {
                frequency: 1000.0,
                end_frequency: 1000.0,
                duration: 0.5,
                gain: 1.0,
            },
            SoundEffect::GameOver => Tone {
                frequency: 400.0,
                end_frequency: 100.0,
                duration: 0.8,
                gain: 1.0,
            },
            SoundEffect::Background => Tone {
                frequency: 200.0,
                end_frequency: 200.0,
                duration: 2.0,
                gain: 0.3,
            },
        }
    }

    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BrickHit { .. } => Some(SoundEffect::BrickHit),
            GameEvent::PowerUpCaught(_) => Some(SoundEffect::PowerUp),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Whether an event starts or stops the background loop
pub fn background_change(event: &GameEvent) -> Option<bool> {
    match event {
        GameEvent::SessionStarted => Some(true),
        GameEvent::GameOver | GameEvent::SessionCompleted { .. } => Some(false),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        /// Context time at which the current background beat ends
        background_until: Option<f64>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let mut manager = Self {
                ctx,
                sfx_volume: 0.0,
                music_volume: 0.0,
                muted: false,
                background_until: None,
            };
            manager.apply_settings(settings);
            manager
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = if self.muted { 0.0 } else { self.sfx_volume };
            self.play_tone(effect.tone(), vol);
        }

        /// Start or stop the looping background drone
        pub fn set_background(&mut self, playing: bool) {
            if playing {
                if self.background_until.is_none() {
                    self.background_until = Some(0.0);
                    self.update_background();
                }
            } else {
                self.background_until = None;
            }
        }

        /// Queue the next background beat once the previous one has ended
        pub fn update_background(&mut self) {
            let Some(until) = self.background_until else { return };
            let Some(ctx) = &self.ctx else { return };
            let now = ctx.current_time();
            if now < until {
                return;
            }
            let tone = SoundEffect::Background.tone();
            let vol = if self.muted { 0.0 } else { self.music_volume };
            self.play_tone(tone, vol);
            self.background_until = Some(now + tone.duration);
        }

        fn play_tone(&self, tone: Tone, vol: f32) {
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = self.create_osc(ctx, tone.frequency, OscillatorType::Square)
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * tone.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + tone.duration)
                .ok();
            if tone.end_frequency != tone.frequency {
                osc.frequency().set_value_at_time(tone.frequency, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.end_frequency, t + tone.duration)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }
}
