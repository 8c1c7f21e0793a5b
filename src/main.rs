//! Brick Breaker entry point
//!
//! The browser build wires DOM events and the animation frame loop to the
//! frame orchestrator. The native build runs a headless autopilot session
//! and prints its summary as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use brick_breaker::audio::{AudioManager, SoundEffect, background_change};
    use brick_breaker::consts::SIM_DT;
    use brick_breaker::platform::canvas_x;
    use brick_breaker::renderer::canvas::replay;
    use brick_breaker::sim::GamePhase;
    use brick_breaker::{FrameOrchestrator, GameConfig, QualityPreset, Screen, Settings, fit_canvas};

    /// Game instance holding all state
    struct Game {
        orch: FrameOrchestrator,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks and forward events to audio
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let out = self.orch.frame(dt);
            for event in &out.events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                if let Some(playing) = background_change(event) {
                    self.audio.set_background(playing);
                }
            }
            self.audio.update_background();

            if let Some(summary) = out.ended {
                log::info!(
                    "Finished on level {} with {} bricks destroyed",
                    summary.level,
                    summary.bricks_destroyed
                );
            }
        }

        /// Render the current frame
        fn render(&self) {
            let (w, h) = self.orch.canvas_size();
            replay(&self.ctx, w as f64, h as f64, &self.orch.render());
        }

        /// Size the canvas to the window, keeping the 4:3 aspect
        fn fit_to_window(&mut self) {
            let Some((w, h)) = viewport_canvas_size() else {
                return;
            };
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
            self.orch.resize(w, h);
        }

        fn pointer_to_canvas(&self, client_x: i32) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            canvas_x(
                client_x as f32,
                rect.left() as f32,
                rect.width() as f32,
                self.canvas.width() as f32,
            )
        }

        /// Step to the next quality preset
        fn cycle_quality(&mut self) {
            let mut settings = self.orch.settings().clone();
            settings.apply_preset(settings.quality.next());
            self.audio.apply_settings(&settings);
            log::info!("Quality: {}", settings.quality.as_str());
            self.orch.set_settings(settings);
        }

        fn is_playing(&self) -> bool {
            matches!(
                self.orch.screen(),
                Screen::Playing(session) if session.state().phase == GamePhase::Playing
            )
        }
    }

    /// Settings from the canvas `data-settings` (JSON) and `data-quality` attributes
    fn settings_from_canvas(canvas: &HtmlCanvasElement) -> Settings {
        let mut settings = match canvas.get_attribute("data-settings") {
            Some(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring data-settings: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        };
        if let Some(name) = canvas.get_attribute("data-quality") {
            match QualityPreset::parse(&name) {
                Some(preset) => settings.apply_preset(preset),
                None => log::warn!("Unknown quality preset '{}'", name),
            }
        }
        settings
    }

    fn viewport_canvas_size() -> Option<(f32, f32)> {
        let window = web_sys::window()?;
        let vw = window.inner_width().ok()?.as_f64()? as f32;
        let vh = window.inner_height().ok()?.as_f64()? as f32;
        let (w, h) = fit_canvas(vw, vh);
        Some((w.round().max(1.0), h.round().max(1.0)))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Brick Breaker starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let (width, height) = viewport_canvas_size().ok_or("no viewport size")?;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let config = GameConfig {
            canvas_width: width,
            canvas_height: height,
            ..Default::default()
        };
        let settings = settings_from_canvas(&canvas);
        let orch = FrameOrchestrator::new(config, settings.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            orch,
            audio: AudioManager::new(&settings),
            canvas: canvas.clone(),
            ctx,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone())?;
        setup_window_handlers(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Brick Breaker running ({}x{})", width, height);
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.pointer_to_canvas(event.client_x());
                g.orch.input_mut().pointer_moved(x);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse click (start / restart / launch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.orch.input_mut().press();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start (tap + position)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    let x = g.pointer_to_canvas(touch.client_x());
                    g.orch.input_mut().pointer_moved(x);
                }
                g.orch.input_mut().press();
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.pointer_to_canvas(touch.client_x());
                    g.orch.input_mut().pointer_moved(x);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let window = web_sys::window().ok_or("no window")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if matches!(key.as_str(), "q" | "Q") {
                    g.cycle_quality();
                    return;
                }
                if g.orch.input_mut().key_down(&key) {
                    // Keep space/arrows from scrolling the page
                    event.prevent_default();
                    g.audio.resume();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().orch.input_mut().key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keep the canvas fitted to the viewport
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_to_window();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside): drop held keys and pause
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.orch.input_mut().release_all();
                if g.orch.settings().mute_on_blur {
                    g.audio.set_muted(true);
                }
                if g.is_playing() {
                    g.orch.input_mut().request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Focus: undo mute-on-blur
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.orch.settings().mute_on_blur {
                    g.audio.set_muted(false);
                }
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use brick_breaker::consts::TICK_RATE;
    use brick_breaker::sim::{GameState, TickInput};
    use brick_breaker::{EndReason, GameConfig, Session, SessionSummary};

    /// Give up after this many simulated minutes
    const DEMO_MINUTES: u64 = 10;

    /// Paddle target for the autopilot: the lowest ball heading down
    fn autopilot(state: &GameState) -> TickInput {
        let target = state
            .balls
            .iter()
            .filter(|b| b.vel.y >= 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .or_else(|| state.balls.first())
            .map(|b| b.pos.x);
        TickInput {
            pointer_x: target,
            launch: true,
            ..Default::default()
        }
    }

    pub fn run(config_path: Option<String>) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading config from {}", path);
                GameConfig::from_json(&std::fs::read_to_string(path)?)?
            }
            None => GameConfig::default(),
        };

        let mut session = Session::start(config)?;
        let limit = DEMO_MINUTES * 60 * TICK_RATE as u64;
        while !session.is_over() && session.state().time_ticks < limit {
            let input = autopilot(session.state());
            session.tick(&input);
            for event in session.state_mut().drain_events() {
                log::debug!("{:?}", event);
            }
        }

        Ok(session.end(EndReason::PlayerQuit))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Breaker (native) starting headless demo...");
    log::info!("Build for wasm32 and host a page with a <canvas id=\"canvas\"> to play");

    match demo::run(std::env::args().nth(1)) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize summary: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            log::error!("Demo failed: {}", e);
            std::process::exit(1);
        }
    }
}
