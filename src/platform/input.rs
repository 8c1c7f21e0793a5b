//! Input sampling
//!
//! Host event handlers write into an [`InputState`]; the frame orchestrator
//! samples it once per tick. Held keys persist until released, while launch
//! and pause are one-shot presses cleared after a tick consumes them.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Launch,
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "Right" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" | "Enter" => Some(Key::Launch),
            "p" | "P" | "Escape" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Convert a client-space x coordinate to canvas pixels
///
/// Accounts for the canvas being displayed at a different CSS size than its
/// backing store.
pub fn canvas_x(client_x: f32, rect_left: f32, rect_width: f32, canvas_width: f32) -> f32 {
    if rect_width <= 0.0 {
        return client_x - rect_left;
    }
    (client_x - rect_left) * canvas_width / rect_width
}

/// Input gathered between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last pointer/touch x in canvas pixels
    pointer_x: Option<f32>,
    left: bool,
    right: bool,
    launch: bool,
    pause: bool,
}

impl InputState {
    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    /// Click or tap
    pub fn press(&mut self) {
        self.launch = true;
    }

    /// Returns true when the key is one the game handles
    pub fn key_down(&mut self, key: &str) -> bool {
        match Key::from_dom(key) {
            Some(Key::Left) => self.left = true,
            Some(Key::Right) => self.right = true,
            Some(Key::Launch) => self.launch = true,
            Some(Key::Pause) => self.pause = true,
            None => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) {
        match Key::from_dom(key) {
            Some(Key::Left) => self.left = false,
            Some(Key::Right) => self.right = false,
            _ => {}
        }
    }

    /// Release held keys (window lost focus)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Request a pause toggle from outside the keyboard (tab hidden)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    pub fn pressed(&self) -> bool {
        self.launch
    }

    /// Snapshot for one simulation tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            pointer_x: self.pointer_x,
            left: self.left,
            right: self.right,
            launch: self.launch,
            pause: self.pause,
        }
    }

    /// Clear one-shot inputs after processing
    pub fn clear_one_shots(&mut self) {
        self.launch = false;
        self.pause = false;
    }

    /// Rescale the remembered pointer after a canvas resize
    pub fn rescale(&mut self, sx: f32) {
        if let Some(x) = &mut self.pointer_x {
            *x *= sx;
        }
    }
}
