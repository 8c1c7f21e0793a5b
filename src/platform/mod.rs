//! Platform abstraction layer
//!
//! Turns host events (pointer, touch, keyboard) into simulation input.
//! Canvas sizing lives in [`crate::fit_canvas`].

pub mod input;

pub use input::{InputState, Key, canvas_x};
