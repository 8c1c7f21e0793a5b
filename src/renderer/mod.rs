//! Rendering module
//!
//! Frames are built as plain draw lists (`scene`) and, in the browser,
//! replayed on a 2D canvas (`canvas`).

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;
pub mod scene;

pub use draw::{Color, DrawCmd, Paint, Stroke, TextAlign};
pub use scene::{Scene, build_frame};
