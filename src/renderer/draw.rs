//! Canvas-neutral draw commands
//!
//! The scene builder emits these; the browser shell replays them on a 2D
//! context.

use glam::Vec2;

use crate::sim::Rect;

/// Linear RGBA, each channel 0.0 - 1.0
pub type Color = [f32; 4];

/// Opaque color from a `0xRRGGBB` literal
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for a color
pub fn css(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// How a shape is filled
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Two-stop gradient along a line
    Linear { from: Vec2, to: Vec2, stops: [Color; 2] },
    /// Two-stop gradient from the center out to `radius`
    Radial { center: Vec2, radius: f32, stops: [Color; 2] },
}

impl Paint {
    /// Flat approximation (first stop) for low quality
    pub fn flattened(&self) -> Paint {
        match self {
            Paint::Solid(c) => Paint::Solid(*c),
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => Paint::Solid(stops[0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole canvas
    Clear(Color),
    /// Translate everything until the matching `PopOffset`
    PushOffset(Vec2),
    PopOffset,
    RoundRect {
        rect: Rect,
        radius: f32,
        paint: Paint,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
        stroke: Option<Stroke>,
    },
    Text {
        text: String,
        pos: Vec2,
        /// Font size in pixels
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_and_css() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(css(rgb(0x0095dd)), "rgba(0,149,221,1)");
        assert_eq!(css(with_alpha(rgb(0xff0000), 0.5)), "rgba(255,0,0,0.5)");
    }

    #[test]
    fn test_flattened_uses_first_stop() {
        let paint = Paint::Radial {
            center: Vec2::ZERO,
            radius: 4.0,
            stops: [rgb(0xffffff), rgb(0x0095dd)],
        };
        assert_eq!(paint.flattened(), Paint::Solid(rgb(0xffffff)));
    }
}
