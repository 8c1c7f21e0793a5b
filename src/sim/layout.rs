//! Canvas-relative layout
//!
//! All sizes and speeds derive from the canvas dimensions so the game plays
//! identically at any resolution. Rebuilt whenever the canvas is resized.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Pixel sizes and per-tick speeds for one canvas size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,

    pub ball_radius: f32,
    pub ball_speed_x: f32,
    pub ball_speed_y: f32,
    pub ball_speed_increment: f32,
    pub ball_max_speed: f32,

    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,

    pub drop_width: f32,
    pub drop_height: f32,
    pub drop_speed: f32,
    pub expand_bonus: f32,

    pub shake_intensity: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,

            paddle_width: width * PADDLE_WIDTH_RATIO,
            paddle_height: height * PADDLE_HEIGHT_RATIO,
            paddle_speed: width * PADDLE_SPEED_RATIO,

            ball_radius: width * BALL_RADIUS_RATIO,
            ball_speed_x: width * BALL_SPEED_X_RATIO,
            ball_speed_y: height * BALL_SPEED_Y_RATIO,
            ball_speed_increment: width * BALL_SPEED_INCREMENT_RATIO,
            ball_max_speed: width * BALL_MAX_SPEED_RATIO,

            brick_width: width * BRICK_WIDTH_RATIO,
            brick_height: height * BRICK_HEIGHT_RATIO,
            // Padding scales with width on both axes
            brick_padding: width * BRICK_PADDING_RATIO,
            brick_offset_top: height * BRICK_OFFSET_TOP_RATIO,
            brick_offset_left: width * BRICK_OFFSET_LEFT_RATIO,

            drop_width: width * DROP_WIDTH_RATIO,
            drop_height: height * DROP_HEIGHT_RATIO,
            drop_speed: height * DROP_SPEED_RATIO,
            expand_bonus: width * EXPAND_BONUS_RATIO,

            shake_intensity: width * SHAKE_INTENSITY_RATIO,
        }
    }

    /// Pixel rectangle of the brick at grid cell `(column, row)`
    pub fn brick_rect(&self, column: u32, row: u32) -> Rect {
        Rect::new(
            column as f32 * (self.brick_width + self.brick_padding) + self.brick_offset_left,
            row as f32 * (self.brick_height + self.brick_padding) + self.brick_offset_top,
            self.brick_width,
            self.brick_height,
        )
    }

    /// Top edge of the paddle (the paddle sits on the bottom of the canvas)
    #[inline]
    pub fn paddle_top(&self) -> f32 {
        self.height - self.paddle_height
    }

    /// Vertical line a ball center crosses when it reaches the paddle
    #[inline]
    pub fn paddle_plane(&self) -> f32 {
        self.height - self.ball_radius - self.paddle_height
    }

    /// Right edge of the last brick column
    pub fn grid_right(&self, columns: u32) -> f32 {
        self.brick_rect(columns.saturating_sub(1), 0).right()
    }

    /// Bottom edge of the last brick row
    pub fn grid_bottom(&self, rows: u32) -> f32 {
        self.brick_rect(0, rows.saturating_sub(1)).bottom()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }
}
