//! Collision tests for axis-aligned geometry
//!
//! Every hit test in the game reduces to "is the ball's center strictly
//! inside this rectangle" or "would the ball's circle leave the playfield".
//! Edges are exclusive: a center sitting exactly on a boundary is not a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// True iff `(px, py)` lies strictly inside the rectangle
#[inline]
pub fn point_in_rect(px: f32, py: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    px > rx && px < rx + rw && py > ry && py < ry + rh
}

/// An axis-aligned rectangle in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict containment (see [`point_in_rect`])
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        point_in_rect(p.x, p.y, self.x, self.y, self.w, self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Which side wall (if any) a circle centered at `x` would cross
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    Left,
    Right,
}

/// Check a projected horizontal center against `[radius, width - radius]`
#[inline]
pub fn side_wall_hit(projected_x: f32, radius: f32, width: f32) -> Option<WallHit> {
    if projected_x > width - radius {
        Some(WallHit::Right)
    } else if projected_x < radius {
        Some(WallHit::Left)
    } else {
        None
    }
}

/// Check a projected vertical center against the top wall
#[inline]
pub fn top_wall_hit(projected_y: f32, radius: f32) -> bool {
    projected_y < radius
}

/// True iff `x` lies strictly inside the open span `(left, left + width)`
#[inline]
pub fn within_span(x: f32, left: f32, width: f32) -> bool {
    x > left && x < left + width
}
