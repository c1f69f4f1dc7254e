//! Axis-aligned rectangle value type
//!
//! The engine's overlap test is containment, not intersection: two rects
//! "overlap" when one wholly contains the other ([`coarse_overlap`]). This
//! under-detects partial, non-nesting overlaps and that is intentional; the
//! contact tuning assumes grazing passes are misses.

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// A top-left anchored, axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner as a vector.
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True iff `self` is wholly contained within `other`, all four edges
    /// inclusive.
    pub fn is_inside(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.right() <= other.right()
            && self.y >= other.y
            && self.bottom() <= other.bottom()
    }
}

/// Inclusive scalar range test, used for resting-surface alignment bands.
pub fn is_between(value: f32, lo: f32, hi: f32) -> bool {
    value >= lo && value <= hi
}

/// The engine's overlap test: containment in either direction.
pub fn coarse_overlap(a: &Rect, b: &Rect) -> bool {
    a.is_inside(b) || b.is_inside(a)
}
