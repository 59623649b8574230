//! Axis-aligned rectangle geometry
//!
//! A rectangle is defined by its minimum (top-left in screen space) corner
//! and its size. Everything else is derived:
//! - max: min + size
//! - center: min + size / 2

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner (smallest x and y)
    pub min: Vec2,
    /// Width and height (never negative)
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Maximum corner (largest x and y)
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + 0.5 * self.size
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        0.5 * self.size
    }

    /// Same rectangle moved by `offset`
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            size: self.size,
        }
    }

    /// Shrink the rectangle by the given amount on each side.
    /// Sizes are clamped at zero.
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(
            self.min + Vec2::new(left, top),
            self.size - Vec2::new(left + right, top + bottom),
        )
    }

    /// Check if a point lies inside the rectangle (edges included)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}
