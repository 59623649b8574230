//! Rectangle intersection and minimum translation vectors
//!
//! The overlap test works on the Minkowski difference of the two boxes: the
//! boxes intersect exactly when the difference contains the origin, and the
//! closest edge of the difference gives the shortest way out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// How to separate two intersecting rectangles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Unit vector: the direction the first rectangle must move
    pub normal: Vec2,
    /// Distance to move along `normal` (never negative)
    pub overlap: f32,
}

impl Hit {
    /// Translation that resolves the intersection (normal * overlap)
    #[inline]
    pub fn mtv(&self) -> Vec2 {
        self.normal * self.overlap
    }
}

/// Intersect two rectangles
///
/// Returns `None` when the rectangles are disjoint or merely touching.
/// Otherwise returns the separating normal for `a` and the penetration depth
/// along it. Moving `a` by [`Hit::mtv`] leaves the pair exactly touching.
///
/// When both centers coincide the axis with the smaller combined half-extent
/// is used (X on ties). On an axis where the centers line up, the smaller box
/// moves in the positive direction and the larger one in the negative, so
/// swapping the arguments always flips the normal unless both boxes have the
/// same extent there.
pub fn rectangle_intersect(a: Rect, b: Rect) -> Option<Hit> {
    // Minkowski difference
    let center = b.center() - a.center();
    let center_abs = center.abs();
    let half_size = 0.5 * (a.size + b.size);
    let difference = center_abs - half_size;

    // Difference doesn't contain the origin
    if difference.x.max(difference.y) >= 0.0 {
        return None;
    }

    if center_abs.length_squared() <= f32::EPSILON {
        let hit = if half_size.x.abs() <= half_size.y.abs() {
            Hit {
                normal: Vec2::new(push_direction(0.0, a.size.x, b.size.x), 0.0),
                overlap: half_size.x,
            }
        } else {
            Hit {
                normal: Vec2::new(0.0, push_direction(0.0, a.size.y, b.size.y)),
                overlap: half_size.y,
            }
        };
        return Some(hit);
    }

    // Shallowest axis wins; push `a` away from `b`
    let hit = if difference.x > difference.y {
        Hit {
            normal: Vec2::new(push_direction(center.x, a.size.x, b.size.x), 0.0),
            overlap: difference.x.abs(),
        }
    } else {
        Hit {
            normal: Vec2::new(0.0, push_direction(center.y, a.size.y, b.size.y)),
            overlap: difference.y.abs(),
        }
    };
    Some(hit)
}

/// Sign along one axis for `a`, given `offset` from a's center to b's
#[inline]
fn push_direction(offset: f32, extent_a: f32, extent_b: f32) -> f32 {
    if offset != 0.0 {
        -offset.signum()
    } else if extent_a > extent_b {
        -1.0
    } else {
        1.0
    }
}
