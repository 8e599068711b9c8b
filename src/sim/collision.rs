//! Swept collision detection between projectiles and pursuer boxes
//!
//! Projectiles move 50px per tick, far more than a single point test can
//! safely sample. Each tick the projectile's travel segment is intersected
//! with the four edges of the target's axis-aligned box instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned hit box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl HitBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square box of side `size` anchored at `pos` as its top-left corner
    pub fn from_top_left(pos: Vec2, size: f32) -> Self {
        Self {
            min: pos,
            max: pos + Vec2::splat(size),
        }
    }

    /// Left, right, top and bottom edges, in that order
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let (min, max) = (self.min, self.max);
        [
            (min, Vec2::new(min.x, max.y)),
            (Vec2::new(max.x, min.y), max),
            (min, Vec2::new(max.x, min.y)),
            (Vec2::new(min.x, max.y), max),
        ]
    }
}

/// Check whether segment `p1 -> p2` intersects segment `q1 -> q2`
///
/// Parametric determinant form. Parallel segments (determinant exactly zero)
/// never intersect, even when collinear and overlapping.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let den = (p1.x - p2.x) * (q1.y - q2.y) - (p1.y - p2.y) * (q1.x - q2.x);

    if den == 0.0 {
        return false;
    }

    let t1 = ((p1.x - q1.x) * (q1.y - q2.y) - (p1.y - q1.y) * (q1.x - q2.x)) / den;
    let t2 = ((p1.x - q1.x) * (p1.y - p2.y) - (p1.y - q1.y) * (p1.x - p2.x)) / den;

    (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2)
}

/// Check whether a projectile travelling `prev -> curr` crosses any edge of the box
pub fn projectile_hits_box(prev: Vec2, curr: Vec2, box_min: Vec2, box_max: Vec2) -> bool {
    HitBox::new(box_min, box_max)
        .edges()
        .iter()
        .any(|&(a, b)| segments_intersect(prev, curr, a, b))
}
