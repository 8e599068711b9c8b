//! Player-fired projectiles

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::projectile_hits_box;
use super::pursuer::Pursuer;
use crate::consts::PROJECTILE_SPEED;
use crate::heading_vector;
use crate::renderer::projectile_transform;

/// A projectile travelling in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Firing angle in degrees (0 = right, 90 = down in screen space)
    heading: f32,
    speed: f32,
    /// Unit direction, fixed at creation
    dir: Vec2,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, heading: f32) -> Self {
        Self::with_speed(id, pos, heading, PROJECTILE_SPEED)
    }

    pub fn with_speed(id: u32, pos: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            heading,
            speed,
            dir: heading_vector(heading),
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Move one tick along the heading
    pub fn advance(&mut self) {
        self.pos += self.speed * self.dir;
    }

    /// Position one tick ago
    pub fn previous_position(&self) -> Vec2 {
        self.pos - self.speed * self.dir
    }

    /// Left the playable area on either axis
    pub fn is_out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.x > width || self.pos.y > height || self.pos.x < 0.0 || self.pos.y < 0.0
    }

    /// Swept test of the last tick's travel against the pursuer's box
    pub fn test_hit(&self, pursuer: &Pursuer) -> bool {
        let hit_box = pursuer.hit_box();
        projectile_hits_box(self.previous_position(), self.pos, hit_box.min, hit_box.max)
    }

    /// Sprite transform for a sprite of the given size
    pub fn draw_transform(&self, size: Vec2) -> Affine2 {
        projectile_transform(self.pos, self.heading, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advance_along_heading() {
        let mut p = Projectile::new(1, Vec2::new(100.0, 100.0), 0.0);
        p.advance();
        assert!((p.pos - Vec2::new(150.0, 100.0)).length() < 1e-4);

        let mut p = Projectile::new(2, Vec2::new(100.0, 100.0), 90.0);
        p.advance();
        assert!((p.pos - Vec2::new(100.0, 150.0)).length() < 1e-4);
    }

    #[test]
    fn test_out_of_bounds() {
        let width = 800.0;
        let height = 600.0;
        assert!(!Projectile::new(1, Vec2::new(0.0, 0.0), 0.0).is_out_of_bounds(width, height));
        assert!(!Projectile::new(1, Vec2::new(800.0, 600.0), 0.0).is_out_of_bounds(width, height));
        assert!(Projectile::new(1, Vec2::new(-0.5, 10.0), 0.0).is_out_of_bounds(width, height));
        assert!(Projectile::new(1, Vec2::new(10.0, -0.5), 0.0).is_out_of_bounds(width, height));
        assert!(Projectile::new(1, Vec2::new(800.5, 10.0), 0.0).is_out_of_bounds(width, height));
        assert!(Projectile::new(1, Vec2::new(10.0, 600.5), 0.0).is_out_of_bounds(width, height));
    }

    #[test]
    fn test_hit_uses_swept_path() {
        // Box spans x 100..228; the projectile jumps from 80 to 130 in one tick
        let pursuer = Pursuer::new(7, Vec2::new(100.0, 100.0));
        let mut p = Projectile::new(1, Vec2::new(80.0, 150.0), 0.0);
        assert!(!p.test_hit(&pursuer));
        p.advance();
        assert!(p.test_hit(&pursuer));
    }

    #[test]
    fn test_fast_projectile_does_not_tunnel() {
        // 300px per tick skips over the whole 128px box
        let pursuer = Pursuer::new(7, Vec2::new(100.0, 100.0));
        let mut p = Projectile::with_speed(1, Vec2::new(0.0, 150.0), 0.0, 300.0);
        p.advance();
        assert!(p.pos.x > 228.0);
        assert!(p.test_hit(&pursuer));
    }

    #[test]
    fn test_parallel_pass_misses() {
        let pursuer = Pursuer::new(7, Vec2::new(100.0, 100.0));
        let mut p = Projectile::new(1, Vec2::new(80.0, 90.0), 0.0);
        for _ in 0..5 {
            p.advance();
            assert!(!p.test_hit(&pursuer));
        }
    }

    proptest! {
        #[test]
        fn prop_displacement_has_constant_magnitude(
            heading in -720.0f32..720.0,
            x in 0.0f32..1000.0,
            y in 0.0f32..1000.0,
        ) {
            let mut p = Projectile::new(1, Vec2::new(x, y), heading);
            for _ in 0..3 {
                let before = p.pos;
                p.advance();
                let step = (p.pos - before).length();
                prop_assert!((step - PROJECTILE_SPEED).abs() < 1e-2, "step was {}", step);
            }
        }
    }
}
