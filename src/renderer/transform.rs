//! Sprite placement transforms
//!
//! All sprites are positioned by their centre except pursuer hit boxes,
//! which are anchored top-left in the simulation but drawn centred.

use glam::{Affine2, Vec2};

use crate::sim::Facing;

/// Projectile sprite: centre, rotate to `heading + 90°`, then move to `pos`
///
/// The sprite art points up, so a quarter turn aligns it with heading 0 (right).
pub fn projectile_transform(pos: Vec2, heading_degrees: f32, size: Vec2) -> Affine2 {
    Affine2::from_translation(pos)
        * Affine2::from_angle((heading_degrees + 90.0).to_radians())
        * Affine2::from_translation(-size / 2.0)
}

/// Player sprite: optional horizontal mirror, then centre on `pos`
pub fn player_transform(pos: Vec2, facing: Facing, size: Vec2) -> Affine2 {
    let centred = Affine2::from_translation(pos) * Affine2::from_translation(-size / 2.0);
    match facing {
        Facing::Right => centred,
        Facing::Left => {
            centred
                * Affine2::from_translation(Vec2::new(size.x, 0.0))
                * Affine2::from_scale(Vec2::new(-1.0, 1.0))
        }
    }
}

/// Pursuer sprite centred on `pos`
pub fn pursuer_transform(pos: Vec2, size: Vec2) -> Affine2 {
    Affine2::from_translation(pos - size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_projectile_centre_lands_on_position() {
        let size = Vec2::new(16.0, 32.0);
        let t = projectile_transform(Vec2::new(200.0, 300.0), 37.0, size);
        assert!(close(t.transform_point2(size / 2.0), Vec2::new(200.0, 300.0)));
    }

    #[test]
    fn test_projectile_rotates_before_translating() {
        // Heading 0 (right): the sprite's "up" (-y) must point along +x
        let size = Vec2::new(16.0, 32.0);
        let t = projectile_transform(Vec2::new(50.0, 50.0), 0.0, size);
        let tip = t.transform_point2(Vec2::new(8.0, 0.0));
        assert!(close(tip, Vec2::new(66.0, 50.0)), "tip was {tip:?}");
    }

    #[test]
    fn test_player_mirror_keeps_centre() {
        let size = Vec2::new(128.0, 128.0);
        let pos = Vec2::new(400.0, 500.0);
        let left = player_transform(pos, Facing::Left, size);
        let right = player_transform(pos, Facing::Right, size);

        assert!(close(left.transform_point2(size / 2.0), pos));
        assert!(close(right.transform_point2(Vec2::ZERO), Vec2::new(336.0, 436.0)));
        // Mirrored: the sprite's left edge ends up on the right
        assert!(close(left.transform_point2(Vec2::ZERO), Vec2::new(464.0, 436.0)));
    }

    #[test]
    fn test_pursuer_is_centred() {
        let t = pursuer_transform(Vec2::new(100.0, 100.0), Vec2::splat(128.0));
        assert!(close(t.transform_point2(Vec2::ZERO), Vec2::new(36.0, 36.0)));
    }
}
