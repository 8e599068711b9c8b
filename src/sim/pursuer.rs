//! Hostile pursuers that steer toward the player

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::HitBox;
use crate::consts::{PURSUER_SIZE, PURSUER_SPEED, PURSUER_STOP_DISTANCE};
use crate::renderer::pursuer_transform;

/// Result of one pursuit step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pursuit {
    /// Moved toward the target
    Advanced,
    /// Reached the target this step (the one-way transition to killed)
    Caught,
    /// Already reached the target earlier; holding position
    Attacking,
}

/// A pursuer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub id: u32,
    /// Top-left corner of the hit box
    pub pos: Vec2,
    /// Half the sprite size
    pub radius: f32,
    speed: f32,
    stop_distance: f32,
    /// Reached the player; never moves again
    killed: bool,
}

impl Pursuer {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: PURSUER_SIZE / 2.0,
            speed: PURSUER_SPEED,
            stop_distance: PURSUER_STOP_DISTANCE,
            killed: false,
        }
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Box used for projectile hits, anchored at `pos`
    pub fn hit_box(&self) -> HitBox {
        HitBox::from_top_left(self.pos, self.radius * 2.0)
    }

    /// Step toward `target`, or latch into the killed state once within the stop distance
    ///
    /// Moving requires `distance > stop_distance`; a pursuer exactly at the
    /// stop distance does not move. Because the stop distance is never negative,
    /// the normalising division only happens for a non-zero distance.
    pub fn pursue(&mut self, target: Vec2) -> Pursuit {
        let delta = target - self.pos;
        let distance = delta.length();

        if distance > self.stop_distance && !self.killed {
            self.pos += delta / distance * self.speed;
            return Pursuit::Advanced;
        }

        if self.killed {
            Pursuit::Attacking
        } else {
            self.killed = true;
            Pursuit::Caught
        }
    }

    /// Sprite transform (drawn centred on `pos`)
    pub fn draw_transform(&self, size: Vec2) -> Affine2 {
        pursuer_transform(self.pos, size)
    }
}
