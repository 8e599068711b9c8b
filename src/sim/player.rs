//! The player-controlled entity

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use super::animation::Animator;
use crate::consts::PLAYER_SPEED;
use crate::heading_vector;
use crate::renderer::player_transform;

/// Horizontal facing, used to mirror the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player
#[derive(Debug, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    pub facing: Facing,
    alive: bool,
    #[serde(skip)]
    pub animator: Animator,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            speed: PLAYER_SPEED,
            facing: Facing::Right,
            alive: true,
            animator: Animator::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Caught by a pursuer; movement input is ignored from now on
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Take one movement step along `heading` (degrees), staying inside `bounds`
    pub fn step(&mut self, heading: f32, bounds: Vec2) {
        let delta = self.speed * heading_vector(heading);
        self.pos = (self.pos + delta).clamp(Vec2::ZERO, bounds);

        if delta.x > 0.0 {
            self.facing = Facing::Right;
        } else if delta.x < 0.0 {
            self.facing = Facing::Left;
        }
    }

    /// Sprite transform for a frame of the given size
    pub fn draw_transform(&self, size: Vec2) -> Affine2 {
        player_transform(self.pos, self.facing, size)
    }
}
