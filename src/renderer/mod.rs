//! Drawable surface boundary
//!
//! The simulation never talks to a graphics API. Each tick it clears a
//! `Surface`, issues one `draw` per visible entity and presents the frame.
//! Sprite placement is expressed as a `glam::Affine2` built in `transform`.

pub mod transform;

use glam::{Affine2, Vec2};

use crate::sim::AnimationKind;

pub use transform::{player_transform, projectile_transform, pursuer_transform};

/// Sprite sheets known to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    /// One sheet per player animation, frames laid out in a single row
    Player(AnimationKind),
    Pursuer,
    Projectile,
}

/// Default frame size for each sheet (pixels)
pub fn default_sprite_size(sprite: SpriteId) -> Vec2 {
    match sprite {
        SpriteId::Player(_) => Vec2::new(128.0, 128.0),
        SpriteId::Pursuer => Vec2::splat(crate::consts::PURSUER_SIZE),
        SpriteId::Projectile => Vec2::new(16.0, 32.0),
    }
}

/// A single frame within a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub sprite: SpriteId,
    pub frame: usize,
}

impl SpriteFrame {
    pub fn new(sprite: SpriteId, frame: usize) -> Self {
        Self { sprite, frame }
    }

    /// Single-frame sheets
    pub fn still(sprite: SpriteId) -> Self {
        Self { sprite, frame: 0 }
    }
}

/// Anything the game can draw onto
pub trait Surface {
    /// Erase the previous frame
    fn clear(&mut self);

    /// Draw a sprite frame; `transform` maps sprite-local pixels to screen pixels
    fn draw(&mut self, frame: SpriteFrame, transform: Affine2);

    /// Hand the finished frame to the display
    fn present(&mut self) {}

    /// Frame size for a sheet
    fn sprite_size(&self, sprite: SpriteId) -> Vec2 {
        default_sprite_size(sprite)
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub frame: SpriteFrame,
    pub transform: Affine2,
}

/// Surface that keeps the draw calls of the frame in progress
///
/// Used by tests and by the headless binary.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of draws of a given kind in the last presented frame
    pub fn count(&self, matches: impl Fn(SpriteId) -> bool) -> usize {
        self.last_frame
            .iter()
            .filter(|c| matches(c.frame.sprite))
            .count()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, frame: SpriteFrame, transform: Affine2) {
        self.commands.push(DrawCommand { frame, transform });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.commands);
        self.frames_presented += 1;
    }
}
