//! Survival Shooter - a top-down touch shooter core
//!
//! Core modules:
//! - `sim`: Encounter simulation (projectiles, pursuers, swept collisions, animation)
//! - `game`: Timer-driven orchestrator that dispatches input and resolves outcomes
//! - `scheduler`: Periodic scheduler interface and single-threaded event loop
//! - `renderer`: Drawable surface boundary
//! - `platform`: Input events, joystick normalisation, navigation
//! - `persistence`: Key-value store boundary
//! - `settings` / `scores`: Typed views over persisted integers

pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod scores;
pub mod settings;
pub mod sim;

pub use game::{Encounter, GameEvent};
pub use scores::ScoreBoard;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Game loop cadence (~60 ticks per second)
    pub const TICK_INTERVAL_MS: u64 = 16;

    /// Player movement step per joystick sample (pixels)
    pub const PLAYER_SPEED: f32 = 20.0;

    /// Projectile speed (pixels per tick)
    pub const PROJECTILE_SPEED: f32 = 50.0;

    /// Pursuer defaults
    pub const PURSUER_SPEED: f32 = 4.0;
    pub const PURSUER_STOP_DISTANCE: f32 = 128.0;
    /// Side length of the pursuer sprite and its hit box
    pub const PURSUER_SIZE: f32 = 128.0;
    /// Pursuers spawn this far past the left or top edge
    pub const PURSUER_SPAWN_OFFSET: f32 = -200.0;

    /// Minimum time between two shots (strictly greater is required)
    pub const FIRE_COOLDOWN_MS: u64 = 500;
    /// Shot animation length before reverting to idle
    pub const SHOT_ANIMATION_MS: u64 = 400;
    /// Reload animation length before the magazine is refilled
    pub const RELOAD_ANIMATION_MS: u64 = 500;
    /// Delay between losing and leaving the encounter
    pub const LOSS_NAVIGATION_DELAY_MS: u64 = 1000;

    /// Joystick sampling while the stick is held
    pub const JOYSTICK_SAMPLE_MS: u64 = 16;
    /// Radius of the joystick base (pixels)
    pub const JOYSTICK_BASE_RADIUS: f32 = 150.0;

    /// Animation cadences
    pub const FRAME_DELAY_MS: u64 = 100;
    pub const RECHARGE_FRAME_DELAY_MS: u64 = 15;

    /// Settings fallbacks
    pub const DEFAULT_ENEMY_COUNT: u32 = 5;
    pub const DEFAULT_BULLET_COUNT: u32 = 5;
}

/// Heading of a vector in degrees, `atan2(y, x)`
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Unit vector for a heading given in degrees
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}
