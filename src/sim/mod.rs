//! Encounter simulation module
//!
//! Gameplay logic lives here:
//! - One tick per call, no wall clock
//! - Seeded RNG only
//! - Timers reached only through the `Scheduler` trait
//! - Drawing only through the `Surface` trait

pub mod animation;
pub mod collision;
pub mod player;
pub mod projectile;
pub mod pursuer;
pub mod state;
pub mod tick;

pub use animation::{AnimationKind, Animator, FrameStep};
pub use collision::{HitBox, projectile_hits_box, segments_intersect};
pub use player::{Facing, Player};
pub use projectile::Projectile;
pub use pursuer::{Pursuer, Pursuit};
pub use state::{
    EncounterConfig, EncounterPhase, EncounterState, FireRejection, Magazine, Outcome,
};
pub use tick::{TickReport, tick};
