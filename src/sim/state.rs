//! Encounter state and session counters
//!
//! Everything that belongs to one encounter lives here and is rebuilt from
//! scratch when a new encounter starts.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::projectile::Projectile;
use super::pursuer::Pursuer;
use crate::consts::*;
use crate::heading_degrees;

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Tag handed to the navigation collaborator
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }
}

/// Current phase of the encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterPhase {
    Running,
    /// Terminal
    Won,
    /// Terminal
    Lost,
}

impl EncounterPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EncounterPhase::Running)
    }
}

/// Why a fire command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejection {
    /// Last shot was too recent
    Cooldown,
    /// Magazine is empty until a reload
    Empty,
    /// Encounter already decided
    Over,
}

/// Ammunition and fire-rate limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magazine {
    pub capacity: u32,
    pub shots_fired: u32,
    /// Clock time of the last accepted shot
    pub last_shot_ms: Option<u64>,
}

impl Magazine {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            shots_fired: 0,
            last_shot_ms: None,
        }
    }

    /// Check both limits without firing
    pub fn check(&self, now_ms: u64) -> Result<(), FireRejection> {
        let cooled = self
            .last_shot_ms
            .is_none_or(|last| now_ms.saturating_sub(last) > FIRE_COOLDOWN_MS);
        if !cooled {
            return Err(FireRejection::Cooldown);
        }
        if self.shots_fired >= self.capacity {
            return Err(FireRejection::Empty);
        }
        Ok(())
    }

    /// Consume a round if both limits allow it
    pub fn fire(&mut self, now_ms: u64) -> Result<(), FireRejection> {
        self.check(now_ms)?;
        self.shots_fired += 1;
        self.last_shot_ms = Some(now_ms);
        Ok(())
    }

    pub fn reload(&mut self) {
        self.shots_fired = 0;
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.shots_fired)
    }
}

/// Parameters for a new encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Playable area in pixels
    pub width: f32,
    pub height: f32,
    pub enemy_count: u32,
    pub magazine_capacity: u32,
    /// Spawn RNG seed
    pub seed: u64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
            enemy_count: DEFAULT_ENEMY_COUNT,
            magazine_capacity: DEFAULT_BULLET_COUNT,
            seed: 0,
        }
    }
}

/// Complete encounter state
#[derive(Debug, Serialize)]
pub struct EncounterState {
    pub width: f32,
    pub height: f32,
    pub player: Player,
    /// Active projectiles, in firing order
    pub projectiles: Vec<Projectile>,
    /// Active pursuers, in spawn order
    pub pursuers: Vec<Pursuer>,
    /// Pursuer count at the start; reaching it in kills wins
    pub initial_pursuers: u32,
    pub kills: u32,
    pub magazine: Magazine,
    pub phase: EncounterPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
    #[serde(skip)]
    rng: Pcg32,
}

impl EncounterState {
    /// Create a new encounter with the player centred and pursuers spawned off-screen
    pub fn new(config: &EncounterConfig) -> Self {
        let mut state = Self {
            width: config.width,
            height: config.height,
            player: Player::new(Vec2::new(config.width / 2.0, config.height / 2.0)),
            projectiles: Vec::new(),
            pursuers: Vec::new(),
            initial_pursuers: config.enemy_count,
            kills: 0,
            magazine: Magazine::new(config.magazine_capacity),
            phase: EncounterPhase::Running,
            time_ticks: 0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(config.seed),
        };

        for _ in 0..config.enemy_count {
            state.spawn_pursuer();
        }
        log::info!(
            "Encounter: {} pursuers, {} rounds, {}x{} field",
            state.pursuers.len(),
            state.magazine.capacity,
            state.width,
            state.height
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Playable area as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Spawn one pursuer just past the left or top edge
    pub fn spawn_pursuer(&mut self) {
        let span_x = (self.width - PURSUER_SIZE).max(0.0);
        let span_y = (self.height - PURSUER_SIZE).max(0.0);

        let mut x = self.rng.random::<f32>() * span_x;
        let mut y = self.rng.random::<f32>() * span_y;
        if self.rng.random_bool(0.5) {
            x = PURSUER_SPAWN_OFFSET;
        } else {
            y = PURSUER_SPAWN_OFFSET;
        }

        let id = self.next_entity_id();
        self.pursuers.push(Pursuer::new(id, Vec2::new(x, y)));
    }

    /// Fire toward a screen point, subject to the magazine limits
    pub fn fire_at(&mut self, target: Vec2, now_ms: u64) -> Result<&Projectile, FireRejection> {
        if self.phase.is_terminal() {
            return Err(FireRejection::Over);
        }
        self.magazine.fire(now_ms)?;

        let heading = heading_degrees(target - self.player.pos);
        let id = self.next_entity_id();
        self.projectiles
            .push(Projectile::new(id, self.player.pos, heading));
        Ok(&self.projectiles[self.projectiles.len() - 1])
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.initial_pursuers.saturating_sub(self.kills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enemies: u32, rounds: u32) -> EncounterConfig {
        EncounterConfig {
            width: 800.0,
            height: 600.0,
            enemy_count: enemies,
            magazine_capacity: rounds,
            seed: 42,
        }
    }

    #[test]
    fn test_spawns_off_screen() {
        let state = EncounterState::new(&config(20, 5));
        assert_eq!(state.pursuers.len(), 20);
        for p in &state.pursuers {
            let left = p.pos.x == PURSUER_SPAWN_OFFSET && (0.0..472.0).contains(&p.pos.y);
            let top = p.pos.y == PURSUER_SPAWN_OFFSET && (0.0..672.0).contains(&p.pos.x);
            assert!(left || top, "unexpected spawn {:?}", p.pos);
        }
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_spawn_is_seeded() {
        let a = EncounterState::new(&config(5, 5));
        let b = EncounterState::new(&config(5, 5));
        for (pa, pb) in a.pursuers.iter().zip(&b.pursuers) {
            assert_eq!(pa.pos, pb.pos);
        }
    }

    #[test]
    fn test_tiny_field_still_spawns() {
        let mut cfg = config(3, 5);
        cfg.width = 64.0;
        cfg.height = 64.0;
        let state = EncounterState::new(&cfg);
        assert_eq!(state.pursuers.len(), 3);
    }

    #[test]
    fn test_magazine_cooldown_is_strict() {
        let mut mag = Magazine::new(5);
        assert_eq!(mag.fire(0), Ok(()));
        assert_eq!(mag.fire(500), Err(FireRejection::Cooldown));
        assert_eq!(mag.fire(501), Ok(()));
        assert_eq!(mag.remaining(), 3);
    }

    #[test]
    fn test_magazine_capacity_and_reload() {
        let mut mag = Magazine::new(2);
        assert!(mag.fire(0).is_ok());
        assert!(mag.fire(1000).is_ok());
        assert_eq!(mag.fire(2000), Err(FireRejection::Empty));
        mag.reload();
        assert!(mag.fire(3000).is_ok());
    }

    #[test]
    fn test_fire_at_heading() {
        let mut state = EncounterState::new(&config(0, 5));
        let shot = state.fire_at(Vec2::new(400.0, 100.0), 0).unwrap();
        assert!((shot.heading() + 90.0).abs() < 1e-4);
        assert_eq!(shot.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.magazine.shots_fired, 1);
    }

    #[test]
    fn test_fire_rejected_when_over() {
        let mut state = EncounterState::new(&config(1, 5));
        state.phase = EncounterPhase::Lost;
        assert!(matches!(
            state.fire_at(Vec2::ZERO, 0),
            Err(FireRejection::Over)
        ));
        assert_eq!(state.magazine.shots_fired, 0);
    }

    #[test]
    fn test_outcome_tags() {
        assert_eq!(Outcome::Won.tag(), "won");
        assert_eq!(Outcome::Lost.tag(), "lost");
        assert_eq!(serde_json::to_string(&Outcome::Won).unwrap(), r#""won""#);
    }
}
