//! Fixed-cadence encounter tick
//!
//! Advances projectiles and pursuers by one step and draws the frame. Side
//! effects that reach outside the simulation (persisting results, navigating,
//! animation timers) are reported back to the caller instead of performed here.

use super::pursuer::Pursuit;
use super::state::{EncounterPhase, EncounterState, Outcome};
use crate::renderer::{SpriteFrame, SpriteId, Surface};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pursuers destroyed this tick
    pub kills: u32,
    /// Set on the tick the encounter was decided
    pub outcome: Option<Outcome>,
    /// A pursuer reached the player this tick
    pub player_caught: bool,
}

/// Advance the encounter by one tick and draw the result
pub fn tick(state: &mut EncounterState, surface: &mut impl Surface) -> TickReport {
    let mut report = TickReport::default();
    state.time_ticks += 1;

    surface.clear();

    // Projectiles: each one is resolved on its own
    let projectile_size = surface.sprite_size(SpriteId::Projectile);
    let (width, height) = (state.width, state.height);
    let mut survivors = Vec::with_capacity(state.projectiles.len());
    for mut projectile in std::mem::take(&mut state.projectiles) {
        projectile.advance();

        let struck = state.pursuers.iter().position(|p| projectile.test_hit(p));
        if let Some(index) = struck {
            let pursuer = state.pursuers.remove(index);
            state.kills += 1;
            report.kills += 1;
            log::debug!("Projectile {} destroyed pursuer {}", projectile.id, pursuer.id);
            continue;
        }

        if projectile.is_out_of_bounds(width, height) {
            continue;
        }

        surface.draw(
            SpriteFrame::still(SpriteId::Projectile),
            projectile.draw_transform(projectile_size),
        );
        survivors.push(projectile);
    }
    state.projectiles = survivors;

    if state.kills == state.initial_pursuers && state.phase == EncounterPhase::Running {
        state.phase = EncounterPhase::Won;
        report.outcome = Some(Outcome::Won);
        log::info!("Encounter won after {} ticks", state.time_ticks);
    }

    let player_sprite = SpriteId::Player(state.player.animator.kind());
    surface.draw(
        SpriteFrame::new(player_sprite, state.player.animator.frame()),
        state.player.draw_transform(surface.sprite_size(player_sprite)),
    );

    let pursuer_size = surface.sprite_size(SpriteId::Pursuer);
    let target = state.player.pos;
    for pursuer in &mut state.pursuers {
        surface.draw(
            SpriteFrame::still(SpriteId::Pursuer),
            pursuer.draw_transform(pursuer_size),
        );
        if pursuer.pursue(target) == Pursuit::Caught {
            report.player_caught = true;
        }
    }

    let any_killed = state.pursuers.iter().any(|p| p.is_killed());
    if any_killed && state.phase == EncounterPhase::Running {
        state.phase = EncounterPhase::Lost;
        report.outcome = Some(Outcome::Lost);
        log::info!("Encounter lost after {} ticks", state.time_ticks);
    }

    surface.present();
    report
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::sim::{EncounterConfig, Projectile, Pursuer};

    fn empty_field() -> EncounterState {
        let config = EncounterConfig {
            width: 800.0,
            height: 800.0,
            enemy_count: 0,
            magazine_capacity: 5,
            seed: 1,
        };
        EncounterState::new(&config)
    }

    fn with_pursuer(pos: Vec2) -> EncounterState {
        let mut state = empty_field();
        let id = state.next_entity_id();
        state.pursuers.push(Pursuer::new(id, pos));
        state.initial_pursuers = 1;
        state
    }

    #[test]
    fn test_draws_every_entity() {
        let mut state = with_pursuer(Vec2::new(0.0, 0.0));
        state.projectiles.push(Projectile::new(50, Vec2::new(400.0, 400.0), 90.0));
        let mut surface = RecordingSurface::new();

        let report = tick(&mut state, &mut surface);
        assert_eq!(report, TickReport::default());
        assert_eq!(surface.frames_presented(), 1);
        assert_eq!(surface.count(|s| s == SpriteId::Projectile), 1);
        assert_eq!(surface.count(|s| s == SpriteId::Pursuer), 1);
        assert_eq!(surface.count(|s| matches!(s, SpriteId::Player(_))), 1);
    }

    #[test]
    fn test_hit_removes_both_and_wins() {
        let mut state = with_pursuer(Vec2::new(100.0, 100.0));
        state.projectiles.push(Projectile::new(50, Vec2::new(80.0, 150.0), 0.0));
        let mut surface = RecordingSurface::new();

        let report = tick(&mut state, &mut surface);
        assert_eq!(report.kills, 1);
        assert_eq!(report.outcome, Some(Outcome::Won));
        assert!(state.pursuers.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.phase, EncounterPhase::Won);

        // Decided encounters never report again
        let report = tick(&mut state, &mut surface);
        assert_eq!(report.outcome, None);
    }

    #[test]
    fn test_projectiles_resolve_independently() {
        let mut state = with_pursuer(Vec2::new(100.0, 100.0));
        let id = state.next_entity_id();
        state.pursuers.push(Pursuer::new(id, Vec2::new(100.0, 500.0)));
        state.initial_pursuers = 3;

        // First one hits, second one is in open space
        state.projectiles.push(Projectile::new(50, Vec2::new(80.0, 150.0), 0.0));
        state.projectiles.push(Projectile::new(51, Vec2::new(400.0, 300.0), 0.0));
        let mut surface = RecordingSurface::new();

        let report = tick(&mut state, &mut surface);
        assert_eq!(report.kills, 1);
        assert_eq!(state.pursuers.len(), 1);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, 51);
        assert_eq!(state.phase, EncounterPhase::Running);
    }

    #[test]
    fn test_out_of_bounds_projectile_removed_undrawn() {
        let mut state = empty_field();
        state.initial_pursuers = 1;
        state.projectiles.push(Projectile::new(50, Vec2::new(790.0, 400.0), 0.0));
        let mut surface = RecordingSurface::new();

        tick(&mut state, &mut surface);
        assert!(state.projectiles.is_empty());
        assert_eq!(surface.count(|s| s == SpriteId::Projectile), 0);
    }

    #[test]
    fn test_caught_player_loses_once() {
        // Player at the centre (400, 400); pursuer 300px to the left
        let mut state = with_pursuer(Vec2::new(100.0, 400.0));
        let mut surface = RecordingSurface::new();

        let mut ticks = 0;
        let report = loop {
            ticks += 1;
            let report = tick(&mut state, &mut surface);
            if report.outcome.is_some() {
                break report;
            }
            assert!(ticks < 100, "never caught");
        };

        assert_eq!(ticks, 44);
        assert!(report.player_caught);
        assert_eq!(report.outcome, Some(Outcome::Lost));
        assert_eq!(state.phase, EncounterPhase::Lost);

        let report = tick(&mut state, &mut surface);
        assert_eq!(report.outcome, None);
        assert!(!report.player_caught);
    }

    #[test]
    fn test_no_pursuers_wins_immediately() {
        let mut state = empty_field();
        let mut surface = RecordingSurface::new();
        let report = tick(&mut state, &mut surface);
        assert_eq!(report.outcome, Some(Outcome::Won));
    }
}
