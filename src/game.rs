//! Encounter orchestrator
//!
//! Owns one encounter and reacts to the events its timers and the host
//! deliver. All timers are registered on a `Scheduler<GameEvent>`; the
//! orchestrator is the only thing that mutates the encounter state.

use glam::Vec2;

use crate::consts::*;
use crate::heading_degrees;
use crate::persistence::KeyValueStore;
use crate::platform::{InputEvent, Navigator};
use crate::renderer::Surface;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::scores::ScoreBoard;
use crate::settings::Settings;
use crate::sim::{
    self, AnimationKind, EncounterConfig, EncounterPhase, EncounterState, FrameStep, Outcome,
    TickReport,
};

/// Events carried by the encounter's timers and input channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Game loop tick
    Frame,
    /// Player animation cadence
    AnimationFrame,
    /// Repeat the last joystick step
    JoystickSample,
    /// Host input
    Input(InputEvent),
    /// Shot animation elapsed
    ShotFinished,
    /// Reload animation elapsed; refill the magazine
    ReloadFinished,
    /// Leave for the outcome screen
    Navigate(Outcome),
}

/// A running encounter with its collaborators
pub struct Encounter<K, N, R> {
    store: K,
    navigator: N,
    surface: R,
    settings: Settings,
    scores: ScoreBoard,
    state: EncounterState,
    /// Game loop timer; `None` before start, while suspended and after the end
    loop_timer: Option<TimerHandle>,
    joystick_timer: Option<TimerHandle>,
    /// Last non-zero stick vector
    stick: Vec2,
    navigated: bool,
}

impl<K: KeyValueStore, N: Navigator, R: Surface> Encounter<K, N, R> {
    /// Build an encounter sized to `viewport`, using the stored settings
    pub fn new(store: K, navigator: N, surface: R, viewport: Vec2, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let scores = ScoreBoard::load(&store);
        let config = EncounterConfig {
            width: viewport.x,
            height: viewport.y,
            enemy_count: settings.enemy_count,
            magazine_capacity: settings.bullet_count,
            seed,
        };

        Self {
            store,
            navigator,
            surface,
            settings,
            scores,
            state: EncounterState::new(&config),
            loop_timer: None,
            joystick_timer: None,
            stick: Vec2::ZERO,
            navigated: false,
        }
    }

    /// Register the game loop and start the idle animation
    pub fn start(&mut self, scheduler: &mut impl Scheduler<GameEvent>) {
        self.resume(scheduler);
        self.state
            .player
            .animator
            .start(scheduler, GameEvent::AnimationFrame);
    }

    /// Host view hidden: stop ticking
    pub fn suspend(&mut self, scheduler: &mut impl Scheduler<GameEvent>) {
        if let Some(handle) = self.loop_timer.take() {
            scheduler.cancel(handle);
            log::debug!("Encounter suspended");
        }
    }

    /// Host view shown again: resume ticking
    pub fn resume(&mut self, scheduler: &mut impl Scheduler<GameEvent>) {
        if self.loop_timer.is_none() && !self.navigated {
            self.loop_timer =
                Some(scheduler.schedule_repeating(TICK_INTERVAL_MS, GameEvent::Frame));
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.loop_timer.is_none()
    }

    /// Dispatch one event
    pub fn handle(&mut self, event: GameEvent, scheduler: &mut impl Scheduler<GameEvent>) {
        match event {
            GameEvent::Frame => {
                self.tick(scheduler);
            }
            GameEvent::AnimationFrame => {
                let animator = &mut self.state.player.animator;
                if animator.on_frame(scheduler) == FrameStep::Finished {
                    log::debug!("Animation {} finished", animator.kind().as_str());
                }
            }
            GameEvent::JoystickSample => self.sample_joystick(scheduler),
            GameEvent::Input(input) => self.handle_input(input, scheduler),
            GameEvent::ShotFinished => {
                self.set_player_animation(AnimationKind::Idle, true, scheduler);
            }
            GameEvent::ReloadFinished => {
                self.state.magazine.reload();
                log::debug!("Reloaded {} rounds", self.state.magazine.capacity);
                self.set_player_animation(AnimationKind::Idle, true, scheduler);
            }
            GameEvent::Navigate(outcome) => self.navigate(outcome, scheduler),
        }
    }

    /// Run one game loop iteration and resolve its outcome
    pub fn tick(&mut self, scheduler: &mut impl Scheduler<GameEvent>) -> TickReport {
        let report = sim::tick(&mut self.state, &mut self.surface);

        if report.player_caught && self.state.player.is_alive() {
            self.state.player.kill();
            self.stop_joystick(scheduler);
            self.state.player.animator.set_animation(
                AnimationKind::Dead,
                false,
                scheduler,
                GameEvent::AnimationFrame,
            );
        }

        match report.outcome {
            Some(Outcome::Won) => {
                self.record(Outcome::Won);
                self.navigate(Outcome::Won, scheduler);
            }
            Some(Outcome::Lost) => {
                self.record(Outcome::Lost);
                scheduler.schedule_once(
                    LOSS_NAVIGATION_DELAY_MS,
                    GameEvent::Navigate(Outcome::Lost),
                );
            }
            None => {}
        }

        report
    }

    fn handle_input(&mut self, input: InputEvent, scheduler: &mut impl Scheduler<GameEvent>) {
        match input {
            InputEvent::Joystick { x, y } => self.move_player(Vec2::new(x, y), scheduler),
            InputEvent::TapDown { x, y } => self.fire(Vec2::new(x, y), scheduler),
            InputEvent::TapUp { .. } => {
                scheduler.schedule_once(SHOT_ANIMATION_MS, GameEvent::ShotFinished);
            }
            InputEvent::Reload => {
                self.set_player_animation(AnimationKind::Recharge, false, scheduler);
                scheduler.schedule_once(RELOAD_ANIMATION_MS, GameEvent::ReloadFinished);
            }
        }
    }

    fn fire(&mut self, target: Vec2, scheduler: &mut impl Scheduler<GameEvent>) {
        let now = scheduler.now_ms();
        match self.state.fire_at(target, now).map(|p| (p.id, p.heading())) {
            Ok((id, heading)) => {
                log::debug!("Fired projectile {id} at {heading:.1} degrees");
                self.set_player_animation(AnimationKind::Shot, false, scheduler);
                scheduler.schedule_once(SHOT_ANIMATION_MS, GameEvent::ShotFinished);
            }
            Err(reason) => log::debug!("Fire rejected at {now} ms: {reason:?}"),
        }
    }

    fn move_player(&mut self, stick: Vec2, scheduler: &mut impl Scheduler<GameEvent>) {
        if !self.can_move() {
            return;
        }

        if stick == Vec2::ZERO {
            self.stop_joystick(scheduler);
            self.set_player_animation(AnimationKind::Idle, true, scheduler);
            return;
        }

        self.stick = stick;
        self.step_player(scheduler);
        if self.joystick_timer.is_none() {
            self.joystick_timer = Some(
                scheduler.schedule_repeating(JOYSTICK_SAMPLE_MS, GameEvent::JoystickSample),
            );
        }
    }

    fn sample_joystick(&mut self, scheduler: &mut impl Scheduler<GameEvent>) {
        if self.can_move() && self.stick != Vec2::ZERO {
            self.step_player(scheduler);
        }
    }

    fn step_player(&mut self, scheduler: &mut impl Scheduler<GameEvent>) {
        let bounds = self.state.bounds();
        self.state.player.step(heading_degrees(self.stick), bounds);
        self.set_player_animation(AnimationKind::Walk, true, scheduler);
    }

    fn can_move(&self) -> bool {
        self.state.player.is_alive() && !self.state.phase.is_terminal()
    }

    fn stop_joystick(&mut self, scheduler: &mut impl Scheduler<GameEvent>) {
        self.stick = Vec2::ZERO;
        if let Some(handle) = self.joystick_timer.take() {
            scheduler.cancel(handle);
        }
    }

    /// Animation changes are ignored once the player is dead
    fn set_player_animation(
        &mut self,
        kind: AnimationKind,
        infinite: bool,
        scheduler: &mut impl Scheduler<GameEvent>,
    ) {
        if !self.state.player.is_alive() {
            return;
        }
        self.state
            .player
            .animator
            .set_animation(kind, infinite, scheduler, GameEvent::AnimationFrame);
    }

    /// Persisting a result is best-effort
    fn record(&mut self, outcome: Outcome) {
        if let Err(err) = self.scores.record(outcome, &mut self.store) {
            log::warn!("Failed to record {}: {err}", outcome.tag());
        }
    }

    fn navigate(&mut self, outcome: Outcome, scheduler: &mut impl Scheduler<GameEvent>) {
        self.suspend(scheduler);
        self.stop_joystick(scheduler);
        if !self.navigated {
            self.navigated = true;
            self.navigator.navigate(outcome);
        }
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EncounterState {
        &mut self.state
    }

    pub fn phase(&self) -> EncounterPhase {
        self.state.phase
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn scores(&self) -> ScoreBoard {
        self.scores
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

}
