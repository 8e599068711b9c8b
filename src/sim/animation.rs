//! Player animation state machine
//!
//! One animation is active at a time. Switching cancels the previous frame
//! timer before registering a new one at the new state's cadence, so an
//! animator never owns more than one live timer.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_DELAY_MS, RECHARGE_FRAME_DELAY_MS};
use crate::scheduler::{Scheduler, TimerHandle};

/// Named animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    Idle,
    Walk,
    Shot,
    Recharge,
    Hurt,
    Dead,
    Attack,
}

impl AnimationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::Idle => "idle",
            AnimationKind::Walk => "walk",
            AnimationKind::Shot => "shot",
            AnimationKind::Recharge => "recharge",
            AnimationKind::Hurt => "hurt",
            AnimationKind::Dead => "dead",
            AnimationKind::Attack => "attack",
        }
    }

    /// Frames in the sprite sheet
    pub fn frame_count(&self) -> usize {
        match self {
            AnimationKind::Attack => 3,
            AnimationKind::Idle => 6,
            AnimationKind::Walk => 10,
            AnimationKind::Shot => 4,
            AnimationKind::Recharge => 17,
            AnimationKind::Hurt => 5,
            AnimationKind::Dead => 5,
        }
    }

    /// Milliseconds between frames
    pub fn cadence_ms(&self) -> u64 {
        match self {
            AnimationKind::Recharge => RECHARGE_FRAME_DELAY_MS,
            _ => FRAME_DELAY_MS,
        }
    }
}

/// Result of a frame-advance tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Frame moved on, timer still running
    Advanced,
    /// One-shot reached its last frame; timer cancelled
    Finished,
    /// Stray tick after playback stopped
    Idle,
}

/// Animation playback for a single entity
#[derive(Debug, Default)]
pub struct Animator {
    kind: AnimationKind,
    frame: usize,
    infinite: bool,
    timer: Option<TimerHandle>,
}

impl Animator {
    /// Stopped animator showing the first idle frame
    pub fn new() -> Self {
        Self {
            infinite: true,
            ..Default::default()
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Whether a frame timer is live
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Start the frame timer for the current state (if not already running)
    pub fn start<E>(&mut self, scheduler: &mut impl Scheduler<E>, on_frame: E) {
        if self.timer.is_none() {
            self.timer = Some(scheduler.schedule_repeating(self.kind.cadence_ms(), on_frame));
        }
    }

    /// Switch animation. Returns false (and changes nothing) if `kind` is already active.
    pub fn set_animation<E>(
        &mut self,
        kind: AnimationKind,
        infinite: bool,
        scheduler: &mut impl Scheduler<E>,
        on_frame: E,
    ) -> bool {
        if self.kind == kind {
            return false;
        }

        self.stop(scheduler);
        self.kind = kind;
        self.frame = 0;
        self.infinite = infinite;
        self.timer = Some(scheduler.schedule_repeating(kind.cadence_ms(), on_frame));
        true
    }

    /// Handle one cadence tick
    pub fn on_frame<E>(&mut self, scheduler: &mut impl Scheduler<E>) -> FrameStep {
        if self.timer.is_none() {
            return FrameStep::Idle;
        }

        self.frame = (self.frame + 1) % self.kind.frame_count();

        if !self.infinite && self.frame == self.kind.frame_count() - 1 {
            self.stop(scheduler);
            return FrameStep::Finished;
        }
        FrameStep::Advanced
    }

    /// Cancel the frame timer, freezing on the current frame
    pub fn stop<E>(&mut self, scheduler: &mut impl Scheduler<E>) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
    }
}
