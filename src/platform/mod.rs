//! Platform abstraction layer
//!
//! Handles the host-facing edges of an encounter:
//! - Input events (joystick, taps, reload button)
//! - Joystick normalisation
//! - Navigation to the outcome screen

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::JOYSTICK_BASE_RADIUS;
use crate::sim::Outcome;

/// Input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Normalised stick vector, each axis in [-1, 1]; (0, 0) means released
    Joystick { x: f32, y: f32 },
    /// Finger down at a screen point
    TapDown { x: f32, y: f32 },
    /// Finger up at a screen point
    TapUp { x: f32, y: f32 },
    /// Reload button
    Reload,
}

impl InputEvent {
    pub fn joystick(v: Vec2) -> Self {
        InputEvent::Joystick { x: v.x, y: v.y }
    }

    pub fn tap_down(p: Vec2) -> Self {
        InputEvent::TapDown { x: p.x, y: p.y }
    }

    pub fn tap_up(p: Vec2) -> Self {
        InputEvent::TapUp { x: p.x, y: p.y }
    }
}

/// On-screen joystick geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    pub base_radius: f32,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            base_radius: JOYSTICK_BASE_RADIUS,
        }
    }
}

impl Joystick {
    pub fn new(base_radius: f32) -> Self {
        Self { base_radius }
    }

    /// Normalise a touch offset from the base centre; offsets past the rim are clamped to it
    pub fn deflect(&self, offset: Vec2) -> Vec2 {
        if self.base_radius <= 0.0 {
            return Vec2::ZERO;
        }
        (offset / self.base_radius).clamp_length_max(1.0)
    }

    /// Stick released
    pub fn release(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Input event for a touch offset
    pub fn event(&self, offset: Vec2) -> InputEvent {
        InputEvent::joystick(self.deflect(offset))
    }
}

/// Moves the host to the outcome screen
pub trait Navigator {
    fn navigate(&mut self, outcome: Outcome);
}

/// Navigator that only remembers where it was sent
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub visited: Vec<Outcome>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Outcome> {
        self.visited.last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, outcome: Outcome) {
        log::info!("Navigating to outcome screen: {}", outcome.tag());
        self.visited.push(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflect_inside_base() {
        let stick = Joystick::default();
        let v = stick.deflect(Vec2::new(75.0, -30.0));
        assert!((v - Vec2::new(0.5, -0.2)).length() < 1e-6);
    }

    #[test]
    fn test_deflect_clamped_to_rim() {
        let stick = Joystick::default();
        let v = stick.deflect(Vec2::new(600.0, 0.0));
        assert!((v - Vec2::new(1.0, 0.0)).length() < 1e-6);

        let v = stick.deflect(Vec2::new(300.0, 300.0));
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert!(v.x.abs() <= 1.0 && v.y.abs() <= 1.0);
    }

    #[test]
    fn test_release_and_degenerate_base() {
        assert_eq!(Joystick::default().release(), Vec2::ZERO);
        assert_eq!(Joystick::new(0.0).deflect(Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn test_input_serde_shape() {
        let json = serde_json::to_string(&InputEvent::tap_down(Vec2::new(1.0, 2.0))).unwrap();
        assert_eq!(json, r#"{"type":"tap_down","x":1.0,"y":2.0}"#);
        let back: InputEvent = serde_json::from_str(r#"{"type":"reload"}"#).unwrap();
        assert_eq!(back, InputEvent::Reload);
    }

    #[test]
    fn test_recording_navigator() {
        let mut nav = RecordingNavigator::new();
        assert_eq!(nav.last(), None);
        nav.navigate(Outcome::Lost);
        assert_eq!(nav.visited, vec![Outcome::Lost]);
        assert_eq!(nav.last(), Some(Outcome::Lost));
    }
}
