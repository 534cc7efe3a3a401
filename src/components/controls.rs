use bevy::prelude::Component;
use serde::{Deserialize, Serialize};

/// Pilot and systems commands fed to the force contributors every frame.
///
/// Surface deflections are normalized to [-1, 1], throttle, airbrake and brake
/// to [0, 1].
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Right stick positive, right wing down.
    pub aileron: f64,
    /// Aft stick positive, nose up.
    pub elevator: f64,
    /// Right pedal positive, nose right.
    pub rudder: f64,
    pub airbrake: f64,
    pub throttle: f64,
    pub afterburner: bool,
    /// Wheel brakes.
    pub brake: f64,
}

impl ControlInputs {
    /// Returns a copy with every command clamped to its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            aileron: self.aileron.clamp(-1.0, 1.0),
            elevator: self.elevator.clamp(-1.0, 1.0),
            rudder: self.rudder.clamp(-1.0, 1.0),
            airbrake: self.airbrake.clamp(0.0, 1.0),
            throttle: self.throttle.clamp(0.0, 1.0),
            afterburner: self.afterburner,
            brake: self.brake.clamp(0.0, 1.0),
        }
    }

    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = throttle;
        self
    }
}
