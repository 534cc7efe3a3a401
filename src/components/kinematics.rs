use bevy::prelude::Component;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::local_to_body;

/// Kinematic state of a simulated rigid body, expressed in the local (earth)
/// frame: x east, y north, z up.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Position in the local frame [m]
    pub position: Vector3<f64>,

    /// Linear velocity in the local frame [m/s]
    pub velocity: Vector3<f64>,

    /// Angular velocity in the local frame [rad/s]
    pub angular_velocity: Vector3<f64>,

    /// Attitude quaternion (rotation from body to local frame)
    pub attitude: UnitQuaternion<f64>,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
        }
    }
}

impl KinematicState {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        angular_velocity: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
    ) -> Self {
        Self {
            position,
            velocity,
            angular_velocity,
            attitude,
        }
    }

    /// Create a state at a specific position, at rest
    pub fn at_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Level flight along the body nose at `speed`, pointing along `heading`
    /// (radians clockwise from north).
    pub fn level_flight(position: Vector3<f64>, speed: f64, heading: f64) -> Self {
        let attitude = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -heading);
        Self {
            position,
            velocity: attitude * Vector3::new(0.0, speed, 0.0),
            angular_velocity: Vector3::zeros(),
            attitude,
        }
    }

    pub fn velocity_body(&self) -> Vector3<f64> {
        local_to_body(&self.attitude, &self.velocity)
    }

    pub fn angular_velocity_body(&self) -> Vector3<f64> {
        local_to_body(&self.attitude, &self.angular_velocity)
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
            && self.attitude.coords.iter().all(|v| v.is_finite())
    }
}
