use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{DEFAULT_FRAME_TIME, MAX_SUBSTEPS, SUBSTEP_RATE};

/// What `do_sim_step` does when asked to advance by exactly zero seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZeroDtPolicy {
    /// Integrate a nominal frame time (`default_dt`) instead.
    #[default]
    Substitute,
    /// Leave the state untouched and report a zero-substep step.
    Skip,
}

/// Tunables for the rigid-body integration.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed step handed to every integrator by the ECS schedule (s).
    pub timestep: f64,
    /// Nominal sub-steps per simulated second.
    pub substep_rate: f64,
    pub max_substeps: u32,
    /// Step length used in place of a zero `dt` (s).
    pub default_dt: f64,
    pub zero_dt_policy: ZeroDtPolicy,
    /// Extra sub-step rate while close to the ground (Hz).
    pub ground_rate_boost: f64,
    /// Extra sub-step rate per rad/s of body angular rate (Hz·s/rad).
    pub angular_rate_boost: f64,
    /// Fraction of a descending vertical velocity removed per sub-step while
    /// in ground contact.
    pub ground_contact_damping: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 120.0, // 120 Hz
            substep_rate: SUBSTEP_RATE,
            max_substeps: MAX_SUBSTEPS,
            default_dt: DEFAULT_FRAME_TIME,
            zero_dt_policy: ZeroDtPolicy::Substitute,
            ground_rate_boost: 180.0,
            angular_rate_boost: 30.0,
            ground_contact_damping: 0.05,
        }
    }
}

impl PhysicsConfig {
    /// Number of sub-steps used to advance `dt` seconds.
    ///
    /// Always within `1..=max_substeps` and non-decreasing in `dt` for a fixed
    /// ground proximity and angular rate.
    pub fn substep_count(&self, dt: f64, near_ground: bool, angular_rate: f64) -> u32 {
        let mut rate = self.substep_rate;
        if near_ground {
            rate += self.ground_rate_boost;
        }
        if angular_rate.is_finite() {
            rate += self.angular_rate_boost * angular_rate.abs();
        }
        let max = self.max_substeps.max(1);
        let n = (dt * rate).round();
        if !n.is_finite() || n < 1.0 {
            1
        } else if n >= max as f64 {
            max
        } else {
            n as u32
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.timestep > 0.0) || !(self.default_dt > 0.0) {
            return Err("timestep and default_dt must be positive".to_string());
        }
        if !(self.substep_rate > 0.0) || self.max_substeps == 0 {
            return Err("sub-step rate and max_substeps must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.ground_contact_damping) {
            return Err(format!(
                "ground_contact_damping must lie in [0, 1], got {}",
                self.ground_contact_damping
            ));
        }
        Ok(())
    }
}
