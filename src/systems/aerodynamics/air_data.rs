use nalgebra::Vector3;

use crate::utils::constants::MIN_AIRSPEED;

/// Air-relative flight condition of a body, derived from its body-frame
/// velocity and the ambient wind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirData {
    /// True airspeed (m/s).
    pub true_airspeed: f64,
    /// Angle of attack (α) in radians, positive with the airflow hitting the
    /// underside.
    pub alpha: f64,
    /// Sideslip angle (β) in radians, positive with the airflow coming from
    /// the right.
    pub beta: f64,
    pub mach: f64,
    /// Dynamic pressure (Pa).
    pub dynamic_pressure: f64,
    /// Air density (kg/m³).
    pub density: f64,
    /// Velocity relative to the air mass, body frame (m/s).
    pub relative_velocity: Vector3<f64>,
}

impl Default for AirData {
    fn default() -> Self {
        Self {
            true_airspeed: 0.0,
            alpha: 0.0,
            beta: 0.0,
            mach: 0.0,
            dynamic_pressure: 0.0,
            density: 1.225,
            relative_velocity: Vector3::zeros(),
        }
    }
}

impl AirData {
    /// Air data for a body moving at `velocity_body` through wind `wind_body`,
    /// both in the body frame (x right, y nose, z up).
    pub fn compute(
        velocity_body: &Vector3<f64>,
        wind_body: &Vector3<f64>,
        density: f64,
        speed_of_sound: f64,
    ) -> Self {
        let relative_velocity = velocity_body - wind_body;
        let airspeed = relative_velocity.norm();
        let dynamic_pressure = 0.5 * density * airspeed * airspeed;
        let mach = if speed_of_sound > 0.0 {
            airspeed / speed_of_sound
        } else {
            0.0
        };

        let (alpha, beta) = if airspeed > MIN_AIRSPEED {
            (
                Self::calculate_alpha(&relative_velocity),
                Self::calculate_beta(&relative_velocity, airspeed),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            true_airspeed: airspeed,
            alpha,
            beta,
            mach,
            dynamic_pressure,
            density,
            relative_velocity,
        }
    }

    /// Whether the airflow is strong enough for aerodynamic loads.
    pub fn has_airflow(&self) -> bool {
        self.true_airspeed > MIN_AIRSPEED
    }

    fn calculate_alpha(relative_velocity: &Vector3<f64>) -> f64 {
        (-relative_velocity.z).atan2(relative_velocity.y)
    }

    fn calculate_beta(relative_velocity: &Vector3<f64>, airspeed: f64) -> f64 {
        (relative_velocity.x / airspeed).clamp(-1.0, 1.0).asin()
    }
}
