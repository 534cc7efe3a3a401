use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Ground contact configuration: a fixed set of body-frame contact points
/// sharing one spring-damper and friction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearConfig {
    /// Contact points relative to the centre of mass, body frame (m).
    pub contact_points: Vec<Vector3<f64>>,
    /// Normal spring stiffness per contact point (N/m).
    pub spring_constant: f64,
    /// Normal damping per contact point (N·s/m).
    pub impact_damping: f64,
    /// Friction coefficient with brakes released.
    pub rolling_friction: f64,
    /// Friction coefficient with brakes fully applied.
    pub braking_friction: f64,
    /// Sliding speed below which friction fades linearly to zero (m/s).
    #[serde(default = "default_slip_speed")]
    pub slip_speed: f64,
    /// Contact acceleration limit, in multiples of standard gravity.
    #[serde(default = "default_g_limit")]
    pub g_limit: f64,
    /// Penetration tolerated before the position is pulled back up (m).
    #[serde(default = "default_max_penetration")]
    pub max_penetration: f64,
}

fn default_slip_speed() -> f64 {
    0.5
}

fn default_g_limit() -> f64 {
    20.0
}

fn default_max_penetration() -> f64 {
    0.25
}

impl GearConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.contact_points.is_empty() {
            return Err("gear needs at least one contact point".to_string());
        }
        if !self
            .contact_points
            .iter()
            .all(|p| p.iter().all(|v| v.is_finite()))
        {
            return Err("gear contact points must be finite".to_string());
        }
        if !(self.spring_constant > 0.0) {
            return Err(format!(
                "spring constant must be positive, got {}",
                self.spring_constant
            ));
        }
        if self.impact_damping < 0.0 || self.rolling_friction < 0.0 || self.braking_friction < 0.0
        {
            return Err("damping and friction must be non-negative".to_string());
        }
        if !(self.slip_speed > 0.0) || !(self.g_limit > 0.0) || self.max_penetration < 0.0 {
            return Err("slip speed and g limit must be positive".to_string());
        }
        Ok(())
    }

    /// Tricycle undercarriage for a light fighter.
    pub fn tricycle() -> Self {
        Self {
            contact_points: vec![
                Vector3::new(0.0, 4.3, -1.7),
                Vector3::new(-1.2, -0.6, -1.7),
                Vector3::new(1.2, -0.6, -1.7),
            ],
            spring_constant: 3.0e5,
            impact_damping: 4.0e4,
            rolling_friction: 0.03,
            braking_friction: 0.6,
            slip_speed: default_slip_speed(),
            g_limit: default_g_limit(),
            max_penetration: 0.4,
        }
    }
}
