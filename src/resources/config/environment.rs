use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{GRAVITY, ISA_SEA_LEVEL_DENSITY, ISA_SEA_LEVEL_TEMP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub wind_model_config: WindModelConfig,
    pub atmosphere_config: AtmosphereConfig,
    /// Gravitational acceleration magnitude (m/s²). Zero disables gravity.
    pub gravity: f64,
    pub ground: GroundPlaneConfig,
    /// Height above the ground plane below which ground contact is evaluated (m).
    pub near_ground_threshold: f64,
}

/// Wind models, parameterised the way the `aerso` wind models expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindModelConfig {
    /// Uniform wind, local frame (m/s).
    Constant { velocity: Vector3<f64> },
    Logarithmic {
        d: f64,
        z0: f64,
        u_star: f64,
        bearing: f64,
    },
    PowerLaw {
        u_r: f64,
        z_r: f64,
        bearing: f64,
        alpha: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereConfig {
    pub model_type: AtmosphereType,
    pub sea_level_density: f64,
    pub sea_level_temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtmosphereType {
    /// Density fixed at `sea_level_density` at every altitude.
    Constant,
    /// International Standard Atmosphere.
    Standard,
}

/// A flat ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundPlaneConfig {
    /// Height of the plane along local z (m).
    pub height: f64,
    /// Upward normal, local frame; normalized on use.
    pub normal: Vector3<f64>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            wind_model_config: WindModelConfig::Constant {
                velocity: Vector3::new(0.0, 0.0, 0.0),
            },
            atmosphere_config: AtmosphereConfig::default(),
            gravity: GRAVITY,
            ground: GroundPlaneConfig::default(),
            near_ground_threshold: 50.0,
        }
    }
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            model_type: AtmosphereType::Standard,
            sea_level_density: ISA_SEA_LEVEL_DENSITY,
            sea_level_temperature: ISA_SEA_LEVEL_TEMP,
        }
    }
}

impl Default for GroundPlaneConfig {
    fn default() -> Self {
        Self {
            height: 0.0,
            normal: Vector3::z(),
        }
    }
}

impl EnvironmentConfig {
    /// No wind, no gravity, constant sea-level air.
    pub fn without_gravity() -> Self {
        Self {
            gravity: 0.0,
            atmosphere_config: AtmosphereConfig {
                model_type: AtmosphereType::Constant,
                ..AtmosphereConfig::default()
            },
            ..Self::default()
        }
    }
}
