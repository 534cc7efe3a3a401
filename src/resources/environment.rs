use aerso::density_models::StandardDensity;
use aerso::wind_models::{ConstantWind, LogWind, PowerWind};
use aerso::{DensityModel, WindModel};
use bevy::prelude::*;
use nalgebra::Vector3;

use super::config::environment::{AtmosphereType, EnvironmentConfig, WindModelConfig};
use crate::utils::constants::{
    AIR_GAS_CONSTANT, AIR_HEAT_CAPACITY_RATIO, ISA_LAPSE_RATE, ISA_TROPOPAUSE_ALTITUDE,
    ISA_TROPOPAUSE_TEMP,
};

enum Atmosphere {
    Fixed(f64),
    Model(Box<dyn DensityModel<f64> + Send + Sync>),
}

/// World atmosphere, wind, gravity and ground plane.
///
/// Positions handed to the `aerso` models are converted from the local frame
/// (x east, y north, z up) to north-east-down.
#[derive(Resource)]
pub struct EnvironmentResource {
    wind_model: Box<dyn WindModel<f64> + Send + Sync>,
    atmosphere: Atmosphere,
    sea_level_temperature: f64,
    gravity: f64,
    ground_height: f64,
    ground_normal: Vector3<f64>,
    near_ground_threshold: f64,
}

/// Environment values sampled once per integrator step and held constant
/// across its sub-steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSnapshot {
    /// Air density (kg/m³)
    pub density: f64,
    /// Speed of sound (m/s)
    pub speed_of_sound: f64,
    /// Wind velocity, local frame (m/s)
    pub wind: Vector3<f64>,
    /// Gravitational acceleration magnitude (m/s²)
    pub gravity: f64,
    /// Ground height below the sampled position (m)
    pub ground_height: f64,
    /// Point on the ground plane below the sampled position, local frame
    pub ground_point: Vector3<f64>,
    /// Upward unit ground normal, local frame
    pub ground_normal: Vector3<f64>,
    /// Whether ground contact needs to be evaluated at all.
    pub near_ground: bool,
}

impl Default for EnvironmentSnapshot {
    fn default() -> Self {
        Self::from(&EnvironmentConfig::default())
    }
}

impl From<&EnvironmentConfig> for EnvironmentSnapshot {
    /// Sea-level conditions over the configured ground plane.
    fn from(config: &EnvironmentConfig) -> Self {
        EnvironmentResource::new(config).snapshot(&Vector3::new(0.0, 0.0, config.ground.height))
    }
}

impl EnvironmentSnapshot {
    /// Height of a local-frame point above the ground plane, along its normal.
    pub fn height_above_ground(&self, point: &Vector3<f64>) -> f64 {
        (point - self.ground_point).dot(&self.ground_normal)
    }

    pub fn with_wind(mut self, wind: Vector3<f64>) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }
}

impl Default for EnvironmentResource {
    fn default() -> Self {
        Self::new(&EnvironmentConfig::default())
    }
}

impl EnvironmentResource {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let wind_model = match &config.wind_model_config {
            WindModelConfig::Constant { velocity } => {
                Box::new(ConstantWind::new(local_to_ned(velocity)))
                    as Box<dyn WindModel<f64> + Send + Sync>
            }
            WindModelConfig::Logarithmic {
                d,
                z0,
                u_star,
                bearing,
            } => Box::new(LogWind::new(*d, *z0, *u_star, *bearing))
                as Box<dyn WindModel<f64> + Send + Sync>,
            WindModelConfig::PowerLaw {
                u_r,
                z_r,
                bearing,
                alpha,
            } => Box::new(PowerWind::new_with_alpha(*u_r, *z_r, *bearing, *alpha))
                as Box<dyn WindModel<f64> + Send + Sync>,
        };

        let atmosphere = match config.atmosphere_config.model_type {
            AtmosphereType::Constant => Atmosphere::Fixed(config.atmosphere_config.sea_level_density),
            AtmosphereType::Standard => Atmosphere::Model(Box::new(StandardDensity)),
        };

        let ground_normal = config
            .ground
            .normal
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| {
                warn!("Degenerate ground normal {:?}, using +z", config.ground.normal);
                Vector3::z()
            });

        Self {
            wind_model,
            atmosphere,
            sea_level_temperature: config.atmosphere_config.sea_level_temperature,
            gravity: config.gravity,
            ground_height: config.ground.height,
            ground_normal,
            near_ground_threshold: config.near_ground_threshold,
        }
    }

    /// Wind at a local-frame position, local frame.
    pub fn get_wind(&self, position: &Vector3<f64>) -> Vector3<f64> {
        ned_to_local(&self.wind_model.get_wind(&local_to_ned(position)))
    }

    pub fn get_density(&self, position: &Vector3<f64>) -> f64 {
        match &self.atmosphere {
            Atmosphere::Fixed(density) => *density,
            Atmosphere::Model(model) => model.get_density(&local_to_ned(position)),
        }
    }

    /// Speed of sound from the standard temperature profile.
    pub fn get_speed_of_sound(&self, position: &Vector3<f64>) -> f64 {
        let altitude = position.z.clamp(0.0, ISA_TROPOPAUSE_ALTITUDE);
        let temperature = (self.sea_level_temperature + ISA_LAPSE_RATE * altitude)
            .max(ISA_TROPOPAUSE_TEMP);
        (AIR_HEAT_CAPACITY_RATIO * AIR_GAS_CONSTANT * temperature).sqrt()
    }

    /// Ground plane height directly below (or above) a local-frame position.
    pub fn ground_height_at(&self, position: &Vector3<f64>) -> f64 {
        let n = self.ground_normal;
        if n.z.abs() < f64::EPSILON {
            return self.ground_height;
        }
        self.ground_height - (n.x * position.x + n.y * position.y) / n.z
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn snapshot(&self, position: &Vector3<f64>) -> EnvironmentSnapshot {
        let ground_height = self.ground_height_at(position);
        EnvironmentSnapshot {
            density: self.get_density(position),
            speed_of_sound: self.get_speed_of_sound(position),
            wind: self.get_wind(position),
            gravity: self.gravity,
            ground_height,
            ground_point: Vector3::new(position.x, position.y, ground_height),
            ground_normal: self.ground_normal,
            near_ground: position.z - ground_height < self.near_ground_threshold,
        }
    }
}

fn local_to_ned(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.y, v.x, -v.z)
}

fn ned_to_local(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.y, v.x, -v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::config::environment::AtmosphereConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_wind_round_trips_frames() {
        let config = EnvironmentConfig {
            wind_model_config: WindModelConfig::Constant {
                velocity: Vector3::new(3.0, -4.0, 0.5),
            },
            ..EnvironmentConfig::default()
        };
        let env = EnvironmentResource::new(&config);
        let wind = env.get_wind(&Vector3::new(10.0, 20.0, 300.0));
        assert_relative_eq!(wind, Vector3::new(3.0, -4.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_standard_density_falls_with_altitude() {
        let env = EnvironmentResource::default();
        let low = env.get_density(&Vector3::new(0.0, 0.0, 0.0));
        let high = env.get_density(&Vector3::new(0.0, 0.0, 5000.0));
        assert_relative_eq!(low, 1.225, epsilon = 1e-2);
        assert!(high < low);
    }

    #[test]
    fn test_constant_density() {
        let config = EnvironmentConfig {
            atmosphere_config: AtmosphereConfig {
                model_type: AtmosphereType::Constant,
                sea_level_density: 1.0,
                ..AtmosphereConfig::default()
            },
            ..EnvironmentConfig::default()
        };
        let env = EnvironmentResource::new(&config);
        assert_relative_eq!(env.get_density(&Vector3::new(0.0, 0.0, 9000.0)), 1.0);
    }

    #[test]
    fn test_speed_of_sound() {
        let env = EnvironmentResource::default();
        assert_relative_eq!(
            env.get_speed_of_sound(&Vector3::zeros()),
            340.29,
            epsilon = 0.1
        );
        assert_relative_eq!(
            env.get_speed_of_sound(&Vector3::new(0.0, 0.0, 15000.0)),
            295.07,
            epsilon = 0.1
        );
    }

    #[test]
    fn test_snapshot_near_ground() {
        let env = EnvironmentResource::default();
        assert!(env.snapshot(&Vector3::new(0.0, 0.0, 10.0)).near_ground);
        let high = env.snapshot(&Vector3::new(0.0, 0.0, 1000.0));
        assert!(!high.near_ground);
        assert_relative_eq!(high.height_above_ground(&Vector3::new(0.0, 0.0, 1000.0)), 1000.0);
    }
}
