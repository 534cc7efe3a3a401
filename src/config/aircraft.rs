use std::path::Path;

use bevy::log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::loader::{self, ConfigError, ConfigFormat};
use crate::components::{
    AeroCoefficients, AircraftGeometry, EngineConfig, GearConfig, MassModel, Store, StoresConfig,
};
use crate::resources::PhysicsConfig;
use crate::systems::aerodynamics::AerodynamicsContributor;
use crate::systems::ground::GroundCollisionContributor;
use crate::systems::physics::{Contributor, RigidBodyIntegrator};
use crate::systems::propulsion::EngineContributor;
use crate::utils::DynamicsResult;

/// Everything needed to build a fully populated integrator for one aircraft.
///
/// Inertia terms are about the body axes: x right (pitch), y forward (roll)
/// and z up (yaw). `iyz` is the roll/yaw product of inertia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftConfig {
    /// Name of the aircraft
    pub name: String,

    /// Mass properties
    pub mass: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    #[serde(default)]
    pub iyz: f64,

    /// Reference geometry
    pub geometry: AircraftGeometry,

    /// Aerodynamic derivatives
    #[serde(default)]
    pub aero: AeroCoefficients,

    #[serde(default)]
    pub engine: Option<EngineConfig>,

    #[serde(default)]
    pub gear: Option<GearConfig>,

    #[serde(default)]
    pub stores: StoresConfig,
}

impl AircraftConfig {
    /// Loads and validates an aircraft from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: Self = loader::load(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Self = loader::parse(contents, format)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| ConfigError::ValidationError(format!("{}: {}", self.name, msg));

        self.mass_model().map_err(|e| invalid(e.to_string()))?;

        let g = &self.geometry;
        if !(g.wing_area > 0.0 && g.wing_span > 0.0 && g.mac > 0.0) {
            return Err(invalid(format!(
                "geometry must be positive, got area {} span {} chord {}",
                g.wing_area, g.wing_span, g.mac
            )));
        }
        if !(self.aero.stall.angle > 0.0) || self.aero.stall.penalty < 0.0 {
            return Err(invalid("stall angle must be positive".to_string()));
        }
        if let Some(engine) = &self.engine {
            engine
                .validate()
                .map_err(|e| invalid(format!("engine '{}': {}", engine.name, e)))?;
            if engine.tsfc < 0.0 || engine.spool_up_time < 0.0 || engine.spool_down_time < 0.0 {
                return Err(invalid(format!(
                    "engine '{}' needs non-negative fuel consumption and spool times",
                    engine.name
                )));
            }
        }
        if let Some(gear) = &self.gear {
            gear.validate().map_err(invalid)?;
        }
        self.stores.validate().map_err(invalid)?;
        Ok(())
    }

    /// Airframe mass properties, stores excluded.
    pub fn mass_model(&self) -> DynamicsResult<MassModel> {
        MassModel::from_moments(self.mass, self.ixx, self.iyy, self.izz, self.iyz)
    }

    /// Builds an integrator with the aerodynamics, engine, gear and stores
    /// of this aircraft registered. The kinematic state is left unbound.
    pub fn build_integrator(
        &self,
        physics: PhysicsConfig,
    ) -> Result<RigidBodyIntegrator, ConfigError> {
        self.validate()?;
        physics.validate().map_err(ConfigError::ValidationError)?;

        let mut integrator = RigidBodyIntegrator::new(physics);
        integrator.set_mass_model(self.mass_model()?)?;
        integrator.set_stores(self.stores.clone())?;

        if let Some(gear) = &self.gear {
            integrator.add_contributor(GroundCollisionContributor::new(gear.clone()))?;
        }
        integrator.add_contributor(Contributor::generic(AerodynamicsContributor::new(
            self.geometry,
            self.aero,
        )))?;
        if let Some(engine) = &self.engine {
            integrator.add_contributor(Contributor::generic(EngineContributor::new(
                engine.clone(),
            )))?;
        }

        info!(
            "Built integrator for {} with {} contributors, mass {:.0} kg",
            self.name,
            integrator.contributors().len(),
            integrator.mass().mass
        );
        Ok(integrator)
    }

    /// A light single-engine fighter with a tricycle undercarriage and two
    /// wing tanks.
    pub fn f16_like() -> Self {
        Self {
            name: "F-16".to_string(),
            mass: 9300.0,
            ixx: 75674.0,
            iyy: 12875.0,
            izz: 85552.0,
            iyz: 1331.0,
            geometry: AircraftGeometry::f16(),
            aero: AeroCoefficients::f16(),
            engine: Some(EngineConfig::f100()),
            gear: Some(GearConfig::tricycle()),
            stores: StoresConfig {
                stores: vec![
                    Store::new("left tank", 1100.0, Vector3::new(-2.1, 0.3, -0.5), 0.18),
                    Store::new("right tank", 1100.0, Vector3::new(2.1, 0.3, -0.5), 0.18),
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preset_is_valid() {
        let config = AircraftConfig::f16_like();
        assert!(config.validate().is_ok());
        let integrator = config.build_integrator(PhysicsConfig::default()).unwrap();
        assert_eq!(integrator.contributors().len(), 3);
        assert!(integrator.ground().is_some());
        assert_eq!(integrator.mass().mass, 9300.0 + 2200.0);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let config = AircraftConfig {
            geometry: AircraftGeometry::new(0.0, 9.0, 3.0),
            ..AircraftConfig::f16_like()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_negative_mass() {
        let config = AircraftConfig {
            mass: -10.0,
            ..AircraftConfig::f16_like()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AircraftConfig::f16_like();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = AircraftConfig::parse_str(&yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
