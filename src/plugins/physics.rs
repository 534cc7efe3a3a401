use bevy::prelude::*;

use crate::resources::{EnvironmentConfig, EnvironmentResource, PhysicsConfig};
use crate::systems::physics::flight_dynamics_system;

/// Flight dynamics stages within `FixedUpdate`.
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum PhysicsSet {
    /// Writers of `ControlInputs` run here.
    Controls,
    Integration,
}

/// Steps every entity carrying a `RigidBodyIntegrator` and a
/// `KinematicState` at the configured fixed rate.
#[derive(Default)]
pub struct FlightDynamicsPlugin {
    pub physics: PhysicsConfig,
    pub environment: EnvironmentConfig,
}

impl FlightDynamicsPlugin {
    pub fn new(physics: PhysicsConfig, environment: EnvironmentConfig) -> Self {
        Self {
            physics,
            environment,
        }
    }
}

impl Plugin for FlightDynamicsPlugin {
    fn build(&self, app: &mut App) {
        let physics = match self.physics.validate() {
            Ok(()) => self.physics.clone(),
            Err(e) => {
                warn!("Physics configuration is invalid ({}), using defaults", e);
                PhysicsConfig::default()
            }
        };

        app.insert_resource(Time::<Fixed>::from_seconds(physics.timestep));
        app.insert_resource(EnvironmentResource::new(&self.environment));
        app.insert_resource(physics);

        app.configure_sets(
            FixedUpdate,
            (PhysicsSet::Controls, PhysicsSet::Integration).chain(),
        );

        app.add_systems(
            FixedUpdate,
            flight_dynamics_system.in_set(PhysicsSet::Integration),
        );
    }
}
