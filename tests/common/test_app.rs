use bevy::prelude::*;
use csp_flight::{
    components::{ControlInputs, KinematicState},
    plugins::FlightDynamicsPlugin,
    resources::{EnvironmentConfig, PhysicsConfig},
    systems::physics::RigidBodyIntegrator,
};

/// Builder for a headless app running only the flight dynamics plugin
#[derive(Default)]
pub struct TestAppBuilder {
    physics_config: Option<PhysicsConfig>,
    environment_config: Option<EnvironmentConfig>,
    bodies: Vec<(RigidBodyIntegrator, KinematicState, ControlInputs)>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics_config = Some(config);
        self
    }

    pub fn with_environment(mut self, config: EnvironmentConfig) -> Self {
        self.environment_config = Some(config);
        self
    }

    pub fn with_body(
        mut self,
        integrator: RigidBodyIntegrator,
        state: KinematicState,
        controls: ControlInputs,
    ) -> Self {
        self.bodies.push((integrator, state, controls));
        self
    }

    pub fn build(self) -> TestApp {
        let mut app = App::new();
        app.add_plugins(FlightDynamicsPlugin::new(
            self.physics_config.unwrap_or_default(),
            self.environment_config.unwrap_or_default(),
        ));

        let entities = self
            .bodies
            .into_iter()
            .map(|body| app.world_mut().spawn(body).id())
            .collect();

        TestApp { app, entities }
    }
}

/// Test application wrapper stepping the fixed schedule directly
pub struct TestApp {
    pub app: App,
    pub entities: Vec<Entity>,
}

impl TestApp {
    /// Runs `FixedUpdate` `steps` times, independent of wall-clock time.
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.app.world().get::<T>(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<Mut<T>> {
        self.app.world_mut().get_mut::<T>(entity)
    }

    pub fn resource<T: Resource>(&self) -> Option<&T> {
        self.app.world().get_resource::<T>()
    }
}
