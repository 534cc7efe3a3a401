use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use super::contributor::{Contributor, ContributorRegistry, DynamicsContext, ForceMoment};
use super::numerical::{NumericalMethod, RungeKutta4};
use super::state_vector::{BodyState, StateVector};
use crate::components::{ControlInputs, KinematicState, MassModel, Store, StoresConfig};
use crate::resources::{EnvironmentResource, EnvironmentSnapshot, PhysicsConfig, ZeroDtPolicy};
use crate::systems::aerodynamics::AirData;
use crate::systems::ground::GroundCollisionContributor;
use crate::systems::stores::{StoresDescriptor, StoresDynamics};
use crate::utils::constants::GRAVITY;
use crate::utils::{
    attitude_from_raw, normalize_or_keep, quaternion_derivative, DynamicsError, DynamicsResult,
};

/// Outcome of one `do_sim_step` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Time actually integrated (s).
    pub dt: f64,
    pub substeps: u32,
    pub substep_dt: f64,
    /// A zero `dt` was replaced by the configured default.
    pub substituted_dt: bool,
}

/// Derived values from the end of the last step, for HUD and logging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telemetry {
    /// Summed contributor force, gravity excluded, body frame (N).
    pub force: Vector3<f64>,
    /// Summed contributor moment, body frame (N·m).
    pub moment: Vector3<f64>,
    /// Normal load factor (G) along body z.
    pub load_factor: f64,
    pub alpha: f64,
    pub beta: f64,
    pub airspeed: f64,
    pub mach: f64,
    pub has_contact: bool,
    pub needs_impulse: bool,
    /// Total fuel mass flow (kg/s).
    pub fuel_flow: f64,
    pub substeps: u32,
}

/// Position and attitude at the start of a sub-step; the state vector's
/// position delta is expressed in this attitude's body frame.
#[derive(Debug, Clone, Copy)]
struct SubstepFrame {
    position: Vector3<f64>,
    attitude: UnitQuaternion<f64>,
}

/// Read-only inputs of the state derivative for one sub-step.
struct DerivativeInputs<'a> {
    mass: &'a MassModel,
    contributors: &'a ContributorRegistry,
    stores: &'a StoresDescriptor,
    env: &'a EnvironmentSnapshot,
    controls: &'a ControlInputs,
}

impl DerivativeInputs<'_> {
    fn evaluate(&self, frame: &SubstepFrame, sub_time: f64, y: &StateVector) -> StateVector {
        let s = BodyState::decode(y);
        let orientation = normalize_or_keep(s.orientation);
        let attitude = attitude_from_raw(orientation);
        let velocity = s.velocity;
        let omega = s.angular_velocity;

        let ctx = DynamicsContext::new(
            sub_time,
            frame.position + frame.attitude.transform_vector(&s.position_delta),
            attitude,
            velocity,
            omega,
            self.mass.mass,
            self.env,
            self.controls,
        );

        let mut total = self.contributors.total(&ctx);
        total += self.stores.drag(&ctx.air);
        let weight = Vector3::new(0.0, 0.0, -self.env.gravity * self.mass.mass);
        total.force += attitude.inverse_transform_vector(&weight);

        let linear = total.force * self.mass.mass_inv - omega.cross(&velocity);
        let angular =
            self.mass.inertia_inv * (total.moment - omega.cross(&(self.mass.inertia * omega)));
        let position_rate = frame
            .attitude
            .inverse_transform_vector(&attitude.transform_vector(&velocity));

        BodyState {
            position_delta: position_rate,
            velocity: linear,
            angular_velocity: angular,
            orientation: quaternion_derivative(&orientation, &omega),
        }
        .encode()
    }
}

/// Advances one rigid body under the summed loads of its contributors.
#[derive(Component)]
pub struct RigidBodyIntegrator {
    config: PhysicsConfig,
    state: Option<KinematicState>,
    base_mass: MassModel,
    mass: MassModel,
    stores: StoresDynamics,
    stores_revision: u64,
    contributors: ContributorRegistry,
    method: Box<dyn NumericalMethod>,
    controls: ControlInputs,
    telemetry: Telemetry,
}

impl Default for RigidBodyIntegrator {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl RigidBodyIntegrator {
    pub fn new(config: PhysicsConfig) -> Self {
        let stores = StoresDynamics::default();
        Self {
            config,
            state: None,
            base_mass: MassModel::immovable(),
            mass: MassModel::immovable(),
            stores_revision: stores.revision(),
            stores,
            contributors: ContributorRegistry::new(),
            method: Box::new(RungeKutta4),
            controls: ControlInputs::default(),
            telemetry: Telemetry::default(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Takes ownership of the kinematic state advanced by `do_sim_step`.
    pub fn bind_state(&mut self, state: KinematicState) -> DynamicsResult<()> {
        if !state.is_finite() {
            return Err(DynamicsError::NonFinite("bound state"));
        }
        if state.attitude.quaternion().norm() < f64::EPSILON {
            return Err(DynamicsError::DegenerateAttitude);
        }
        self.state = Some(state);
        Ok(())
    }

    pub fn unbind_state(&mut self) -> Option<KinematicState> {
        self.state.take()
    }

    pub fn state(&self) -> Option<&KinematicState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut KinematicState> {
        self.state.as_mut()
    }

    /// Registers a force source. Generic contributors keep their
    /// registration order; only one ground collision contributor is allowed.
    pub fn add_contributor(&mut self, contributor: impl Into<Contributor>) -> DynamicsResult<()> {
        let contributor = contributor.into();
        if let Contributor::Generic(c) = &contributor {
            debug!("Registering contributor '{}'", c.name());
        }
        self.contributors.add(contributor)
    }

    pub fn contributors(&self) -> &ContributorRegistry {
        &self.contributors
    }

    pub fn ground(&self) -> Option<&GroundCollisionContributor> {
        self.contributors.ground()
    }

    /// Sets the airframe mass and inertia tensor; stores are added on top.
    pub fn set_inertia(&mut self, mass: f64, inertia: nalgebra::Matrix3<f64>) -> DynamicsResult<()> {
        self.set_mass_model(MassModel::new(mass, inertia)?)
    }

    pub fn set_mass_model(&mut self, mass: MassModel) -> DynamicsResult<()> {
        self.base_mass = mass;
        self.refresh_mass()
    }

    /// Total mass properties including stores.
    pub fn mass(&self) -> &MassModel {
        &self.mass
    }

    /// Replaces the carried stores and folds them into the mass totals.
    pub fn set_stores(&mut self, config: StoresConfig) -> DynamicsResult<()> {
        self.stores = StoresDynamics::new(config);
        self.refresh_mass()
    }

    /// Drops a store and removes its mass from the totals straight away.
    pub fn release_store(&mut self, name: &str) -> DynamicsResult<Option<Store>> {
        let released = self.stores.release(name);
        if released.is_some() {
            self.refresh_mass()?;
        }
        Ok(released)
    }

    pub fn stores(&self) -> &StoresDynamics {
        &self.stores
    }

    pub fn set_controls(&mut self, controls: ControlInputs) {
        self.controls = controls.clamped();
    }

    pub fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    pub fn set_numerical_method(&mut self, method: Box<dyn NumericalMethod>) {
        debug!("Using numerical method '{}'", method.name());
        self.method = method;
    }

    pub fn numerical_method(&self) -> &dyn NumericalMethod {
        self.method.as_ref()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Advances the bound state by `dt`, sampling the environment once at
    /// its current position.
    pub fn do_sim_step(&mut self, dt: f64, env: &EnvironmentResource) -> DynamicsResult<StepReport> {
        let mut state = self.state.ok_or(DynamicsError::UnboundState)?;
        let report = self.step_with(&mut state, dt, env)?;
        self.state = Some(state);
        Ok(report)
    }

    /// Advances an externally owned state, borrowed for this call only.
    pub fn step_with(
        &mut self,
        state: &mut KinematicState,
        dt: f64,
        env: &EnvironmentResource,
    ) -> DynamicsResult<StepReport> {
        let snapshot = env.snapshot(&state.position);
        self.advance(state, dt, &snapshot)
    }

    /// Advances `state` by `dt` under a fixed environment snapshot.
    ///
    /// On error the state is left untouched.
    pub fn advance(
        &mut self,
        state: &mut KinematicState,
        dt: f64,
        env: &EnvironmentSnapshot,
    ) -> DynamicsResult<StepReport> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(DynamicsError::InvalidTimestep(dt));
        }
        if !state.is_finite() {
            return Err(DynamicsError::NonFinite("kinematic state"));
        }
        if state.attitude.quaternion().norm() < f64::EPSILON {
            return Err(DynamicsError::DegenerateAttitude);
        }

        let (dt, substituted_dt) = if dt == 0.0 {
            match self.config.zero_dt_policy {
                ZeroDtPolicy::Substitute => {
                    debug!("Zero timestep, integrating {} s instead", self.config.default_dt);
                    (self.config.default_dt, true)
                }
                ZeroDtPolicy::Skip => {
                    debug!("Zero timestep, skipping step");
                    return Ok(StepReport::default());
                }
            }
        } else {
            (dt, false)
        };

        if self.stores.revision() != self.stores_revision {
            self.refresh_mass()?;
        }

        let substeps =
            self.config
                .substep_count(dt, env.near_ground, state.angular_velocity.norm());
        let substep_dt = dt / substeps as f64;

        self.contributors.initialize_step(substep_dt);

        let mut work = *state;
        let mut last = (ForceMoment::zero(), AirData::default());
        for i in 0..substeps {
            last = self.substep(&mut work, i as f64 * substep_dt, substep_dt, env);
        }

        if !work.is_finite() {
            error!("Integration produced a non-finite state, keeping previous state");
            return Err(DynamicsError::NonFinite("integrated state"));
        }
        *state = work;

        self.update_telemetry(last.0, &last.1, substeps);
        Ok(StepReport {
            dt,
            substeps,
            substep_dt,
            substituted_dt,
        })
    }

    fn substep(
        &mut self,
        work: &mut KinematicState,
        start: f64,
        dt: f64,
        env: &EnvironmentSnapshot,
    ) -> (ForceMoment, AirData) {
        let controls = self.controls;
        let mass = self.mass.mass;
        let frame = SubstepFrame {
            position: work.position,
            attitude: work.attitude,
        };
        let velocity_body = work.velocity_body();
        let angular_velocity_body = work.angular_velocity_body();

        let ctx = DynamicsContext::new(
            start,
            work.position,
            work.attitude,
            velocity_body,
            angular_velocity_body,
            mass,
            env,
            &controls,
        );
        self.contributors.pre_step(dt, &ctx);

        let y0 = BodyState {
            position_delta: Vector3::zeros(),
            velocity: velocity_body,
            angular_velocity: angular_velocity_body,
            orientation: work.attitude.into_inner(),
        }
        .encode();

        let inputs = DerivativeInputs {
            mass: &self.mass,
            contributors: &self.contributors,
            stores: self.stores.descriptor(),
            env,
            controls: &controls,
        };
        let y1 = self
            .method
            .integrate(start, dt, &y0, &mut |t, y| inputs.evaluate(&frame, t, y));
        let s = BodyState::decode(&y1);

        let attitude = attitude_from_raw(s.orientation);
        let mut position = frame.position + frame.attitude.transform_vector(&s.position_delta);
        let mut velocity = attitude.transform_vector(&s.velocity);
        let end = DynamicsContext::new(
            start + dt,
            position,
            attitude,
            s.velocity,
            s.angular_velocity,
            mass,
            env,
            &controls,
        );
        let loads = self.contributors.record(&end) + self.stores.descriptor().drag(&end.air);

        if let Some(ground) = self.contributors.ground() {
            if ground.has_contact() {
                let normal = env.ground_normal;
                let correction = ground.penetration_correction();
                if correction > 0.0 {
                    debug!("Ground penetration, lifting body by {:.3} m", correction);
                    position += normal * correction;
                }
                let normal_speed = velocity.dot(&normal);
                if normal_speed < 0.0 {
                    if ground.needs_impulse() {
                        debug!("Ground impulse, cancelling {:.2} m/s sink rate", -normal_speed);
                        velocity -= normal * normal_speed;
                    } else {
                        velocity -= normal * (normal_speed * self.config.ground_contact_damping);
                    }
                }
            }
        }

        let angular_velocity = attitude.transform_vector(&s.angular_velocity);
        let post = DynamicsContext::new(
            start + dt,
            position,
            attitude,
            attitude.inverse_transform_vector(&velocity),
            s.angular_velocity,
            mass,
            env,
            &controls,
        );
        self.contributors.post_step(dt, &post);

        work.position = position;
        work.velocity = velocity;
        work.angular_velocity = angular_velocity;
        work.attitude = attitude;
        (loads, post.air)
    }

    fn refresh_mass(&mut self) -> DynamicsResult<()> {
        let stores = self.stores.descriptor();
        self.mass = self.base_mass.combined(stores.mass, &stores.inertia)?;
        self.stores_revision = self.stores.revision();
        Ok(())
    }

    fn update_telemetry(&mut self, loads: ForceMoment, air: &AirData, substeps: u32) {
        let ground = self.contributors.ground();
        let load_factor = if self.mass.mass > 0.0 {
            loads.force.z / (self.mass.mass * GRAVITY)
        } else {
            0.0
        };
        self.telemetry = Telemetry {
            force: loads.force,
            moment: loads.moment,
            load_factor,
            alpha: air.alpha,
            beta: air.beta,
            airspeed: air.true_airspeed,
            mach: air.mach,
            has_contact: ground.is_some_and(|g| g.has_contact()),
            needs_impulse: ground.is_some_and(|g| g.needs_impulse()),
            fuel_flow: self.contributors.fuel_flow(),
            substeps,
        };
    }
}

/// Steps every body with an integrator once per fixed update.
pub fn flight_dynamics_system(
    mut bodies: Query<(
        Entity,
        &mut RigidBodyIntegrator,
        &mut KinematicState,
        Option<&ControlInputs>,
    )>,
    env: Res<EnvironmentResource>,
    config: Res<PhysicsConfig>,
) {
    for (entity, mut integrator, mut state, controls) in bodies.iter_mut() {
        if let Some(controls) = controls {
            integrator.set_controls(*controls);
        }
        if let Err(e) = integrator.step_with(&mut state, config.timestep, &env) {
            warn!("Flight dynamics step failed for {:?}: {}", entity, e);
        }
    }
}
