use std::ops::{Add, AddAssign, Mul};

use nalgebra::{UnitQuaternion, Vector3};

use crate::components::ControlInputs;
use crate::resources::EnvironmentSnapshot;
use crate::systems::aerodynamics::AirData;
use crate::systems::ground::GroundCollisionContributor;
use crate::utils::{body_to_local, local_to_body, DynamicsError, DynamicsResult};

/// A force and moment pair, both in the body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceMoment {
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

impl Default for ForceMoment {
    fn default() -> Self {
        Self::zero()
    }
}

impl ForceMoment {
    pub fn new(force: Vector3<f64>, moment: Vector3<f64>) -> Self {
        Self { force, moment }
    }

    pub fn zero() -> Self {
        Self {
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }

    /// A force applied at `point` (body frame, relative to the centre of mass).
    pub fn at_point(force: Vector3<f64>, point: &Vector3<f64>) -> Self {
        Self {
            force,
            moment: point.cross(&force),
        }
    }
}

impl Add for ForceMoment {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            force: self.force + rhs.force,
            moment: self.moment + rhs.moment,
        }
    }
}

impl AddAssign for ForceMoment {
    fn add_assign(&mut self, rhs: Self) {
        self.force += rhs.force;
        self.moment += rhs.moment;
    }
}

impl Mul<f64> for ForceMoment {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            force: self.force * rhs,
            moment: self.moment * rhs,
        }
    }
}

/// Everything a contributor may read while computing its loads.
///
/// Built by the integrator for every derivative evaluation and for the
/// pre/post-step hooks.
#[derive(Debug, Clone, Copy)]
pub struct DynamicsContext<'a> {
    /// Time since the start of the current `do_sim_step` (s).
    pub sub_time: f64,
    /// Centre of mass, local frame (m).
    pub position: Vector3<f64>,
    pub attitude: UnitQuaternion<f64>,
    pub velocity_body: Vector3<f64>,
    pub angular_velocity_body: Vector3<f64>,
    pub air: AirData,
    /// Height of the centre of mass above the ground plane (m).
    pub height_above_ground: f64,
    /// Total mass including stores (kg). Zero for an immovable body.
    pub mass: f64,
    pub env: &'a EnvironmentSnapshot,
    pub controls: &'a ControlInputs,
}

impl<'a> DynamicsContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sub_time: f64,
        position: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        velocity_body: Vector3<f64>,
        angular_velocity_body: Vector3<f64>,
        mass: f64,
        env: &'a EnvironmentSnapshot,
        controls: &'a ControlInputs,
    ) -> Self {
        let wind_body = attitude.inverse_transform_vector(&env.wind);
        let air = AirData::compute(
            &velocity_body,
            &wind_body,
            env.density,
            env.speed_of_sound,
        );
        Self {
            sub_time,
            position,
            attitude,
            velocity_body,
            angular_velocity_body,
            air,
            height_above_ground: env.height_above_ground(&position),
            mass,
            env,
            controls,
        }
    }

    pub fn body_to_local(&self, v: &Vector3<f64>) -> Vector3<f64> {
        body_to_local(&self.attitude, v)
    }

    pub fn local_to_body(&self, v: &Vector3<f64>) -> Vector3<f64> {
        local_to_body(&self.attitude, v)
    }

    /// Velocity of a body-fixed point, body frame.
    pub fn point_velocity_body(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.velocity_body + self.angular_velocity_body.cross(point)
    }
}

/// A source of force and moment acting on a rigid body.
///
/// Within one `do_sim_step` the integrator calls, in this order:
/// `initialize_step` once, then for every sub-step `pre_step`,
/// `compute_force_and_moment` once per stage of the numerical method, and
/// `post_step`. State changes belong in the hooks; `compute_force_and_moment`
/// must return the same loads for the same context however often it is
/// called.
pub trait ForceContributor: Send + Sync {
    fn name(&self) -> &str;

    fn initialize_step(&mut self, _dt: f64) {}

    fn pre_step(&mut self, _dt: f64, _ctx: &DynamicsContext) {}

    /// Loads at the given state, body frame, about the centre of mass.
    fn compute_force_and_moment(&self, ctx: &DynamicsContext) -> ForceMoment;

    fn post_step(&mut self, _dt: f64, _ctx: &DynamicsContext) {}

    /// Loads recorded at the end of the last sub-step.
    fn loads(&self) -> ForceMoment;

    fn record_loads(&mut self, loads: ForceMoment);

    fn force(&self) -> Vector3<f64> {
        self.loads().force
    }

    fn moment(&self) -> Vector3<f64> {
        self.loads().moment
    }

    /// Fuel mass flow at the last recorded state (kg/s).
    fn fuel_flow(&self) -> f64 {
        0.0
    }
}

/// A contributor as registered with an integrator.
pub enum Contributor {
    Generic(Box<dyn ForceContributor>),
    GroundCollision(GroundCollisionContributor),
}

impl Contributor {
    pub fn generic(contributor: impl ForceContributor + 'static) -> Self {
        Contributor::Generic(Box::new(contributor))
    }
}

impl From<GroundCollisionContributor> for Contributor {
    fn from(contributor: GroundCollisionContributor) -> Self {
        Contributor::GroundCollision(contributor)
    }
}

impl From<Box<dyn ForceContributor>> for Contributor {
    fn from(contributor: Box<dyn ForceContributor>) -> Self {
        Contributor::Generic(contributor)
    }
}

/// Ordered generic contributors plus the single ground collision slot.
#[derive(Default)]
pub struct ContributorRegistry {
    generic: Vec<Box<dyn ForceContributor>>,
    ground: Option<GroundCollisionContributor>,
}

impl ContributorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, contributor: Contributor) -> DynamicsResult<()> {
        match contributor {
            Contributor::Generic(c) => self.generic.push(c),
            Contributor::GroundCollision(c) => {
                if self.ground.is_some() {
                    return Err(DynamicsError::DuplicateGroundContributor);
                }
                self.ground = Some(c);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.generic.len() + usize::from(self.ground.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ground(&self) -> Option<&GroundCollisionContributor> {
        self.ground.as_ref()
    }

    pub fn ground_mut(&mut self) -> Option<&mut GroundCollisionContributor> {
        self.ground.as_mut()
    }

    /// Generic contributors in registration order.
    pub fn generic(&self) -> impl Iterator<Item = &dyn ForceContributor> {
        self.generic.iter().map(|c| c.as_ref())
    }

    /// Every contributor, ground collision first.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ForceContributor> {
        self.ground
            .iter()
            .map(|g| g as &dyn ForceContributor)
            .chain(self.generic())
    }

    fn for_each_mut(&mut self, mut f: impl FnMut(&mut dyn ForceContributor)) {
        if let Some(ground) = self.ground.as_mut() {
            f(ground);
        }
        for contributor in self.generic.iter_mut() {
            f(contributor.as_mut());
        }
    }

    pub fn initialize_step(&mut self, dt: f64) {
        self.for_each_mut(|c| c.initialize_step(dt));
    }

    pub fn pre_step(&mut self, dt: f64, ctx: &DynamicsContext) {
        self.for_each_mut(|c| c.pre_step(dt, ctx));
    }

    pub fn post_step(&mut self, dt: f64, ctx: &DynamicsContext) {
        self.for_each_mut(|c| c.post_step(dt, ctx));
    }

    /// Summed loads of every contributor at `ctx`.
    pub fn total(&self, ctx: &DynamicsContext) -> ForceMoment {
        self.iter()
            .fold(ForceMoment::zero(), |acc, c| acc + c.compute_force_and_moment(ctx))
    }

    /// Evaluates every contributor at `ctx`, stores the result for
    /// inspection and returns the sum. Also refreshes the ground contact
    /// flags.
    pub fn record(&mut self, ctx: &DynamicsContext) -> ForceMoment {
        let mut total = ForceMoment::zero();
        if let Some(ground) = self.ground.as_mut() {
            total += ground.record_contact(ctx);
        }
        for contributor in self.generic.iter_mut() {
            let loads = contributor.compute_force_and_moment(ctx);
            contributor.record_loads(loads);
            total += loads;
        }
        total
    }

    pub fn fuel_flow(&self) -> f64 {
        self.iter().map(|c| c.fuel_flow()).sum()
    }
}
