use csp_flight::{
    components::{
        AeroCoefficients, AircraftGeometry, GearConfig, KinematicState, LiftCoefficients,
    },
    config::AircraftConfig,
    resources::{
        AtmosphereConfig, AtmosphereType, EnvironmentConfig, EnvironmentResource, PhysicsConfig,
    },
    systems::{
        ground::GroundCollisionContributor,
        physics::{Contributor, DynamicsContext, ForceContributor, ForceMoment, RigidBodyIntegrator},
    },
    utils::{GRAVITY, ISA_SEA_LEVEL_DENSITY},
};
use nalgebra::{Matrix3, Vector3};
use std::sync::{Arc, Mutex};

pub const TRIM_SPEED: f64 = 200.0;
pub const TRIM_ALTITUDE: f64 = 3000.0;

/// A contributor that always returns the same loads.
pub struct ConstantLoad {
    pub loads: ForceMoment,
    recorded: ForceMoment,
}

impl ConstantLoad {
    pub fn new(force: Vector3<f64>, moment: Vector3<f64>) -> Self {
        Self {
            loads: ForceMoment::new(force, moment),
            recorded: ForceMoment::zero(),
        }
    }
}

impl ForceContributor for ConstantLoad {
    fn name(&self) -> &str {
        "constant"
    }

    fn compute_force_and_moment(&self, _ctx: &DynamicsContext) -> ForceMoment {
        self.loads
    }

    fn loads(&self) -> ForceMoment {
        self.recorded
    }

    fn record_loads(&mut self, loads: ForceMoment) {
        self.recorded = loads;
    }
}

/// A contributor lifecycle call, as seen by `HookRecorder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Initialize,
    Pre,
    Compute,
    Post,
}

/// A zero-load contributor that logs every lifecycle call it receives.
pub struct HookRecorder {
    calls: Arc<Mutex<Vec<Hook>>>,
}

impl HookRecorder {
    /// The recorder plus a handle to its call log.
    pub fn new() -> (Self, Arc<Mutex<Vec<Hook>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn push(&self, hook: Hook) {
        self.calls.lock().unwrap().push(hook);
    }
}

impl ForceContributor for HookRecorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn initialize_step(&mut self, _dt: f64) {
        self.push(Hook::Initialize);
    }

    fn pre_step(&mut self, _dt: f64, _ctx: &DynamicsContext) {
        self.push(Hook::Pre);
    }

    fn compute_force_and_moment(&self, _ctx: &DynamicsContext) -> ForceMoment {
        self.push(Hook::Compute);
        ForceMoment::zero()
    }

    fn post_step(&mut self, _dt: f64, _ctx: &DynamicsContext) {
        self.push(Hook::Post);
    }

    fn loads(&self) -> ForceMoment {
        ForceMoment::zero()
    }

    fn record_loads(&mut self, _loads: ForceMoment) {}
}

/// Constant sea-level density at every altitude, no wind.
pub fn constant_atmosphere() -> EnvironmentConfig {
    EnvironmentConfig {
        atmosphere_config: AtmosphereConfig {
            model_type: AtmosphereType::Constant,
            ..AtmosphereConfig::default()
        },
        ..EnvironmentConfig::default()
    }
}

pub fn vacuum() -> EnvironmentResource {
    EnvironmentResource::new(&EnvironmentConfig::without_gravity())
}

/// A body with spherical inertia and a single zero-load contributor.
pub fn spherical_body(mass: f64, inertia: f64) -> RigidBodyIntegrator {
    let mut integrator = RigidBodyIntegrator::new(PhysicsConfig::default());
    integrator
        .set_inertia(mass, Matrix3::identity() * inertia)
        .expect("valid inertia");
    integrator
        .add_contributor(Contributor::generic(ConstantLoad::new(
            Vector3::zeros(),
            Vector3::zeros(),
        )))
        .expect("generic contributor");
    integrator
}

/// A 1000 kg block on one contact point 1 m below its centre of mass.
pub fn ground_block() -> RigidBodyIntegrator {
    let mut integrator = RigidBodyIntegrator::new(PhysicsConfig::default());
    integrator
        .set_inertia(1000.0, Matrix3::identity() * 1000.0)
        .expect("valid inertia");
    integrator
        .add_contributor(GroundCollisionContributor::single_point(1.0, 1.0e5, 1.5e4))
        .expect("ground contributor");
    integrator
}

/// A 1000 kg sled on four corner contact points 1 m below its centre of
/// mass, with the given friction coefficients.
pub fn ground_block_with_friction(rolling: f64, braking: f64) -> RigidBodyIntegrator {
    let mut integrator = RigidBodyIntegrator::new(PhysicsConfig::default());
    integrator
        .set_inertia(1000.0, Matrix3::identity() * 1000.0)
        .expect("valid inertia");
    let gear = GearConfig {
        contact_points: vec![
            Vector3::new(1.0, 1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, -1.0, -1.0),
        ],
        spring_constant: 1.0e5,
        impact_damping: 1.5e4,
        rolling_friction: rolling,
        braking_friction: braking,
        ..GearConfig::tricycle()
    };
    integrator
        .add_contributor(GroundCollisionContributor::new(gear))
        .expect("ground contributor");
    integrator
}

/// Glider whose zero-α lift exactly carries its weight at `TRIM_SPEED` in
/// sea-level air, with every other derivative zeroed.
pub fn trimmed_glider() -> AircraftConfig {
    let geometry = AircraftGeometry::f16();
    let mass = 9300.0;
    let dynamic_pressure = 0.5 * ISA_SEA_LEVEL_DENSITY * TRIM_SPEED * TRIM_SPEED;
    AircraftConfig {
        name: "trimmed glider".to_string(),
        mass,
        ixx: 75674.0,
        iyy: 12875.0,
        izz: 85552.0,
        iyz: 0.0,
        geometry,
        aero: AeroCoefficients {
            lift: LiftCoefficients {
                c_l_0: mass * GRAVITY / (dynamic_pressure * geometry.wing_area),
                ..LiftCoefficients::default()
            },
            ..AeroCoefficients::default()
        },
        engine: None,
        gear: None,
        stores: Default::default(),
    }
}

pub fn trimmed_state() -> KinematicState {
    KinematicState::level_flight(Vector3::new(0.0, 0.0, TRIM_ALTITUDE), TRIM_SPEED, 0.0)
}
