mod contributor;
mod integrator;
mod numerical;
mod state_vector;

pub use contributor::{
    Contributor, ContributorRegistry, DynamicsContext, ForceContributor, ForceMoment,
};
pub use integrator::{flight_dynamics_system, RigidBodyIntegrator, StepReport, Telemetry};
pub use numerical::{Derivative, Heun, NumericalMethod, RungeKutta4};
pub use state_vector::{BodyState, StateVector, STATE_DIM};
