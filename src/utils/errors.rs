use thiserror::Error;

/// Failures reported at the public boundary of the rigid-body integrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsError {
    #[error("Kinematic state has not been bound")]
    UnboundState,

    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f64),

    #[error("Invalid mass: {0}")]
    InvalidMass(f64),

    #[error("Inertia tensor is singular or non-finite")]
    SingularInertia,

    #[error("A ground collision contributor is already registered")]
    DuplicateGroundContributor,

    #[error("Attitude quaternion has zero magnitude")]
    DegenerateAttitude,

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}

pub type DynamicsResult<T> = std::result::Result<T, DynamicsError>;
