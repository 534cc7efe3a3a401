pub mod config;
mod environment;

pub use config::{
    AtmosphereConfig, AtmosphereType, EnvironmentConfig, GroundPlaneConfig, PhysicsConfig,
    WindModelConfig, ZeroDtPolicy,
};
pub use environment::{EnvironmentResource, EnvironmentSnapshot};
