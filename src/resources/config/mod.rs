pub mod environment;
pub mod physics;

pub use environment::{
    AtmosphereConfig, AtmosphereType, EnvironmentConfig, GroundPlaneConfig, WindModelConfig,
};
pub use physics::{PhysicsConfig, ZeroDtPolicy};
