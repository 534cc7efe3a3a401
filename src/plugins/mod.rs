mod physics;

pub use physics::{FlightDynamicsPlugin, PhysicsSet};
