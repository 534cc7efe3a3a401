pub mod aerodynamics;
pub mod controls;
pub mod gear;
pub mod kinematics;
pub mod mass;
pub mod propulsion;
pub mod stores;

pub use aerodynamics::{
    AeroCoefficients, AircraftGeometry, DragCoefficients, LiftCoefficients, PitchCoefficients,
    RollCoefficients, SideForceCoefficients, StallModel, YawCoefficients,
};
pub use controls::ControlInputs;
pub use gear::GearConfig;
pub use kinematics::KinematicState;
pub use mass::MassModel;
pub use propulsion::EngineConfig;
pub use stores::{Store, StoresConfig};
