mod engine;

pub use engine::{EngineContributor, EngineState};
