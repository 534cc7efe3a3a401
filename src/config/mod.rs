mod aircraft;
mod loader;

pub use aircraft::AircraftConfig;
pub use loader::{load, parse, save, ConfigError, ConfigFormat};
