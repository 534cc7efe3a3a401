pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const AIR_GAS_CONSTANT: f64 = 287.05287; // J/(kg·K)
pub const AIR_HEAT_CAPACITY_RATIO: f64 = 1.4;
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3
pub const ISA_LAPSE_RATE: f64 = -0.0065; // K/m
pub const ISA_TROPOPAUSE_ALTITUDE: f64 = 11_000.0; // m
pub const ISA_TROPOPAUSE_TEMP: f64 = 216.65; // K

/// Frame time substituted for a zero-length step.
pub const DEFAULT_FRAME_TIME: f64 = 0.017; // s

// Integration limits
pub const MAX_SUBSTEPS: u32 = 10;
pub const SUBSTEP_RATE: f64 = 60.0; // Hz

/// Below this airspeed aerodynamic loads are not evaluated.
pub const MIN_AIRSPEED: f64 = 0.5; // m/s
