use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{Table1D, Table2D, TableError};

/// Configuration for a jet engine with optional afterburner.
///
/// Thrust tables are indexed by altitude (m, rows) and Mach number (columns)
/// and give thrust in newtons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name of the powerplant
    pub name: String,
    pub idle_thrust: Table2D,
    pub military_thrust: Table2D,
    /// Absent for engines without reheat.
    #[serde(default)]
    pub afterburner_thrust: Option<Table2D>,
    /// Intake efficiency factor against angle of attack (rad).
    #[serde(default = "default_thrust_scale")]
    pub thrust_scale: Table1D,
    /// Thrust line origin relative to the centre of mass, body frame (m)
    #[serde(default)]
    pub offset: Vector3<f64>,
    /// Thrust line direction in the body frame; normalized on use.
    #[serde(default = "default_direction")]
    pub direction: Vector3<f64>,
    /// Thrust specific fuel consumption, dry (kg/N/s)
    pub tsfc: f64,
    /// Thrust specific fuel consumption with afterburner lit (kg/N/s)
    #[serde(default)]
    pub afterburner_tsfc: f64,
    /// Time constant for engine spool-up (s)
    pub spool_up_time: f64,
    /// Time constant for engine spool-down (s)
    pub spool_down_time: f64,
    /// Time constant for afterburner light-off and shutdown (s)
    #[serde(default = "default_afterburner_time")]
    pub afterburner_time: f64,
}

fn default_thrust_scale() -> Table1D {
    Table1D::constant(1.0)
}

fn default_direction() -> Vector3<f64> {
    Vector3::y()
}

fn default_afterburner_time() -> f64 {
    1.0
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), TableError> {
        self.idle_thrust.validate()?;
        self.military_thrust.validate()?;
        if let Some(table) = &self.afterburner_thrust {
            table.validate()?;
        }
        self.thrust_scale.validate()
    }

    /// A single afterburning turbofan in the F100 class.
    pub fn f100() -> Self {
        let altitudes = vec![0.0, 3000.0, 6000.0, 9000.0, 12000.0, 15000.0];
        let machs = vec![0.0, 0.4, 0.8, 1.2, 1.6, 2.0];
        Self {
            name: "F100-PW-220".to_string(),
            idle_thrust: Table2D {
                rows: altitudes.clone(),
                columns: machs.clone(),
                values: vec![
                    vec![4200.0, 2800.0, 1400.0, 0.0, 0.0, 0.0],
                    vec![3500.0, 2400.0, 1300.0, 300.0, 0.0, 0.0],
                    vec![2900.0, 2100.0, 1200.0, 500.0, 100.0, 0.0],
                    vec![2300.0, 1800.0, 1100.0, 600.0, 200.0, 0.0],
                    vec![1700.0, 1400.0, 1000.0, 700.0, 300.0, 100.0],
                    vec![1100.0, 1000.0, 800.0, 600.0, 300.0, 100.0],
                ],
            },
            military_thrust: Table2D {
                rows: altitudes.clone(),
                columns: machs.clone(),
                values: vec![
                    vec![64000.0, 60000.0, 60500.0, 58000.0, 50000.0, 42000.0],
                    vec![52000.0, 50000.0, 51500.0, 53000.0, 48000.0, 41000.0],
                    vec![41000.0, 40000.0, 42000.0, 45000.0, 44000.0, 39000.0],
                    vec![31000.0, 31500.0, 33500.0, 36500.0, 38000.0, 35000.0],
                    vec![21000.0, 22000.0, 24000.0, 27000.0, 30000.0, 29000.0],
                    vec![13000.0, 14000.0, 15500.0, 18000.0, 21000.0, 21500.0],
                ],
            },
            afterburner_thrust: Some(Table2D {
                rows: altitudes,
                columns: machs,
                values: vec![
                    vec![106000.0, 110000.0, 118000.0, 126000.0, 121000.0, 110000.0],
                    vec![86000.0, 91000.0, 99000.0, 110000.0, 114000.0, 106000.0],
                    vec![68000.0, 72000.0, 80000.0, 92000.0, 100000.0, 97000.0],
                    vec![51000.0, 55000.0, 62000.0, 73000.0, 83000.0, 84000.0],
                    vec![35000.0, 38000.0, 43000.0, 52000.0, 62000.0, 66000.0],
                    vec![22000.0, 24000.0, 28000.0, 34000.0, 42000.0, 46000.0],
                ],
            }),
            thrust_scale: Table1D {
                breakpoints: vec![-0.6, -0.2, 0.0, 0.35, 0.6, 1.0],
                values: vec![0.75, 0.95, 1.0, 1.0, 0.85, 0.6],
            },
            offset: Vector3::new(0.0, -5.0, 0.0),
            direction: Vector3::y(),
            tsfc: 0.76 / 3600.0 / 9.81,
            afterburner_tsfc: 2.05 / 3600.0 / 9.81,
            spool_up_time: 2.5,
            spool_down_time: 1.5,
            afterburner_time: 0.8,
        }
    }
}
