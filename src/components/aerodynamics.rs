use serde::{Deserialize, Serialize};

/// Reference geometry used to dimensionalize aerodynamic coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftGeometry {
    /// The total wing area of the aircraft (m²).
    pub wing_area: f64,
    /// The wingspan of the aircraft (m).
    pub wing_span: f64,
    /// The mean aerodynamic chord of the aircraft (m).
    pub mac: f64,
}

impl AircraftGeometry {
    pub fn new(wing_area: f64, wing_span: f64, mac: f64) -> Self {
        AircraftGeometry {
            wing_area,
            wing_span,
            mac,
        }
    }

    pub fn f16() -> Self {
        Self::new(27.87, 9.144, 3.45)
    }
}

/// Stability and control derivatives for the linear aerodynamic model.
///
/// Angles and rates are in radians; control derivatives are per unit of
/// normalized command (see `ControlInputs`). Rate derivatives use the
/// non-dimensional rates `p̂ = p·b/2V`, `q̂ = q·c/2V`, `r̂ = r·b/2V` and
/// `α̇̂ = α̇·c/2V`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroCoefficients {
    pub lift: LiftCoefficients,
    pub drag: DragCoefficients,
    pub side_force: SideForceCoefficients,
    pub roll: RollCoefficients,
    pub pitch: PitchCoefficients,
    pub yaw: YawCoefficients,
    pub stall: StallModel,
    /// Lift boost at zero height above ground; fades out at one wingspan.
    pub ground_effect_gain: f64,
}

/// Lift coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiftCoefficients {
    /// Base lift coefficient (zero angle of attack).
    pub c_l_0: f64,
    /// Lift curve slope with respect to angle of attack (α).
    pub c_l_alpha: f64,
    /// Lift coefficient due to pitch rate (q̂).
    pub c_l_q: f64,
    /// Lift coefficient due to angle of attack rate (α̇̂).
    pub c_l_alpha_dot: f64,
    /// Lift coefficient due to elevator deflection.
    pub c_l_deltae: f64,
}

/// Drag coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragCoefficients {
    /// Parasite drag coefficient.
    pub c_d_0: f64,
    /// Drag penalty per unit of elevator deflection magnitude.
    pub c_d_deltae: f64,
    /// Drag penalty of a fully extended airbrake.
    pub c_d_airbrake: f64,
    /// Induced drag factor, multiplied by CL².
    pub c_d_induced: f64,
}

/// Side force coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SideForceCoefficients {
    /// Side-force coefficient due to sideslip angle (β).
    pub c_y_beta: f64,
    /// Side-force coefficient due to rudder deflection.
    pub c_y_deltar: f64,
    /// Side-force coefficient due to yaw rate (r̂).
    pub c_y_r: f64,
}

/// Roll moment coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RollCoefficients {
    pub c_l_beta: f64,
    pub c_l_p: f64,
    pub c_l_r: f64,
    pub c_l_deltaa: f64,
    pub c_l_deltar: f64,
}

/// Pitch moment coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitchCoefficients {
    pub c_m_0: f64,
    pub c_m_alpha: f64,
    pub c_m_q: f64,
    pub c_m_alpha_dot: f64,
    pub c_m_deltae: f64,
}

/// Yaw moment coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YawCoefficients {
    pub c_n_beta: f64,
    pub c_n_p: f64,
    pub c_n_r: f64,
    pub c_n_deltaa: f64,
    pub c_n_deltar: f64,
}

/// Quadratic post-stall lift loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StallModel {
    /// Angle of attack magnitude where the lift curve breaks (rad).
    pub angle: f64,
    /// Lift lost per radian² of excess angle.
    pub penalty: f64,
}

impl Default for StallModel {
    fn default() -> Self {
        Self {
            angle: 0.35,
            penalty: 8.0,
        }
    }
}

impl AeroCoefficients {
    pub fn f16() -> Self {
        Self {
            lift: LiftCoefficients {
                c_l_0: 0.1,
                c_l_alpha: 4.0,
                c_l_q: 3.0,
                c_l_alpha_dot: 1.0,
                c_l_deltae: 0.35,
            },
            drag: DragCoefficients {
                c_d_0: 0.021,
                c_d_deltae: 0.04,
                c_d_airbrake: 0.08,
                c_d_induced: 0.12,
            },
            side_force: SideForceCoefficients {
                c_y_beta: -1.0,
                c_y_deltar: -0.15,
                c_y_r: 0.4,
            },
            roll: RollCoefficients {
                c_l_beta: -0.1,
                c_l_p: -0.35,
                c_l_r: 0.1,
                c_l_deltaa: 0.08,
                c_l_deltar: -0.01,
            },
            pitch: PitchCoefficients {
                c_m_0: 0.0,
                c_m_alpha: -0.5,
                c_m_q: -5.0,
                c_m_alpha_dot: -2.0,
                c_m_deltae: 0.6,
            },
            yaw: YawCoefficients {
                c_n_beta: 0.12,
                c_n_p: -0.03,
                c_n_r: -0.3,
                c_n_deltaa: -0.005,
                c_n_deltar: 0.07,
            },
            stall: StallModel {
                angle: 0.44,
                penalty: 8.0,
            },
            ground_effect_gain: 0.25,
        }
    }
}
