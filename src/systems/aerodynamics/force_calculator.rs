use nalgebra::Vector3;

use crate::components::{AeroCoefficients, AircraftGeometry, ControlInputs};
use crate::systems::physics::{DynamicsContext, ForceContributor, ForceMoment};

use super::air_data::AirData;

/// Non-dimensional body rates and α̇ used by the rate derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedRates {
    /// Roll rate, right wing down positive (p·b/2V).
    pub p_hat: f64,
    /// Pitch rate, nose up positive (q·c/2V).
    pub q_hat: f64,
    /// Yaw rate, nose right positive (r·b/2V).
    pub r_hat: f64,
    /// Angle of attack rate (α̇·c/2V).
    pub alpha_dot_hat: f64,
}

impl NormalizedRates {
    /// Body axes are x right, y nose, z up: pitch is about +x, roll about +y
    /// and a nose-right yaw is about -z.
    pub fn new(
        geometry: &AircraftGeometry,
        angular_velocity_body: &Vector3<f64>,
        alpha_dot: f64,
        airspeed: f64,
    ) -> Self {
        let span_factor = geometry.wing_span / (2.0 * airspeed);
        let chord_factor = geometry.mac / (2.0 * airspeed);
        Self {
            p_hat: angular_velocity_body.y * span_factor,
            q_hat: angular_velocity_body.x * chord_factor,
            r_hat: -angular_velocity_body.z * span_factor,
            alpha_dot_hat: alpha_dot * chord_factor,
        }
    }
}

/// Aerodynamic coefficients at one flight condition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AeroCoefficientSet {
    pub c_l: f64,
    pub c_d: f64,
    pub c_y: f64,
    pub c_roll: f64,
    pub c_m: f64,
    pub c_n: f64,
}

/// Lift, drag and side force plus the three moments from a linear table of
/// stability and control derivatives.
#[derive(Debug, Clone)]
pub struct AerodynamicsContributor {
    geometry: AircraftGeometry,
    coefficients: AeroCoefficients,
    /// α at the end of the last sub-step, once one has been seen.
    last_alpha: Option<f64>,
    alpha_dot: f64,
    loads: ForceMoment,
}

impl AerodynamicsContributor {
    pub fn new(geometry: AircraftGeometry, coefficients: AeroCoefficients) -> Self {
        Self {
            geometry,
            coefficients,
            last_alpha: None,
            alpha_dot: 0.0,
            loads: ForceMoment::zero(),
        }
    }

    pub fn geometry(&self) -> &AircraftGeometry {
        &self.geometry
    }

    pub fn coefficients(&self) -> &AeroCoefficients {
        &self.coefficients
    }

    /// Current estimate of α̇ (rad/s).
    pub fn alpha_dot(&self) -> f64 {
        self.alpha_dot
    }

    /// Lift coefficient before ground effect.
    ///
    /// Past the stall angle the α term is held at its stall value and the
    /// result loses `penalty · excess²`, never crossing zero.
    pub fn lift_coefficient(
        &self,
        alpha: f64,
        rates: &NormalizedRates,
        controls: &ControlInputs,
    ) -> f64 {
        let lift = &self.coefficients.lift;
        let stall = &self.coefficients.stall;
        let effective_alpha = alpha.clamp(-stall.angle, stall.angle);
        let c_l = lift.c_l_0
            + lift.c_l_alpha * effective_alpha
            + lift.c_l_q * rates.q_hat
            + lift.c_l_alpha_dot * rates.alpha_dot_hat
            + lift.c_l_deltae * controls.elevator;

        let excess = alpha.abs() - stall.angle;
        if excess <= 0.0 {
            return c_l;
        }
        let loss = stall.penalty * excess * excess;
        if alpha > 0.0 {
            (c_l - loss).max(0.0)
        } else {
            (c_l + loss).min(0.0)
        }
    }

    /// Lift multiplier near the ground: 1 at or above one wingspan, rising
    /// smoothly to `1 + ground_effect_gain` at zero height.
    pub fn ground_effect(&self, height_above_ground: f64) -> f64 {
        let span = self.geometry.wing_span;
        if span <= 0.0 || height_above_ground >= span {
            return 1.0;
        }
        let closeness = 1.0 - height_above_ground.max(0.0) / span;
        1.0 + self.coefficients.ground_effect_gain * closeness * closeness
    }

    pub fn coefficient_set(
        &self,
        air: &AirData,
        rates: &NormalizedRates,
        controls: &ControlInputs,
        height_above_ground: f64,
    ) -> AeroCoefficientSet {
        let c = &self.coefficients;
        let (alpha, beta) = (air.alpha, air.beta);

        let c_l_clean = self.lift_coefficient(alpha, rates, controls);
        let c_d = c.drag.c_d_0
            + c.drag.c_d_deltae * controls.elevator.abs()
            + c.drag.c_d_airbrake * controls.airbrake
            + c.drag.c_d_induced * c_l_clean * c_l_clean;

        let c_y = c.side_force.c_y_beta * beta
            + c.side_force.c_y_deltar * controls.rudder
            + c.side_force.c_y_r * rates.r_hat;

        let c_roll = c.roll.c_l_beta * beta
            + c.roll.c_l_p * rates.p_hat
            + c.roll.c_l_r * rates.r_hat
            + c.roll.c_l_deltaa * controls.aileron
            + c.roll.c_l_deltar * controls.rudder;

        let c_m = c.pitch.c_m_0
            + c.pitch.c_m_alpha * alpha
            + c.pitch.c_m_q * rates.q_hat
            + c.pitch.c_m_alpha_dot * rates.alpha_dot_hat
            + c.pitch.c_m_deltae * controls.elevator;

        let c_n = c.yaw.c_n_beta * beta
            + c.yaw.c_n_p * rates.p_hat
            + c.yaw.c_n_r * rates.r_hat
            + c.yaw.c_n_deltaa * controls.aileron
            + c.yaw.c_n_deltar * controls.rudder;

        AeroCoefficientSet {
            c_l: c_l_clean * self.ground_effect(height_above_ground),
            c_d,
            c_y,
            c_roll,
            c_m,
            c_n,
        }
    }

    /// Dimensional loads in the body frame for a coefficient set.
    pub fn loads_from(&self, air: &AirData, set: &AeroCoefficientSet) -> ForceMoment {
        let qs = air.dynamic_pressure * self.geometry.wing_area;
        let flow = air.relative_velocity / air.true_airspeed;
        let (sin_a, cos_a) = air.alpha.sin_cos();

        let drag_axis = -flow;
        let lift_axis = Vector3::new(0.0, sin_a, cos_a);
        let side_axis = Vector3::x();

        let force = qs * (set.c_d * drag_axis + set.c_l * lift_axis + set.c_y * side_axis);
        let moment = Vector3::new(
            qs * self.geometry.mac * set.c_m,
            qs * self.geometry.wing_span * set.c_roll,
            -qs * self.geometry.wing_span * set.c_n,
        );
        ForceMoment::new(force, moment)
    }
}

impl ForceContributor for AerodynamicsContributor {
    fn name(&self) -> &str {
        "aerodynamics"
    }

    fn compute_force_and_moment(&self, ctx: &DynamicsContext) -> ForceMoment {
        let air = &ctx.air;
        if !air.has_airflow() {
            return ForceMoment::zero();
        }
        let rates = NormalizedRates::new(
            &self.geometry,
            &ctx.angular_velocity_body,
            self.alpha_dot,
            air.true_airspeed,
        );
        let set = self.coefficient_set(air, &rates, ctx.controls, ctx.height_above_ground);
        self.loads_from(air, &set)
    }

    fn post_step(&mut self, dt: f64, ctx: &DynamicsContext) {
        let alpha = ctx.air.alpha;
        self.alpha_dot = match self.last_alpha {
            Some(previous) if dt > 0.0 && ctx.air.has_airflow() => (alpha - previous) / dt,
            _ => 0.0,
        };
        self.last_alpha = Some(alpha);
    }

    fn loads(&self) -> ForceMoment {
        self.loads
    }

    fn record_loads(&mut self, loads: ForceMoment) {
        self.loads = loads;
    }
}
