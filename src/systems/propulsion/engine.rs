use nalgebra::Vector3;

use crate::components::EngineConfig;
use crate::systems::physics::{DynamicsContext, ForceContributor, ForceMoment};

/// Spooled state of an engine between sub-steps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineState {
    /// Fraction of the way from idle to military thrust, 0..=1.
    pub spool: f64,
    /// Afterburner light-off progress, 0..=1.
    pub afterburner: f64,
}

/// First-order approach of `current` towards `target` over `dt` with time
/// constant `time_constant`; snaps when the constant is (near) zero.
fn first_order(current: f64, target: f64, time_constant: f64, dt: f64) -> f64 {
    if time_constant > 1e-6 {
        let decay = (-dt / time_constant).exp();
        target + (current - target) * decay
    } else {
        target
    }
}

/// Table-driven jet engine thrust with spool and afterburner dynamics.
#[derive(Debug, Clone)]
pub struct EngineContributor {
    config: EngineConfig,
    direction: Vector3<f64>,
    state: EngineState,
    loads: ForceMoment,
    fuel_flow: f64,
}

impl EngineContributor {
    pub fn new(config: EngineConfig) -> Self {
        let direction = config
            .direction
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::y);
        Self {
            config,
            direction,
            state: EngineState::default(),
            loads: ForceMoment::zero(),
            fuel_flow: 0.0,
        }
    }

    /// Starts the engine already spooled to `spool`.
    pub fn with_spool(mut self, spool: f64) -> Self {
        self.state.spool = spool.clamp(0.0, 1.0);
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Thrust (N) for a spool state at a flight condition.
    ///
    /// Blends idle to military by `spool`, then military to full afterburner
    /// by `afterburner`, and scales by the angle-of-attack intake factor.
    pub fn thrust(&self, state: &EngineState, altitude: f64, mach: f64, alpha: f64) -> f64 {
        let idle = self.config.idle_thrust.lookup(altitude, mach);
        let military = self.config.military_thrust.lookup(altitude, mach);
        let mut thrust = idle + (military - idle) * state.spool;
        if let Some(table) = &self.config.afterburner_thrust {
            if state.afterburner > 0.0 {
                let reheat = table.lookup(altitude, mach);
                thrust += (reheat - military) * state.afterburner;
            }
        }
        (thrust * self.config.thrust_scale.lookup(alpha)).max(0.0)
    }

    /// Fuel mass flow (kg/s) for `thrust` produced in `state`.
    pub fn fuel_flow_for(&self, state: &EngineState, thrust: f64) -> f64 {
        let tsfc = self.config.tsfc
            + (self.config.afterburner_tsfc - self.config.tsfc).max(0.0) * state.afterburner;
        thrust * tsfc
    }

    fn thrust_at(&self, ctx: &DynamicsContext) -> f64 {
        self.thrust(&self.state, ctx.position.z, ctx.air.mach, ctx.air.alpha)
    }
}

impl ForceContributor for EngineContributor {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn pre_step(&mut self, dt: f64, ctx: &DynamicsContext) {
        let throttle = ctx.controls.throttle.clamp(0.0, 1.0);
        let time_constant = if throttle > self.state.spool {
            self.config.spool_up_time
        } else {
            self.config.spool_down_time
        };
        self.state.spool = first_order(self.state.spool, throttle, time_constant, dt).clamp(0.0, 1.0);

        // Reheat only lights once the core is at military power.
        let light = ctx.controls.afterburner
            && self.config.afterburner_thrust.is_some()
            && self.state.spool >= 0.99;
        let target = if light { 1.0 } else { 0.0 };
        self.state.afterburner =
            first_order(self.state.afterburner, target, self.config.afterburner_time, dt)
                .clamp(0.0, 1.0);
    }

    fn compute_force_and_moment(&self, ctx: &DynamicsContext) -> ForceMoment {
        let force = self.direction * self.thrust_at(ctx);
        ForceMoment::at_point(force, &self.config.offset)
    }

    fn post_step(&mut self, _dt: f64, ctx: &DynamicsContext) {
        self.fuel_flow = self.fuel_flow_for(&self.state, self.thrust_at(ctx));
    }

    fn loads(&self) -> ForceMoment {
        self.loads
    }

    fn record_loads(&mut self, loads: ForceMoment) {
        self.loads = loads;
    }

    fn fuel_flow(&self) -> f64 {
        self.fuel_flow
    }
}
