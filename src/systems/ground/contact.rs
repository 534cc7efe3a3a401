use nalgebra::Vector3;

use crate::components::GearConfig;
use crate::systems::physics::{DynamicsContext, ForceContributor, ForceMoment};
use crate::utils::constants::GRAVITY;
use crate::utils::lerp;

/// Sliding speeds below this are treated as no sliding at all (m/s).
const MIN_SLIDE_SPEED: f64 = 1e-9;

/// One contact point's contribution at a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContactSample {
    pub contact_point_body: Vector3<f64>,
    /// Depth below the ground plane, along its normal (m).
    pub penetration_depth: f64,
    pub contact_velocity_body: Vector3<f64>,
    pub force_body: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactState {
    #[default]
    NoContact,
    Contact,
    /// In contact with loads clipped at the acceleration limit.
    ContactNeedsImpulse,
}

/// Result of evaluating every contact point at one state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroundContact {
    pub loads: ForceMoment,
    pub has_contact: bool,
    pub needs_impulse: bool,
    /// Deepest penetration over all contact points (m), zero without contact.
    pub max_penetration: f64,
    pub samples: Vec<GroundContactSample>,
}

impl GroundContact {
    pub fn state(&self) -> ContactState {
        match (self.has_contact, self.needs_impulse) {
            (false, _) => ContactState::NoContact,
            (true, false) => ContactState::Contact,
            (true, true) => ContactState::ContactNeedsImpulse,
        }
    }
}

/// Spring-damper ground contact with sliding friction over a fixed set of
/// body contact points.
#[derive(Debug, Clone)]
pub struct GroundCollisionContributor {
    config: GearConfig,
    contact: GroundContact,
}

impl GroundCollisionContributor {
    pub fn new(config: GearConfig) -> Self {
        Self {
            config,
            contact: GroundContact::default(),
        }
    }

    /// A single probe directly below the centre of mass.
    pub fn single_point(depth_below_cg: f64, spring_constant: f64, impact_damping: f64) -> Self {
        Self::new(GearConfig {
            contact_points: vec![Vector3::new(0.0, 0.0, -depth_below_cg)],
            spring_constant,
            impact_damping,
            rolling_friction: 0.0,
            braking_friction: 0.0,
            ..GearConfig::tricycle()
        })
    }

    pub fn config(&self) -> &GearConfig {
        &self.config
    }

    /// Evaluates all contact points at `ctx`, keeping per-point samples.
    pub fn evaluate(&self, ctx: &DynamicsContext) -> GroundContact {
        let mut samples = Vec::with_capacity(self.config.contact_points.len());
        let mut contact = self.accumulate(ctx, |sample| samples.push(sample));
        if contact.needs_impulse {
            let scale = self.limit_scale(ctx.mass, &Self::unscaled_force(&samples));
            for sample in samples.iter_mut() {
                sample.force_body *= scale;
            }
        }
        contact.samples = samples;
        contact
    }

    /// Evaluates at `ctx` and stores the result as the current contact.
    pub fn record_contact(&mut self, ctx: &DynamicsContext) -> ForceMoment {
        self.contact = self.evaluate(ctx);
        self.contact.loads
    }

    /// Contact recorded at the end of the last sub-step.
    pub fn contact(&self) -> &GroundContact {
        &self.contact
    }

    pub fn has_contact(&self) -> bool {
        self.contact.has_contact
    }

    pub fn needs_impulse(&self) -> bool {
        self.contact.needs_impulse
    }

    pub fn state(&self) -> ContactState {
        self.contact.state()
    }

    /// Distance to move the body out of the ground, along the ground normal,
    /// once the recorded penetration exceeds the tolerated depth (m).
    pub fn penetration_correction(&self) -> f64 {
        if !self.contact.has_contact {
            return 0.0;
        }
        (self.contact.max_penetration - self.config.max_penetration).max(0.0)
    }

    fn accumulate(
        &self,
        ctx: &DynamicsContext,
        mut sink: impl FnMut(GroundContactSample),
    ) -> GroundContact {
        let mut contact = GroundContact::default();
        if !ctx.env.near_ground {
            return contact;
        }

        let normal = ctx.env.ground_normal;
        let friction = lerp(
            self.config.rolling_friction,
            self.config.braking_friction,
            ctx.controls.brake,
        );

        for point in &self.config.contact_points {
            let point_local = ctx.position + ctx.body_to_local(point);
            let depth = -ctx.env.height_above_ground(&point_local);
            if depth < 0.0 {
                continue;
            }
            contact.has_contact = true;
            contact.max_penetration = contact.max_penetration.max(depth);

            let velocity_body = ctx.point_velocity_body(point);
            let velocity_local = ctx.body_to_local(&velocity_body);
            let closing_speed = -velocity_local.dot(&normal);

            let normal_force = (depth * self.config.spring_constant
                + self.config.impact_damping * closing_speed)
                .max(0.0);
            let mut force_local = normal * normal_force;

            let sliding = velocity_local + normal * closing_speed;
            let slide_speed = sliding.norm();
            if slide_speed > MIN_SLIDE_SPEED {
                let fade = (slide_speed / self.config.slip_speed).min(1.0);
                force_local -= sliding / slide_speed * (friction * normal_force * fade);
            }

            let force_body = ctx.local_to_body(&force_local);
            contact.loads += ForceMoment::at_point(force_body, point);
            sink(GroundContactSample {
                contact_point_body: *point,
                penetration_depth: depth,
                contact_velocity_body: velocity_body,
                force_body,
            });
        }

        let scale = self.limit_scale(ctx.mass, &contact.loads.force);
        if scale < 1.0 {
            contact.loads = contact.loads * scale;
            contact.needs_impulse = true;
        }
        contact
    }

    fn unscaled_force(samples: &[GroundContactSample]) -> Vector3<f64> {
        samples.iter().map(|s| s.force_body).sum()
    }

    /// Factor bringing the contact acceleration down to the configured limit.
    fn limit_scale(&self, mass: f64, force: &Vector3<f64>) -> f64 {
        if mass <= 0.0 {
            return 1.0;
        }
        let acceleration = force.norm() / mass;
        let limit = self.config.g_limit * GRAVITY;
        if acceleration > limit {
            limit / acceleration
        } else {
            1.0
        }
    }
}

impl ForceContributor for GroundCollisionContributor {
    fn name(&self) -> &str {
        "ground_collision"
    }

    fn compute_force_and_moment(&self, ctx: &DynamicsContext) -> ForceMoment {
        self.accumulate(ctx, |_| {}).loads
    }

    fn loads(&self) -> ForceMoment {
        self.contact.loads
    }

    fn record_loads(&mut self, loads: ForceMoment) {
        self.contact.loads = loads;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ControlInputs;
    use crate::resources::EnvironmentSnapshot;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn context<'a>(
        height: f64,
        velocity: Vector3<f64>,
        env: &'a EnvironmentSnapshot,
        controls: &'a ControlInputs,
    ) -> DynamicsContext<'a> {
        DynamicsContext::new(
            0.0,
            Vector3::new(0.0, 0.0, height),
            UnitQuaternion::identity(),
            velocity,
            Vector3::zeros(),
            1000.0,
            env,
            controls,
        )
    }

    #[test]
    fn test_no_contact_above_ground() {
        let env = EnvironmentSnapshot::default();
        let controls = ControlInputs::default();
        let ground = GroundCollisionContributor::single_point(1.0, 1e5, 1.5e4);
        let contact = ground.evaluate(&context(1.5, Vector3::zeros(), &env, &controls));
        assert_eq!(contact.state(), ContactState::NoContact);
        assert_eq!(contact.loads, ForceMoment::zero());
    }

    #[test]
    fn test_spring_and_damper() {
        let env = EnvironmentSnapshot::default();
        let controls = ControlInputs::default();
        let ground = GroundCollisionContributor::single_point(1.0, 1e5, 1.5e4);

        let resting = ground.evaluate(&context(0.9, Vector3::zeros(), &env, &controls));
        assert_eq!(resting.state(), ContactState::Contact);
        assert_relative_eq!(resting.loads.force, Vector3::new(0.0, 0.0, 1e4), epsilon = 1e-6);
        assert_relative_eq!(resting.max_penetration, 0.1, epsilon = 1e-12);

        let falling = ground.evaluate(&context(0.9, Vector3::new(0.0, 0.0, -0.5), &env, &controls));
        assert_relative_eq!(falling.loads.force.z, 1e4 + 7.5e3, epsilon = 1e-6);
    }

    #[test]
    fn test_spring_never_pulls_down() {
        let env = EnvironmentSnapshot::default();
        let controls = ControlInputs::default();
        let ground = GroundCollisionContributor::single_point(1.0, 1e5, 1.5e4);
        let rising = ground.evaluate(&context(0.99, Vector3::new(0.0, 0.0, 5.0), &env, &controls));
        assert!(rising.has_contact);
        assert_relative_eq!(rising.loads.force, Vector3::zeros());
    }

    #[test]
    fn test_friction_opposes_sliding_and_brakes_bite() {
        let env = EnvironmentSnapshot::default();
        let gear = GearConfig {
            contact_points: vec![Vector3::new(0.0, 0.0, -1.0)],
            spring_constant: 1e5,
            impact_damping: 0.0,
            rolling_friction: 0.05,
            braking_friction: 0.5,
            ..GearConfig::tricycle()
        };
        let ground = GroundCollisionContributor::new(gear);

        let rolling = ControlInputs::default();
        let braking = ControlInputs {
            brake: 1.0,
            ..ControlInputs::default()
        };
        let velocity = Vector3::new(0.0, 20.0, 0.0);
        let free = ground.evaluate(&context(0.9, velocity, &env, &rolling));
        let braked = ground.evaluate(&context(0.9, velocity, &env, &braking));

        assert_relative_eq!(free.loads.force.y, -0.05 * 1e4, epsilon = 1e-6);
        assert_relative_eq!(braked.loads.force.y, -0.5 * 1e4, epsilon = 1e-6);

        // Friction fades out as sliding stops.
        let creeping = ground.evaluate(&context(0.9, Vector3::new(0.0, 0.1, 0.0), &env, &braking));
        assert!(creeping.loads.force.y.abs() < braked.loads.force.y.abs() * 0.5);
    }

    #[test]
    fn test_g_limit_clips_and_flags_impulse() {
        let env = EnvironmentSnapshot::default();
        let controls = ControlInputs::default();
        let ground = GroundCollisionContributor::single_point(1.0, 1e5, 1.5e4);
        let slam = ground.evaluate(&context(0.5, Vector3::new(0.0, 0.0, -30.0), &env, &controls));

        assert_eq!(slam.state(), ContactState::ContactNeedsImpulse);
        assert_relative_eq!(slam.loads.force.norm() / 1000.0, 20.0 * GRAVITY, epsilon = 1e-6);
        let sampled: Vector3<f64> = slam.samples.iter().map(|s| s.force_body).sum();
        assert_relative_eq!(sampled, slam.loads.force, epsilon = 1e-6);
    }

    #[test]
    fn test_off_centre_contact_produces_moment() {
        let env = EnvironmentSnapshot::default();
        let controls = ControlInputs::default();
        let gear = GearConfig {
            contact_points: vec![Vector3::new(0.0, 2.0, -1.0)],
            ..GearConfig::tricycle()
        };
        let ground = GroundCollisionContributor::new(gear);
        let contact = ground.evaluate(&context(0.95, Vector3::zeros(), &env, &controls));
        // Upward force ahead of the centre of mass pitches the nose up.
        assert!(contact.loads.moment.x > 0.0);
    }

    #[test]
    fn test_skipped_far_from_ground() {
        let env = EnvironmentSnapshot {
            near_ground: false,
            ..EnvironmentSnapshot::default()
        };
        let controls = ControlInputs::default();
        let ground = GroundCollisionContributor::single_point(1.0, 1e5, 1.5e4);
        let contact = ground.evaluate(&context(0.5, Vector3::zeros(), &env, &controls));
        assert!(!contact.has_contact);
    }

    #[test]
    fn test_penetration_correction_beyond_tolerance() {
        let env = EnvironmentSnapshot::default();
        let controls = ControlInputs::default();
        let mut ground = GroundCollisionContributor::single_point(1.0, 1e5, 1.5e4);
        ground.record_contact(&context(0.2, Vector3::zeros(), &env, &controls));
        let tolerance = ground.config().max_penetration;
        assert_relative_eq!(ground.penetration_correction(), 0.8 - tolerance, epsilon = 1e-12);
    }
}
