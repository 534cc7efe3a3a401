use csp_flight::components::KinematicState;
use csp_flight::utils::is_finite_vector;
use nalgebra::UnitQuaternion;

/// Assert that every component of a kinematic state is finite
#[track_caller]
pub fn assert_state_finite(state: &KinematicState) {
    assert!(
        is_finite_vector(&state.position),
        "Position is not finite: {:?}",
        state.position
    );
    assert!(
        is_finite_vector(&state.velocity),
        "Velocity is not finite: {:?}",
        state.velocity
    );
    assert!(
        is_finite_vector(&state.angular_velocity),
        "Angular velocity is not finite: {:?}",
        state.angular_velocity
    );
    assert_unit_attitude(&state.attitude, 1e-9);
}

/// Assert that the stored quaternion has unit norm
#[track_caller]
pub fn assert_unit_attitude(attitude: &UnitQuaternion<f64>, epsilon: f64) {
    let norm = attitude.quaternion().norm();
    assert!(
        (norm - 1.0).abs() <= epsilon,
        "Attitude quaternion norm {} is not within {} of one",
        norm,
        epsilon
    );
}
