use nalgebra::{Quaternion, SVector, Vector3};

/// Number of scalar states carried through the ODE solver.
pub const STATE_DIM: usize = 13;

/// Flat working representation of one rigid body for the numerical method.
///
/// | slots   | content                                               |
/// |---------|-------------------------------------------------------|
/// | 0..3    | position delta since the start of the sub-step, body frame at sub-step start |
/// | 3..6    | velocity, body frame                                  |
/// | 6..9    | angular velocity, body frame                          |
/// | 9..13   | attitude quaternion in `w, x, y, z` order             |
pub type StateVector = SVector<f64, STATE_DIM>;

/// Decoded view of a [`StateVector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position_delta: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub orientation: Quaternion<f64>,
}

impl BodyState {
    pub fn encode(&self) -> StateVector {
        let mut y = StateVector::zeros();
        y.fixed_rows_mut::<3>(0).copy_from(&self.position_delta);
        y.fixed_rows_mut::<3>(3).copy_from(&self.velocity);
        y.fixed_rows_mut::<3>(6).copy_from(&self.angular_velocity);
        y[9] = self.orientation.w;
        y[10] = self.orientation.i;
        y[11] = self.orientation.j;
        y[12] = self.orientation.k;
        y
    }

    pub fn decode(y: &StateVector) -> Self {
        Self {
            position_delta: y.fixed_rows::<3>(0).into_owned(),
            velocity: y.fixed_rows::<3>(3).into_owned(),
            angular_velocity: y.fixed_rows::<3>(6).into_owned(),
            orientation: Quaternion::new(y[9], y[10], y[11], y[12]),
        }
    }
}
