use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// Scales a quaternion to unit length.
///
/// A zero-magnitude quaternion is returned untouched rather than divided by zero.
pub fn normalize_or_keep(q: Quaternion<f64>) -> Quaternion<f64> {
    let norm = q.norm();
    if norm > 0.0 {
        q / norm
    } else {
        q
    }
}

/// Wraps a raw quaternion as an attitude after a defensive renormalization.
pub fn attitude_from_raw(q: Quaternion<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::new_unchecked(normalize_or_keep(q))
}

/// Time derivative of an attitude quaternion: `q̇ = ½ · q ⊗ (0, ω)`.
///
/// `omega_body` is the angular velocity expressed in the body frame and `q`
/// rotates body vectors into the local frame.
pub fn quaternion_derivative(q: &Quaternion<f64>, omega_body: &Vector3<f64>) -> Quaternion<f64> {
    q * Quaternion::from_imag(*omega_body) * 0.5
}

/// Rotate a local-frame vector into the body frame.
#[inline]
pub fn local_to_body(attitude: &UnitQuaternion<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    attitude.inverse_transform_vector(v)
}

/// Rotate a body-frame vector into the local frame.
#[inline]
pub fn body_to_local(attitude: &UnitQuaternion<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    attitude.transform_vector(v)
}

/// Heading of the body's nose in the local frame, measured from +y (north)
/// towards +x (east).
pub fn heading(attitude: &UnitQuaternion<f64>) -> f64 {
    let nose = attitude * Vector3::y();
    nose.x.atan2(nose.y)
}

/// Inertia of a point mass about the centre of mass (parallel-axis term).
pub fn point_mass_inertia(mass: f64, offset: &Vector3<f64>) -> Matrix3<f64> {
    mass * (Matrix3::identity() * offset.norm_squared() - offset * offset.transpose())
}

/// True if every component of the vector is finite.
#[inline]
pub fn is_finite_vector(v: &Vector3<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_zero_quaternion_is_left_alone() {
        let zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        let result = normalize_or_keep(zero);
        assert_eq!(result, zero);
        assert!(result.coords.iter().all(|c| !c.is_nan()));
    }

    #[test]
    fn test_normalize_scales_to_unit_length() {
        let q = Quaternion::new(2.0, 0.0, 2.0, 0.0);
        assert_relative_eq!(normalize_or_keep(q).norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_quaternion_derivative_matches_axis_rotation() {
        // Rotating about the body up axis from identity: q̇ = (0, 0, 0, ω/2)
        let q = Quaternion::identity();
        let dq = quaternion_derivative(&q, &Vector3::new(0.0, 0.0, 0.4));
        assert_relative_eq!(dq.w, 0.0);
        assert_relative_eq!(dq.k, 0.2);
        assert_relative_eq!(dq.i, 0.0);
        assert_relative_eq!(dq.j, 0.0);
    }

    #[test]
    fn test_heading_of_rotated_nose() {
        assert_relative_eq!(heading(&UnitQuaternion::identity()), 0.0);
        // A negative rotation about up swings the nose from north towards east
        let turned = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -PI / 2.0);
        assert_relative_eq!(heading(&turned), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_rotations_invert_each_other() {
        let yawed = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -PI / 2.0);
        let nose = body_to_local(&yawed, &Vector3::y());
        assert_relative_eq!(nose, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(local_to_body(&yawed, &nose), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_point_mass_inertia() {
        let inertia = point_mass_inertia(2.0, &Vector3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(inertia[(0, 0)], 18.0);
        assert_relative_eq!(inertia[(1, 1)], 0.0);
        assert_relative_eq!(inertia[(2, 2)], 18.0);
    }
}
