use bevy::log::warn;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{DynamicsError, DynamicsResult};

/// Mass properties of a rigid body with precomputed inverses.
///
/// A mass of exactly zero marks an immovable body: the inverse mass is zero,
/// so no applied force produces linear acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassModel {
    /// Total mass (kg).
    pub mass: f64,
    /// The inertia tensor about the centre of mass, body axes (kg·m²).
    pub inertia: Matrix3<f64>,
    /// Precomputed inverse of the mass, zero for the immovable sentinel.
    pub mass_inv: f64,
    /// Precomputed inverse of the inertia tensor.
    pub inertia_inv: Matrix3<f64>,
}

impl Default for MassModel {
    fn default() -> Self {
        Self::immovable()
    }
}

impl MassModel {
    /// Builds a mass model, rejecting negative or non-finite mass and singular
    /// inertia. A zero mass paired with a zero tensor is the immovable sentinel.
    pub fn new(mass: f64, inertia: Matrix3<f64>) -> DynamicsResult<Self> {
        if !mass.is_finite() || mass < 0.0 {
            return Err(DynamicsError::InvalidMass(mass));
        }
        if !inertia.iter().all(|v| v.is_finite()) {
            return Err(DynamicsError::SingularInertia);
        }

        let mass_inv = if mass == 0.0 { 0.0 } else { 1.0 / mass };
        let inertia_inv = if inertia == Matrix3::zeros() {
            Matrix3::zeros()
        } else {
            inertia
                .try_inverse()
                .ok_or(DynamicsError::SingularInertia)?
        };

        if mass == 0.0 {
            warn!("Mass model created with zero mass, body will not translate");
        }

        Ok(Self {
            mass,
            inertia,
            mass_inv,
            inertia_inv,
        })
    }

    /// Builds a mass model from body-axis moments of inertia (x right,
    /// y forward, z up) and the roll/yaw product of inertia `iyz`.
    pub fn from_moments(mass: f64, ixx: f64, iyy: f64, izz: f64, iyz: f64) -> DynamicsResult<Self> {
        let inertia = Matrix3::from_columns(&[
            Vector3::new(ixx, 0.0, 0.0),
            Vector3::new(0.0, iyy, -iyz),
            Vector3::new(0.0, -iyz, izz),
        ]);
        Self::new(mass, inertia)
    }

    pub fn immovable() -> Self {
        Self {
            mass: 0.0,
            inertia: Matrix3::zeros(),
            mass_inv: 0.0,
            inertia_inv: Matrix3::zeros(),
        }
    }

    pub fn is_immovable(&self) -> bool {
        self.mass_inv == 0.0
    }

    /// Adds mass and inertia to this model and recomputes the inverses.
    pub fn combined(&self, extra_mass: f64, extra_inertia: &Matrix3<f64>) -> DynamicsResult<Self> {
        if self.is_immovable() {
            return Ok(*self);
        }
        Self::new(self.mass + extra_mass, self.inertia + extra_inertia)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_is_precomputed() {
        let model = MassModel::from_moments(1000.0, 2000.0, 1000.0, 3000.0, 0.0).unwrap();
        assert_relative_eq!(model.mass_inv, 1e-3);
        assert_relative_eq!(model.inertia_inv[(0, 0)], 1.0 / 2000.0);
        assert_relative_eq!(model.inertia_inv[(2, 2)], 1.0 / 3000.0);
    }

    #[test]
    fn test_zero_mass_sentinel() {
        let model = MassModel::new(0.0, Matrix3::zeros()).unwrap();
        assert_eq!(model.mass_inv, 0.0);
        assert!(model.inertia_inv.iter().all(|v| *v == 0.0));
        assert!(model.is_immovable());
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            MassModel::new(-1.0, Matrix3::identity()),
            Err(DynamicsError::InvalidMass(-1.0))
        );
        let singular = Matrix3::from_diagonal(&Vector3::new(1.0, 0.0, 1.0));
        assert_eq!(
            MassModel::new(10.0, singular),
            Err(DynamicsError::SingularInertia)
        );
    }

    #[test]
    fn test_combined_adds_mass() {
        let base = MassModel::new(100.0, Matrix3::identity() * 10.0).unwrap();
        let total = base.combined(50.0, &(Matrix3::identity() * 5.0)).unwrap();
        assert_relative_eq!(total.mass, 150.0);
        assert_relative_eq!(total.inertia_inv[(1, 1)], 1.0 / 15.0);
    }
}
