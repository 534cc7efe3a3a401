use nalgebra::{Matrix3, Vector3};

use crate::components::{Store, StoresConfig};
use crate::systems::aerodynamics::AirData;
use crate::systems::physics::ForceMoment;
use crate::utils::point_mass_inertia;

/// Aggregate effect of all carried stores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoresDescriptor {
    /// Total store mass (kg)
    pub mass: f64,
    /// Inertia added about the airframe centre of mass (kg·m²)
    pub inertia: Matrix3<f64>,
    /// Summed drag area (m²)
    pub drag_area: f64,
}

impl Default for StoresDescriptor {
    fn default() -> Self {
        Self {
            mass: 0.0,
            inertia: Matrix3::zeros(),
            drag_area: 0.0,
        }
    }
}

impl StoresDescriptor {
    /// Drag opposing the airflow, body frame.
    pub fn drag(&self, air: &AirData) -> ForceMoment {
        if self.drag_area <= 0.0 || !air.has_airflow() {
            return ForceMoment::zero();
        }
        let direction = -air.relative_velocity / air.true_airspeed;
        ForceMoment::new(direction * (air.dynamic_pressure * self.drag_area), Vector3::zeros())
    }
}

/// The stores carried by one body, with their descriptor kept up to date.
#[derive(Debug, Clone, Default)]
pub struct StoresDynamics {
    stores: Vec<Store>,
    descriptor: StoresDescriptor,
    revision: u64,
}

impl StoresDynamics {
    pub fn new(config: StoresConfig) -> Self {
        let mut dynamics = Self {
            stores: config.stores,
            ..Self::default()
        };
        dynamics.refresh();
        dynamics
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn descriptor(&self) -> &StoresDescriptor {
        &self.descriptor
    }

    /// Bumped whenever the store list changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add(&mut self, store: Store) {
        self.stores.push(store);
        self.refresh();
    }

    /// Drops the first store with the given name.
    pub fn release(&mut self, name: &str) -> Option<Store> {
        let index = self.stores.iter().position(|s| s.name == name)?;
        let store = self.stores.remove(index);
        self.refresh();
        Some(store)
    }

    pub fn clear(&mut self) {
        if !self.stores.is_empty() {
            self.stores.clear();
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.descriptor = self.stores.iter().fold(StoresDescriptor::default(), |mut acc, store| {
            acc.mass += store.mass;
            acc.inertia += point_mass_inertia(store.mass, &store.position);
            acc.drag_area += store.drag_area;
            acc
        });
        self.revision += 1;
    }
}
