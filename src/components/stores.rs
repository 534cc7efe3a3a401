use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// An externally carried store (tank, pod, weapon).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    /// Mass (kg)
    pub mass: f64,
    /// Attach point relative to the centre of mass, body frame (m)
    pub position: Vector3<f64>,
    /// Drag coefficient times reference area (m²)
    pub drag_area: f64,
}

impl Store {
    pub fn new(name: impl Into<String>, mass: f64, position: Vector3<f64>, drag_area: f64) -> Self {
        Self {
            name: name.into(),
            mass,
            position,
            drag_area,
        }
    }
}

/// Stores loaded at spawn. Serialized as a plain list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoresConfig {
    pub stores: Vec<Store>,
}

impl StoresConfig {
    pub fn validate(&self) -> Result<(), String> {
        for store in &self.stores {
            if !(store.mass >= 0.0) || !(store.drag_area >= 0.0) {
                return Err(format!(
                    "store '{}' needs non-negative mass and drag area",
                    store.name
                ));
            }
            if !store.position.iter().all(|v| v.is_finite()) {
                return Err(format!("store '{}' has a non-finite position", store.name));
            }
        }
        Ok(())
    }
}
