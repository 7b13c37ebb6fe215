//! Body registry: the closed, ordered set of orbiting bodies.
//!
//! Index order is insertion order, and the simulation matches runtime state
//! to descriptors by that index. Names are unique.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::body::CelestialBodyDescriptor;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// I/O error reading the manifest file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RON deserialization error.
    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Two bodies share a name.
    #[error("duplicate body name: {0}")]
    DuplicateName(String),

    /// Radius is not a positive finite number.
    #[error("body {name}: radius must be positive, got {radius}")]
    InvalidRadius { name: String, radius: f64 },

    /// Orbital distance is negative or not finite.
    #[error("body {name}: distance must be non-negative, got {distance}")]
    InvalidDistance { name: String, distance: f64 },
}

// ---------------------------------------------------------------------------
// RON manifest
// ---------------------------------------------------------------------------

/// Top-level RON manifest listing the bodies in orbit order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BodyManifest {
    /// Bodies, innermost first.
    pub bodies: Vec<CelestialBodyDescriptor>,
}

// ---------------------------------------------------------------------------
// BodyRegistry
// ---------------------------------------------------------------------------

/// Ordered registry of body descriptors with name lookup.
///
/// Immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBodyDescriptor>,
    name_to_index: HashMap<String, usize>,
}

impl BodyRegistry {
    /// Build a registry, validating every descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on a duplicate name or an invalid radius or distance.
    pub fn new(bodies: Vec<CelestialBodyDescriptor>) -> Result<Self, RegistryError> {
        let mut name_to_index = HashMap::with_capacity(bodies.len());
        for (index, body) in bodies.iter().enumerate() {
            if !(body.radius.is_finite() && body.radius > 0.0) {
                return Err(RegistryError::InvalidRadius {
                    name: body.name.clone(),
                    radius: body.radius,
                });
            }
            if !(body.distance.is_finite() && body.distance >= 0.0) {
                return Err(RegistryError::InvalidDistance {
                    name: body.name.clone(),
                    distance: body.distance,
                });
            }
            if name_to_index.insert(body.name.clone(), index).is_some() {
                return Err(RegistryError::DuplicateName(body.name.clone()));
            }
        }
        Ok(Self {
            bodies,
            name_to_index,
        })
    }

    /// The eight planets of the reference configuration.
    pub fn solar_system() -> Self {
        let bodies = vec![
            CelestialBodyDescriptor::new("Mercury", 0.4, 6.0, 0.04, 0xaaaaaa),
            CelestialBodyDescriptor::new("Venus", 0.6, 8.0, 0.015, 0xffcc99),
            CelestialBodyDescriptor::new("Earth", 0.65, 10.0, 0.01, 0x3399ff),
            CelestialBodyDescriptor::new("Mars", 0.5, 12.0, 0.008, 0xff3300),
            CelestialBodyDescriptor::new("Jupiter", 1.2, 15.0, 0.004, 0xffcc66),
            CelestialBodyDescriptor::new("Saturn", 1.0, 18.0, 0.003, 0xffffcc),
            CelestialBodyDescriptor::new("Uranus", 0.9, 21.0, 0.002, 0x66ffff),
            CelestialBodyDescriptor::new("Neptune", 0.85, 24.0, 0.001, 0x6666ff),
        ];
        let name_to_index = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();
        Self {
            bodies,
            name_to_index,
        }
    }

    /// Load the registry from a RON manifest file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on I/O, parse, or validation failures.
    pub fn from_ron(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        let registry = Self::from_ron_str(&contents)?;
        tracing::info!(
            "Loaded {} bodies from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Load the registry from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on parse or validation failures.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, RegistryError> {
        let manifest: BodyManifest = ron::from_str(ron_str)?;
        Self::new(manifest.bodies)
    }

    /// Descriptor at `index`.
    pub fn get(&self, index: usize) -> Option<&CelestialBodyDescriptor> {
        self.bodies.get(index)
    }

    /// Index of the body called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// All descriptors in index order.
    pub fn bodies(&self) -> &[CelestialBodyDescriptor] {
        &self.bodies
    }

    /// Iterates descriptors in index order.
    pub fn iter(&self) -> impl Iterator<Item = &CelestialBodyDescriptor> {
        self.bodies.iter()
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if no bodies are registered.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        // Two-planet toy system.
        (
            bodies: [
                (name: "Inner", radius: 0.5, distance: 4.0, speed: 0.02, color: 0xff0000),
                (name: "Outer", radius: 1.5, distance: 9.0, speed: 0.005, color: 0x00ff00,
                 texture: Some("outer_map")),
            ],
        )
    "#;

    #[test]
    fn test_solar_system_has_eight_planets_in_order() {
        let registry = BodyRegistry::solar_system();
        assert_eq!(registry.len(), 8);
        let names: Vec<&str> = registry.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"
            ]
        );
        assert_eq!(registry.index_of("Earth"), Some(2));
        assert_eq!(registry.get(2).unwrap().distance, 10.0);
    }

    #[test]
    fn test_solar_system_passes_validation() {
        let bodies = BodyRegistry::solar_system().bodies().to_vec();
        assert!(BodyRegistry::new(bodies).is_ok());
    }

    #[test]
    fn test_empty_registry() {
        let registry = BodyRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.index_of("Earth"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let bodies = vec![
            CelestialBodyDescriptor::new("Earth", 0.65, 10.0, 0.01, 0x3399ff),
            CelestialBodyDescriptor::new("Earth", 0.7, 11.0, 0.01, 0x3399ff),
        ];
        let err = BodyRegistry::new(bodies).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "Earth"));
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let bodies = vec![CelestialBodyDescriptor::new("Dust", 0.0, 3.0, 0.01, 0)];
        assert!(matches!(
            BodyRegistry::new(bodies),
            Err(RegistryError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let bodies = vec![CelestialBodyDescriptor::new("Lost", 1.0, -3.0, 0.01, 0)];
        assert!(matches!(
            BodyRegistry::new(bodies),
            Err(RegistryError::InvalidDistance { .. })
        ));
    }

    #[test]
    fn test_zero_distance_allowed() {
        let bodies = vec![CelestialBodyDescriptor::new("Core", 1.0, 0.0, 0.01, 0)];
        assert!(BodyRegistry::new(bodies).is_ok());
    }

    #[test]
    fn test_from_ron_str() {
        let registry = BodyRegistry::from_ron_str(MANIFEST).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).unwrap().texture_key(), "Inner");
        assert_eq!(registry.get(1).unwrap().texture_key(), "outer_map");
        assert_eq!(registry.get(0).unwrap().color, 0xff0000);
    }

    #[test]
    fn test_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodies.ron");
        std::fs::write(&path, MANIFEST).unwrap();
        let registry = BodyRegistry::from_ron(&path).unwrap();
        assert_eq!(registry.index_of("Outer"), Some(1));
    }

    #[test]
    fn test_missing_manifest_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = BodyRegistry::from_ron(&dir.path().join("absent.ron"));
        assert!(matches!(result, Err(RegistryError::Io(_))));
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let result = BodyRegistry::from_ron_str("(bodies: [(name: 3)])");
        assert!(matches!(result, Err(RegistryError::Ron(_))));
    }
}
