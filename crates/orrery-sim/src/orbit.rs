//! Per-body runtime orbit state.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use orrery_space::CelestialBodyDescriptor;

/// Mutable orbit of one body.
///
/// `angle` grows without bound; nothing requires it to be wrapped into
/// `[0, 2π)`. Only the animation driver changes `angle`; the control surface
/// only changes `angular_speed`.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitState {
    /// Current angle in radians.
    pub angle: f64,
    /// Radians added to `angle` per tick.
    pub angular_speed: f64,
    /// Orbit radius, copied from the descriptor.
    pub distance: f64,
}

impl OrbitState {
    /// Creates an orbit at `angle` moving `angular_speed` radians per tick.
    pub fn new(angle: f64, angular_speed: f64, distance: f64) -> Self {
        Self {
            angle,
            angular_speed,
            distance,
        }
    }

    /// Overwrite the angular speed. Zero stops the body, negative values
    /// reverse it, and non-finite values are stored as given.
    pub fn set_speed(&mut self, new_speed: f64) {
        self.angular_speed = new_speed;
    }

    /// Position on the circular orbit in the XZ plane for the current angle.
    pub fn position(&self) -> DVec3 {
        let (sin, cos) = self.angle.sin_cos();
        DVec3::new(self.distance * cos, 0.0, self.distance * sin)
    }
}

/// One state per descriptor, in the same order, each starting at a random
/// angle in `[0, 2π)` so the planets don't start out lined up.
pub fn initialize<R: Rng>(
    descriptors: &[CelestialBodyDescriptor],
    rng: &mut R,
) -> Vec<OrbitState> {
    descriptors
        .iter()
        .map(|body| OrbitState::new(rng.random::<f64>() * TAU, body.speed, body.distance))
        .collect()
}
