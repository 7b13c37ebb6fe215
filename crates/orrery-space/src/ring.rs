//! Thin flat rings tracing each planet's orbit in the XZ plane.

use std::f32::consts::TAU;

/// Half-width of an orbit ring in scene units.
pub const RING_HALF_WIDTH: f32 = 0.01;

/// Angular segments per ring.
pub const RING_SEGMENTS: u32 = 64;

/// Annulus geometry for one orbit.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitRing {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
}

impl OrbitRing {
    /// Ring hugging an orbit of radius `distance`.
    pub fn for_distance(distance: f32) -> Self {
        Self {
            inner_radius: (distance - RING_HALF_WIDTH).max(0.0),
            outer_radius: distance + RING_HALF_WIDTH,
            segments: RING_SEGMENTS,
        }
    }

    /// Vertices as alternating inner/outer pairs, `segments + 1` pairs so the
    /// seam closes. All vertices have `y = 0`.
    pub fn vertices(&self) -> Vec<glam::Vec3> {
        let mut vertices = Vec::with_capacity((self.segments as usize + 1) * 2);
        for i in 0..=self.segments {
            let theta = i as f32 / self.segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(glam::Vec3::new(
                self.inner_radius * cos,
                0.0,
                self.inner_radius * sin,
            ));
            vertices.push(glam::Vec3::new(
                self.outer_radius * cos,
                0.0,
                self.outer_radius * sin,
            ));
        }
        vertices
    }

    /// Triangle-list indices into [`vertices`](Self::vertices), two per segment.
    pub fn indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.segments as usize * 6);
        for i in 0..self.segments {
            let inner = i * 2;
            let outer = inner + 1;
            let next_inner = inner + 2;
            let next_outer = inner + 3;
            indices.extend_from_slice(&[inner, outer, next_inner, next_inner, outer, next_outer]);
        }
        indices
    }
}
