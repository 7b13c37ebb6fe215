//! The sun at the origin and the two lights that illuminate the planets.

/// Texture key of the sun.
pub const SUN_TEXTURE: &str = "Sun";

/// The central star. Rendered unlit with its texture, so it always appears
/// fully bright regardless of the lights.
#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    /// Sphere radius in scene units.
    pub radius: f32,
    /// Texture key.
    pub texture: String,
}

impl Default for Sun {
    fn default() -> Self {
        Self {
            radius: 4.0,
            texture: SUN_TEXTURE.to_string(),
        }
    }
}

/// White point light placed at the sun's centre.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: glam::Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Reach of the light, in scene units.
    pub range: f32,
}

impl PointLight {
    /// A white light at the origin.
    pub fn at_sun(intensity: f32, range: f32) -> Self {
        Self {
            position: glam::Vec3::ZERO,
            color: [1.0, 1.0, 1.0],
            intensity,
            range,
        }
    }
}

/// Soft white fill light so the night side of each planet is not black.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn white(intensity: f32) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }
}
