//! Static description of an orbiting body.

use serde::{Deserialize, Serialize};

/// Immutable description of one planet, created at startup.
///
/// `name` is the identity of the body: the registry rejects duplicates, and
/// the body's texture is looked up under the same key unless `texture` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CelestialBodyDescriptor {
    /// Unique display name.
    pub name: String,
    /// Sphere radius in scene units. Must be positive.
    pub radius: f64,
    /// Distance from the sun in scene units. Must be non-negative.
    pub distance: f64,
    /// Angular speed at startup, in radians per tick.
    pub speed: f64,
    /// Display color as `0xRRGGBB`.
    pub color: u32,
    /// Texture key. Defaults to `name`.
    #[serde(default)]
    pub texture: Option<String>,
}

impl CelestialBodyDescriptor {
    /// Build a descriptor whose texture key is its name.
    pub fn new(name: &str, radius: f64, distance: f64, speed: f64, color: u32) -> Self {
        Self {
            name: name.to_string(),
            radius,
            distance,
            speed,
            color,
            texture: None,
        }
    }

    /// Key used to load this body's texture.
    pub fn texture_key(&self) -> &str {
        self.texture.as_deref().unwrap_or(&self.name)
    }

    /// Display color as linear-ish RGB in `[0, 1]`.
    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }
}

/// Split a `0xRRGGBB` color into float channels.
pub fn hex_to_rgb(color: u32) -> [f32; 3] {
    let r = ((color >> 16) & 0xff) as f32 / 255.0;
    let g = ((color >> 8) & 0xff) as f32 / 255.0;
    let b = (color & 0xff) as f32 / 255.0;
    [r, g, b]
}
