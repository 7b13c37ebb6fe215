//! Scene description consumed by a renderer.
//!
//! The scene owns one node per body, in registry order. The animation
//! driver writes planet positions through [`PositionSink`]; everything else
//! is fixed after [`Scene::build`].

use glam::{DVec3, Vec3};

use crate::registry::BodyRegistry;
use crate::ring::OrbitRing;
use crate::starfield::Starfield;
use crate::sun::{AmbientLight, PointLight, Sun};

/// Receives per-tick body positions. Implemented by the scene; tests use
/// plain recorders.
pub trait PositionSink {
    /// Place body `index` at `position`.
    fn place(&mut self, index: usize, position: DVec3);
}

/// Renderable planet.
#[derive(Clone, Debug)]
pub struct PlanetNode {
    pub name: String,
    pub radius: f32,
    /// Fallback color shown until the texture arrives.
    pub color: [f32; 3],
    pub texture: String,
    /// Set once the texture has loaded.
    pub textured: bool,
    pub position: Vec3,
}

/// Perspective camera looking at the sun.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit-controls damping factor. Applied by the renderer's controls.
    pub damping: f32,
}

impl CameraRig {
    pub fn new(position: Vec3, fov_y_degrees: f32, near: f32, far: f32, damping: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near,
            far,
            damping,
        }
    }

    /// Track a viewport resize. A zero-height viewport keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    pub sun: Sun,
    pub point_light: PointLight,
    pub ambient_light: AmbientLight,
    pub planets: Vec<PlanetNode>,
    pub rings: Vec<OrbitRing>,
    pub starfield: Starfield,
    pub camera: CameraRig,
}

impl Scene {
    /// Lay out the scene for `registry`. Planets start at the origin until
    /// the first tick places them.
    pub fn build(
        registry: &BodyRegistry,
        sun: Sun,
        point_light: PointLight,
        ambient_light: AmbientLight,
        starfield: Starfield,
        camera: CameraRig,
    ) -> Self {
        let planets = registry
            .iter()
            .map(|body| PlanetNode {
                name: body.name.clone(),
                radius: body.radius as f32,
                color: body.rgb(),
                texture: body.texture_key().to_string(),
                textured: false,
                position: Vec3::ZERO,
            })
            .collect();
        let rings = registry
            .iter()
            .map(|body| OrbitRing::for_distance(body.distance as f32))
            .collect();

        Self {
            sun,
            point_light,
            ambient_light,
            planets,
            rings,
            starfield,
            camera,
        }
    }

    /// Mark every node using texture `key` as textured. Returns how many changed.
    pub fn attach_texture(&mut self, key: &str) -> usize {
        let mut attached = 0;
        for planet in self.planets.iter_mut().filter(|p| p.texture == key) {
            if !planet.textured {
                planet.textured = true;
                attached += 1;
            }
        }
        attached
    }

    /// Forward a viewport resize to the camera.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }
}

impl PositionSink for Scene {
    fn place(&mut self, index: usize, position: DVec3) {
        if let Some(planet) = self.planets.get_mut(index) {
            planet.position = position.as_vec3();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::starfield::StarfieldGenerator;

    fn test_scene() -> Scene {
        Scene::build(
            &BodyRegistry::solar_system(),
            Sun::default(),
            PointLight::at_sun(2.0, 1000.0),
            AmbientLight::white(0.4),
            StarfieldGenerator::new(1, 10, 2000.0).generate(0.7),
            CameraRig::new(Vec3::new(0.0, 20.0, 40.0), 75.0, 0.1, 1000.0, 0.05),
        )
    }

    #[test]
    fn test_scene_has_node_and_ring_per_body() {
        let scene = test_scene();
        assert_eq!(scene.planets.len(), 8);
        assert_eq!(scene.rings.len(), 8);
        assert_eq!(scene.planets[3].name, "Mars");
        assert!((scene.rings[3].outer_radius - 12.01).abs() < 1e-5);
        assert!(scene.planets.iter().all(|p| !p.textured));
    }

    #[test]
    fn test_place_updates_position() {
        let mut scene = test_scene();
        scene.place(2, DVec3::new(9.95, 0.0, 0.998));
        assert!((scene.planets[2].position.x - 9.95).abs() < 1e-5);
        assert!((scene.planets[2].position.z - 0.998).abs() < 1e-5);
        // Out-of-range indices are ignored.
        scene.place(99, DVec3::ONE);
    }

    #[test]
    fn test_attach_texture_once() {
        let mut scene = test_scene();
        assert_eq!(scene.attach_texture("Saturn"), 1);
        assert_eq!(scene.attach_texture("Saturn"), 0);
        assert_eq!(scene.attach_texture("Pluto"), 0);
        assert!(scene.planets[5].textured);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut scene = test_scene();
        scene.resize(1920, 1080);
        assert!((scene.camera.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
        scene.resize(800, 0);
        assert!((scene.camera.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_looks_at_sun() {
        let scene = test_scene();
        assert_eq!(scene.camera.target, Vec3::ZERO);
        assert_eq!(scene.camera.position, Vec3::new(0.0, 20.0, 40.0));
        assert!((scene.camera.fov_y - 75f32.to_radians()).abs() < 1e-6);
    }
}
