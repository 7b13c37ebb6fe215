//! Builds the registry and the scene from configuration.

use glam::Vec3;
use orrery_config::Config;
use orrery_space::{
    AmbientLight, BodyRegistry, CameraRig, PointLight, RegistryError, Scene, StarfieldGenerator,
    Sun,
};

/// Body list from the configured manifest, or the built-in planets.
pub fn build_registry(config: &Config) -> Result<BodyRegistry, RegistryError> {
    match &config.assets.bodies_manifest {
        Some(path) => BodyRegistry::from_ron(path),
        None => Ok(BodyRegistry::solar_system()),
    }
}

/// Configured seed, or a fresh random one.
pub fn resolve_seed(config: &Config) -> u64 {
    config.simulation.seed.unwrap_or_else(rand::random)
}

/// Sun, lights, rings, starfield and camera for `registry`.
pub fn build_scene(config: &Config, registry: &BodyRegistry, seed: u64) -> Scene {
    let starfield = StarfieldGenerator::new(seed, config.starfield.count, config.starfield.extent)
        .generate(config.starfield.point_size);

    let cam = &config.camera;
    let mut camera = CameraRig::new(
        Vec3::from_array(cam.position),
        cam.fov_y_degrees,
        cam.near,
        cam.far,
        cam.damping,
    );
    camera.resize(config.window.width, config.window.height);

    Scene::build(
        registry,
        Sun::default(),
        PointLight::at_sun(config.lighting.point_intensity, config.lighting.point_range),
        AmbientLight::white(config.lighting.ambient_intensity),
        starfield,
        camera,
    )
}
