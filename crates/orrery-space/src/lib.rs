//! Solar-system scene description: body descriptors, the body registry,
//! sun and lights, the starfield backdrop, orbit rings, and the camera.
//!
//! Nothing here draws. A [`Scene`] is the data a renderer consumes, and its
//! planet transforms are written each tick through [`PositionSink`].

pub mod body;
pub mod registry;
pub mod ring;
pub mod scene;
pub mod starfield;
pub mod sun;

pub use body::{CelestialBodyDescriptor, hex_to_rgb};
pub use registry::{BodyManifest, BodyRegistry, RegistryError};
pub use ring::OrbitRing;
pub use scene::{CameraRig, PlanetNode, PositionSink, Scene};
pub use starfield::{Starfield, StarfieldGenerator};
pub use sun::{AmbientLight, PointLight, Sun};
