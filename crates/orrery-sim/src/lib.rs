//! Orbit animation and interactive control.
//!
//! A [`SimulationContext`] owns every body's [`OrbitState`], the global
//! [`PlaybackState`], the queue of pending [`ControlEvent`]s and the texture
//! [`PreloadGate`]. Each tick drains control input, advances the orbits and
//! hands positions to the scene. All of it runs on one thread; other threads
//! only talk to it through channels.

pub mod assets;
pub mod context;
pub mod control;
pub mod driver;
pub mod frame_clock;
pub mod orbit;
pub mod playback;
pub mod preload;
pub mod snapshot;

pub use assets::{
    AssetError, FileTextureSource, LoadTarget, Texture, TextureLoadResult, TextureLoader,
    TextureSource,
};
pub use context::SimulationContext;
pub use control::{
    ControlError, ControlEvent, ControlOutcome, ControlQueue, ControlSender, SliderDescriptor,
    SliderRange,
};
pub use driver::{advance, emit_positions};
pub use frame_clock::FrameClock;
pub use orbit::{OrbitState, initialize};
pub use playback::PlaybackState;
pub use preload::{GateStatus, LoadingIndicator, LogIndicator, PreloadGate};
pub use snapshot::{BodySnapshot, PreloadPhase, SimulationSnapshot};
