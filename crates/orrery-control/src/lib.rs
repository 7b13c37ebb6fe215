//! HTTP control surface for a running orrery.
//!
//! Exposes the speed sliders and the pause button as JSON endpoints. The
//! server never touches simulation state: it reads the snapshot the main
//! loop publishes each tick and turns requests into control events.

pub mod server;

pub use server::{ControlServer, ControlServerError, SharedSnapshot};


/// Gets the control port from the environment, falling back to `default`.
pub fn port_from_env(default: u16) -> u16 {
    std::env::var("ORRERY_CONTROL_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
