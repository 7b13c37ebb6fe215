//! Read-only snapshot of a session, published for observers such as the
//! control server.

use serde::Serialize;

use crate::control::SliderDescriptor;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PreloadPhase {
    Pending { remaining: usize },
    Ready,
    Failed { key: String, reason: String },
}

impl Default for PreloadPhase {
    fn default() -> Self {
        Self::Pending { remaining: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub name: String,
    pub angle: f64,
    pub speed: f64,
    pub position: [f64; 3],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub paused: bool,
    /// Label of the pause button ("Pause" or "Resume").
    pub pause_label: String,
    /// Animation held back waiting for textures.
    pub holding: bool,
    pub preload: PreloadPhase,
    pub bodies: Vec<BodySnapshot>,
    pub sliders: Vec<SliderDescriptor>,
}
