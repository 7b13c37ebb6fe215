//! Interactive control surface: speed sliders and the pause toggle.
//!
//! Input arrives as [`ControlEvent`] messages from any thread. Producers hold
//! a [`ControlSender`]; the simulation drains the [`ControlQueue`] once at
//! the start of each tick, in arrival order, so every event committed before
//! a tick is visible to that tick.

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orrery_config::{SimulationConfig, SpeedPolicy};

/// A user action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControlEvent {
    /// Move body `body`'s speed slider to `value`.
    SetSpeed { body: String, value: f64 },
    /// Flip the pause flag.
    TogglePause,
    /// Stop the application.
    Quit,
}

/// What applying an event did.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlOutcome {
    /// Speed stored for the body at `index`.
    SpeedSet { index: usize, speed: f64 },
    /// Pause flag is now `paused`.
    PauseToggled { paused: bool },
    /// Quit was requested.
    QuitRequested,
    /// The event was dropped.
    Rejected(ControlError),
}

/// Reasons a control event is dropped.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ControlError {
    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("speed {0} is not a finite number")]
    NonFinite(f64),

    #[error("speed {value} outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Bounds and step of every speed slider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            min: config.speed_min,
            max: config.speed_max,
            step: config.speed_step,
        }
    }

    /// Check `value` against the slider under `policy`, returning the speed to store.
    pub fn validate(&self, value: f64, policy: SpeedPolicy) -> Result<f64, ControlError> {
        match policy {
            SpeedPolicy::Passthrough => Ok(value),
            _ if !value.is_finite() => Err(ControlError::NonFinite(value)),
            SpeedPolicy::Clamp => Ok(value.max(self.min).min(self.max)),
            SpeedPolicy::Reject => {
                if (self.min..=self.max).contains(&value) {
                    Ok(value)
                } else {
                    Err(ControlError::OutOfRange {
                        value,
                        min: self.min,
                        max: self.max,
                    })
                }
            }
        }
    }
}

impl Default for SliderRange {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Serializable description of one speed slider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SliderDescriptor {
    pub body: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

/// Producer handle for control events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ControlSender {
    tx: Sender<ControlEvent>,
}

impl ControlSender {
    /// Enqueue an event. Returns `false` once the simulation is gone.
    pub fn send(&self, event: ControlEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn set_speed(&self, body: &str, value: f64) -> bool {
        self.send(ControlEvent::SetSpeed {
            body: body.to_string(),
            value,
        })
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(ControlEvent::TogglePause)
    }
}

/// Consumer side of the control channel, owned by the simulation.
#[derive(Debug)]
pub struct ControlQueue {
    tx: Sender<ControlEvent>,
    rx: Receiver<ControlEvent>,
}

impl ControlQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// A new producer handle.
    pub fn sender(&self) -> ControlSender {
        ControlSender {
            tx: self.tx.clone(),
        }
    }

    /// Take every pending event, oldest first.
    pub fn drain(&self) -> Vec<ControlEvent> {
        self.rx.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
