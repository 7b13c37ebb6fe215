//! Preload gate: a one-shot barrier over the body texture loads.
//!
//! The loading indicator is shown when the gate is created and hidden exactly
//! once, when every body's texture has loaded. A single failure fails the
//! whole gate for good: no retry, no partial readiness, and the indicator
//! stays up. Loads may complete in any order.

use tracing::{debug, info, warn};

/// Widget showing that assets are still loading.
pub trait LoadingIndicator: Send {
    fn set_visible(&mut self, visible: bool);
}

/// Indicator that only logs. Used when nothing is displayed.
#[derive(Debug, Default)]
pub struct LogIndicator;

impl LoadingIndicator for LogIndicator {
    fn set_visible(&mut self, visible: bool) {
        if visible {
            info!("Loading textures...");
        } else {
            info!("All textures loaded");
        }
    }
}

/// Gate progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateStatus {
    /// Waiting on `remaining` loads.
    Pending { remaining: usize },
    /// Every load succeeded; the ready signal has fired.
    Ready,
    /// A load failed; the ready signal will never fire.
    Failed { key: String, reason: String },
}

pub struct PreloadGate {
    loaded: Vec<bool>,
    status: GateStatus,
    indicator: Box<dyn LoadingIndicator>,
}

impl PreloadGate {
    /// Gate over `expected` loads. Shows the indicator, and with nothing to
    /// wait for, hides it again immediately.
    pub fn new(expected: usize, mut indicator: Box<dyn LoadingIndicator>) -> Self {
        indicator.set_visible(true);
        let mut gate = Self {
            loaded: vec![false; expected],
            status: GateStatus::Pending {
                remaining: expected,
            },
            indicator,
        };
        gate.settle();
        gate
    }

    /// Record the outcome of the load for body `index`.
    ///
    /// Duplicate successes for the same body count once. Outcomes for an
    /// index outside the gate, or after the gate has settled, are ignored.
    pub fn record<T, E: std::fmt::Display>(
        &mut self,
        index: usize,
        key: &str,
        outcome: &Result<T, E>,
    ) -> &GateStatus {
        if !matches!(self.status, GateStatus::Pending { .. }) {
            debug!("Ignoring late load of {key}: gate already settled");
            return &self.status;
        }

        let Some(slot) = self.loaded.get_mut(index) else {
            warn!("Load for unknown body index {index} ({key}) ignored");
            return &self.status;
        };

        match outcome {
            Err(e) => {
                warn!("Texture {key} failed to load: {e}");
                self.status = GateStatus::Failed {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
            }
            Ok(_) if *slot => debug!("Duplicate load of {key} ignored"),
            Ok(_) => {
                *slot = true;
                let remaining = self.loaded.iter().filter(|l| !**l).count();
                debug!("Texture {key} loaded, {remaining} remaining");
                self.status = GateStatus::Pending { remaining };
                self.settle();
            }
        }
        &self.status
    }

    fn settle(&mut self) {
        if self.status == (GateStatus::Pending { remaining: 0 }) {
            self.status = GateStatus::Ready;
            self.indicator.set_visible(false);
        }
    }

    /// Returns the current gate progress.
    pub fn status(&self) -> &GateStatus {
        &self.status
    }

    /// Returns true once every load has succeeded.
    pub fn is_ready(&self) -> bool {
        self.status == GateStatus::Ready
    }

    /// Returns true if any load failed. A failed gate never becomes ready.
    pub fn has_failed(&self) -> bool {
        matches!(self.status, GateStatus::Failed { .. })
    }
}
