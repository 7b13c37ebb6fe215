//! Global pause flag.

/// Session-wide playback state. Toggled by the pause control, read once per
/// tick by the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub paused: bool,
}

impl PlaybackState {
    /// Flip `paused` and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Label for the pause button: the action a click would take.
    pub fn label(&self) -> &'static str {
        if self.paused { "Resume" } else { "Pause" }
    }
}
