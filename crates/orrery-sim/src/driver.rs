//! Animation driver: the per-tick orbit update.
//!
//! Positions are recomputed from each body's angle every tick instead of
//! being displaced incrementally, so pausing never drifts and a speed change
//! only alters angular velocity, never the orbit radius.

use orrery_space::PositionSink;

use crate::orbit::OrbitState;
use crate::playback::PlaybackState;

/// Run one tick: advance every angle unless paused, then emit every position.
pub fn advance(states: &mut [OrbitState], playback: &PlaybackState, sink: &mut impl PositionSink) {
    if !playback.paused {
        for state in states.iter_mut() {
            state.angle += state.angular_speed;
        }
    }
    emit_positions(states, sink);
}

/// Emit the current position of every body without moving anything.
pub fn emit_positions(states: &[OrbitState], sink: &mut impl PositionSink) {
    for (index, state) in states.iter().enumerate() {
        sink.place(index, state.position());
    }
}
