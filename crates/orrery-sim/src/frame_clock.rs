//! Fixed-cadence tick clock standing in for the display refresh callback.
//!
//! Elapsed wall time feeds an accumulator that releases one tick per period.
//! Long stalls are clamped so a hiccup never triggers a burst of catch-up
//! ticks.

use std::time::{Duration, Instant};
use tracing::warn;

/// Maximum frame time credited per call, in seconds.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct FrameClock {
    period: f64,
    previous_time: Instant,
    accumulator: f64,
    tick_count: u64,
}

impl FrameClock {
    /// Clock releasing `rate_hz` ticks per second (at least 1).
    pub fn new(rate_hz: u32) -> Self {
        Self {
            period: 1.0 / f64::from(rate_hz.max(1)),
            previous_time: Instant::now(),
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    /// Measure elapsed time and run `tick_fn` once per due tick.
    /// Returns the number of ticks run.
    pub fn tick(&mut self, tick_fn: impl FnMut(u64)) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance_by(frame_time, tick_fn)
    }

    /// Credit `frame_time` seconds and run every tick that became due.
    pub fn advance_by(&mut self, frame_time: f64, mut tick_fn: impl FnMut(u64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut ran = 0;
        while self.accumulator >= self.period {
            tick_fn(self.tick_count);
            self.tick_count += 1;
            self.accumulator -= self.period;
            ran += 1;
        }
        ran
    }

    /// Time left until the next tick becomes due.
    pub fn time_until_next_tick(&self) -> Duration {
        let elapsed = self.previous_time.elapsed().as_secs_f64();
        let remaining = self.period - self.accumulator - elapsed;
        Duration::from_secs_f64(remaining.max(0.0))
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Total ticks released so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
