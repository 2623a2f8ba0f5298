//! Frame accounting for the fixed-tick session loop.

use crate::clock::Clock;

/// Largest frame delta folded into the accumulator, in milliseconds.
///
/// Keeps a stalled loop from piling up a huge backlog.
pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

/// Fixed-step bookkeeping for a session loop.
///
/// Tracks frame count, a smoothed frame rate, and an accumulator of clamped
/// per-frame deltas. Sessions pace themselves with a sleep, so this is
/// instrumentation, not a scheduler.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    frames: u64,
    rate: u64,
    previous: f64,
    current: f64,
    frame_delta: f64,
    accumulator: f64,
}

impl SimulationClock {
    /// Start counting from the clock's current reading.
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            frames: 0,
            rate: 0,
            previous: 0.0,
            current: clock.elapsed_millis(),
            frame_delta: 0.0,
            accumulator: 0.0,
        }
    }

    /// Record one frame.
    pub fn update(&mut self, clock: &impl Clock) {
        self.frames += 1;

        self.previous = self.current;
        self.current = clock.elapsed_millis();
        self.frame_delta = (self.current - self.previous).clamp(0.0, MAX_FRAME_DELTA_MS);
        self.accumulator += self.frame_delta;

        let elapsed_secs = (self.current / 1000.0) as u64;
        self.rate = self.frames / (1 + elapsed_secs);
    }

    /// Frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second since the clock's epoch.
    pub fn rate(&self) -> u64 {
        self.rate
    }

    /// Clamped duration of the last frame, in milliseconds.
    pub fn frame_delta(&self) -> f64 {
        self.frame_delta
    }

    /// Sum of clamped frame deltas, in milliseconds.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}
