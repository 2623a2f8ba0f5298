//! Time sources used by timers and the simulation clock.
//!
//! Every timing decision in a session derives from a [`Clock`] reading expressed in milliseconds
//! since the clock's own epoch. There is no process-wide origin: each session owns its clock.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic source of elapsed time.
pub trait Clock {
    /// Milliseconds elapsed since the clock's epoch. Never decreases.
    fn elapsed_millis(&self) -> f64;
}

/// Wall clock backed by [`Instant`], with its epoch captured at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed_millis(&self) -> f64 {
        millis(self.epoch.elapsed())
    }
}

/// Clock that only moves when told to.
///
/// Meant for driving timers and sessions deterministically in tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Create a clock stopped at its epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn elapsed_millis(&self) -> f64 {
        millis(self.now.get())
    }
}

/// Convert a duration to fractional milliseconds, exact for whole milliseconds.
pub(crate) fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed_millis(&self) -> f64 {
        (**self).elapsed_millis()
    }
}

#[cfg(test)]
mod clock_tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new();
        assert_eq!(clock.elapsed_millis(), 0.0);
        clock.advance(Duration::from_millis(40));
        clock.advance(Duration::from_millis(2));
        assert_eq!(clock.elapsed_millis(), 42.0);
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let first = clock.elapsed_millis();
        std::thread::sleep(Duration::from_millis(2));
        let second = clock.elapsed_millis();
        assert!(second >= first + 1.0);
    }
}
