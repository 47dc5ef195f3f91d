//! Time-weighted level statistics.

use ep_core::SimTime;

/// Tracks a piecewise-constant level (here: occupancy ratio) over simulated
/// time and reports its time-weighted mean and its maximum.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelMonitor {
    start:     SimTime,
    last_time: SimTime,
    level:     f64,
    /// Integral of the level from `start` to `last_time`.
    area:      f64,
    max:       f64,
}

impl LevelMonitor {
    pub fn new(start: SimTime) -> Self {
        Self { start, last_time: start, level: 0.0, area: 0.0, max: 0.0 }
    }

    /// Record that the level changes to `level` at `now`.
    pub fn record(&mut self, now: SimTime, level: f64) {
        self.area += self.level * now.since(self.last_time);
        self.last_time = self.last_time.max(now);
        self.level = level;
        self.max = self.max.max(level);
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.level
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Time-weighted mean from the start of observation up to `now`.
    ///
    /// Before any time has elapsed this is the current level.
    pub fn mean(&self, now: SimTime) -> f64 {
        let span = now.since(self.start);
        if span <= 0.0 {
            return self.level;
        }
        (self.area + self.level * now.since(self.last_time)) / span
    }
}
