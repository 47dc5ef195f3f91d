//! Top-level simulation configuration.
//!
//! The defaults reproduce the reference scenario: a 200-unit horizon, a
//! one-unit mobility interval with 1–4 waypoint steps, and a task generator
//! that favours the first server 40:30:20.
//!
//! Typically built in code or loaded from a JSON/TOML file by the
//! application crate (enable the `serde` feature) and passed to
//! `ep_sim::SimBuilder`.

use crate::{CoreError, CoreResult};

// ── Ranges ────────────────────────────────────────────────────────────────────

/// Inclusive integer range `lo..=hi` for uniform sampling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntRange {
    pub lo: i64,
    pub hi: i64,
}

impl IntRange {
    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    fn check(&self, what: &str) -> CoreResult<()> {
        if self.lo > self.hi {
            return Err(CoreError::Config(format!(
                "{what}: empty range {}..={}", self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// Half-open real range `lo..hi` for uniform sampling.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealRange {
    pub lo: f64,
    pub hi: f64,
}

impl RealRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

// ── GeneratorConfig ───────────────────────────────────────────────────────────

/// Distributions sampled by the task generator for every new task.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    /// When `false` no generator process is started; tasks must be spawned
    /// explicitly through `Sim::spawn_task`.
    pub enabled: bool,

    /// Starting waypoint index of the user carrying the task.
    pub path_index: IntRange,

    /// Relative weight of each server as the initial placement.  Must have
    /// one entry per server.
    pub server_weights: Vec<f64>,

    /// Total processing time a task needs while holding its claim.
    pub process_time: IntRange,

    /// CPU units requested from the server.
    pub cpu_demand: IntRange,

    /// Gap between consecutive task arrivals.
    pub interarrival: RealRange,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled:        true,
            path_index:     IntRange::new(10, 30),
            server_weights: vec![40.0, 30.0, 20.0],
            process_time:   IntRange::new(40, 60),
            cpu_demand:     IntRange::new(500, 900),
            interarrival:   RealRange::new(20.0, 30.0),
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// The run loop stops once the next event lies beyond this time.  Events
    /// scheduled exactly at the horizon still run.
    pub horizon: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Time between two mobility monitor wake-ups.
    pub monitor_interval: f64,

    /// Waypoints advanced per monitor wake-up.
    pub monitor_step: IntRange,

    /// Emit an occupancy snapshot to the observer every this many time
    /// units.  `None` disables periodic snapshots.
    pub snapshot_interval: Option<f64>,

    pub generator: GeneratorConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon:           200.0,
            seed:              42,
            monitor_interval:  1.0,
            monitor_step:      IntRange::new(1, 4),
            snapshot_interval: Some(1.0),
            generator:         GeneratorConfig::default(),
        }
    }
}

impl SimConfig {
    /// Check everything that does not depend on the server list.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.horizon.is_finite() && self.horizon >= 0.0) {
            return Err(CoreError::Config(format!(
                "horizon must be finite and non-negative, got {}", self.horizon
            )));
        }
        if !(self.monitor_interval.is_finite() && self.monitor_interval > 0.0) {
            return Err(CoreError::Config(format!(
                "monitor_interval must be positive, got {}", self.monitor_interval
            )));
        }
        if let Some(every) = self.snapshot_interval {
            if !(every.is_finite() && every > 0.0) {
                return Err(CoreError::Config(format!(
                    "snapshot_interval must be positive, got {every}"
                )));
            }
        }
        self.monitor_step.check("monitor_step")?;
        if self.monitor_step.lo < 0 {
            return Err(CoreError::Config("monitor_step must not move backwards".into()));
        }

        let g = &self.generator;
        g.path_index.check("generator.path_index")?;
        if g.path_index.lo < 0 {
            return Err(CoreError::Config("generator.path_index must be >= 0".into()));
        }
        g.process_time.check("generator.process_time")?;
        g.cpu_demand.check("generator.cpu_demand")?;
        if g.process_time.lo < 0 {
            return Err(CoreError::Config("generator.process_time must be >= 0".into()));
        }
        if g.cpu_demand.lo <= 0 {
            return Err(CoreError::Config("generator.cpu_demand must be > 0".into()));
        }
        if g.enabled {
            let usable = g.server_weights.iter().all(|w| w.is_finite() && *w >= 0.0);
            if !usable || !(g.server_weights.iter().sum::<f64>() > 0.0) {
                return Err(CoreError::Config(format!(
                    "generator.server_weights must be non-negative with a positive sum, got {:?}",
                    g.server_weights
                )));
            }
        }
        let gap = g.interarrival;
        if !(gap.lo.is_finite() && gap.hi.is_finite() && gap.lo > 0.0 && gap.hi >= gap.lo) {
            return Err(CoreError::Config(format!(
                "generator.interarrival must be a positive range, got {}..{}",
                gap.lo, gap.hi
            )));
        }
        Ok(())
    }
}
