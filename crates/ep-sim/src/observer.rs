//! Simulation observer trait for progress reporting and data collection.

use ep_core::SimTime;
use ep_resource::ResourceSnapshot;

use crate::{TraceEvent, Wake};

/// Callbacks invoked by [`Sim`][crate::Sim] while it runs.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The simulator never reads anything
/// back from an observer.
///
/// # Example: completion counter
///
/// ```rust,ignore
/// struct Completions(usize);
///
/// impl SimObserver for Completions {
///     fn on_trace(&mut self, _now: SimTime, event: &TraceEvent) {
///         if matches!(event, TraceEvent::Completed { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before each event is dispatched.
    fn on_wake(&mut self, _now: SimTime, _wake: &Wake) {}

    /// Called for every task lifecycle event, in order.
    fn on_trace(&mut self, _now: SimTime, _event: &TraceEvent) {}

    /// Called at snapshot intervals (see `SimConfig::snapshot_interval`)
    /// with one entry per server, in server order.
    fn on_snapshot(&mut self, _now: SimTime, _servers: &[ResourceSnapshot]) {}

    /// Called once when `run` returns successfully.
    fn on_sim_end(&mut self, _final_time: SimTime, _servers: &[ResourceSnapshot]) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps everything it is told, in order.  Handy for tests and for
/// comparing runs.
#[derive(Default, Debug)]
pub struct TraceRecorder {
    pub events:    Vec<(SimTime, TraceEvent)>,
    pub snapshots: Vec<(SimTime, Vec<ResourceSnapshot>)>,
    pub wakes:     usize,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events concerning one task, in order.
    pub fn for_task(&self, task: ep_core::TaskId) -> Vec<&(SimTime, TraceEvent)> {
        self.events.iter().filter(|(_, e)| e.task() == task).collect()
    }
}

impl SimObserver for TraceRecorder {
    fn on_wake(&mut self, _now: SimTime, _wake: &Wake) {
        self.wakes += 1;
    }

    fn on_trace(&mut self, now: SimTime, event: &TraceEvent) {
        self.events.push((now, event.clone()));
    }

    fn on_snapshot(&mut self, now: SimTime, servers: &[ResourceSnapshot]) {
        self.snapshots.push((now, servers.to_vec()));
    }
}
