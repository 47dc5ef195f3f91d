//! Task lifecycle state.

use ep_core::{ServerId, SimTime, TaskId};
use ep_schedule::EventKey;

/// Remaining work at or below this is treated as done.  Absorbs the rounding
/// of `(start + remaining) - start` on real-valued clocks.
pub(crate) const WORK_EPSILON: f64 = 1e-9;

/// Where a task is in its lifecycle.
///
/// `Completed` and `Failed` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskState {
    /// Waiting in a server's queue.
    Queued,
    /// Holding capacity and making progress.
    Claiming,
    Completed,
    /// Asked for more capacity than its server has in total.
    Failed,
}

impl TaskState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Queued    => "queued",
            TaskState::Claiming  => "claiming",
            TaskState::Completed => "completed",
            TaskState::Failed    => "failed",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The attributes a new task is created with.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskSpec {
    pub server:       ServerId,
    pub path_index:   usize,
    pub process_time: f64,
    pub cpu_demand:   u32,
}

/// One unit of work and its progress.
///
/// Invariant while live: the task holds exactly one claim (`Claiming`) or one
/// pending request (`Queued`) on `server`, never both and never on another
/// server.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id:               TaskId,
    pub server:           ServerId,
    pub state:            TaskState,
    pub cpu_demand:       u32,
    /// Processing time requested at creation.
    pub process_time:     f64,
    /// Processing time still owed.  Only decreases.
    pub remaining:        f64,
    pub start_path_index: usize,
    pub created_at:       SimTime,
    /// Start of the current claim, while `Claiming`.
    pub claim_started:    Option<SimTime>,
    pub finished_at:      Option<SimTime>,
    pub reassignments:    u32,
    /// Pending end-of-hold wake-up, while `Claiming`.
    pub(crate) hold:      Option<EventKey>,
}

impl Task {
    pub fn new(id: TaskId, spec: TaskSpec, now: SimTime) -> Self {
        Self {
            id,
            server:           spec.server,
            state:            TaskState::Queued,
            cpu_demand:       spec.cpu_demand,
            process_time:     spec.process_time,
            remaining:        spec.process_time.max(0.0),
            start_path_index: spec.path_index,
            created_at:       now,
            claim_started:    None,
            finished_at:      None,
            reassignments:    0,
            hold:             None,
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Work already done on the current claim, as of `now`.
    pub fn progress(&self, now: SimTime) -> f64 {
        self.claim_started.map_or(0.0, |since| now.since(since))
    }

    /// Time from creation to completion or failure.
    pub fn turnaround(&self) -> Option<f64> {
        self.finished_at.map(|end| end.since(self.created_at))
    }

    pub(crate) fn begin_claim(&mut self, now: SimTime) {
        self.state = TaskState::Claiming;
        self.claim_started = Some(now);
    }

    /// Credit the work done since the claim started and leave the claim.
    ///
    /// `remaining` drops by exactly the elapsed time, floored at zero.
    /// Returns the elapsed time.
    pub(crate) fn settle_progress(&mut self, now: SimTime) -> f64 {
        let elapsed = self.progress(now);
        self.remaining = (self.remaining - elapsed).max(0.0);
        if self.remaining <= WORK_EPSILON {
            self.remaining = 0.0;
        }
        self.claim_started = None;
        elapsed
    }

    pub(crate) fn finish(&mut self, state: TaskState, now: SimTime) {
        debug_assert!(state.is_terminal());
        self.state = state;
        self.finished_at = Some(now);
        self.claim_started = None;
        self.hold = None;
    }
}
