//! Lifecycle events reported to observers.

use ep_core::{ServerId, TaskId};

/// Something that happened to a task.  The ordered sequence of these is the
/// run's trace; two runs with the same seed, path and distance function
/// produce identical traces.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    Created {
        task:         TaskId,
        server:       ServerId,
        process_time: f64,
        cpu_demand:   u32,
        path_index:   usize,
    },
    /// The request could not be granted yet.
    Queued {
        task:     TaskId,
        server:   ServerId,
        position: usize,
    },
    /// Capacity granted; processing starts with `remaining` left.
    Claimed {
        task:      TaskId,
        server:    ServerId,
        remaining: f64,
        waited:    f64,
    },
    Released {
        task:   TaskId,
        server: ServerId,
        amount: u32,
        held:   f64,
    },
    /// The monitor advanced the user along the path.
    Moved {
        task:       TaskId,
        path_index: usize,
        nearest:    ServerId,
    },
    Reassigned {
        task:      TaskId,
        from:      ServerId,
        to:        ServerId,
        remaining: f64,
    },
    Completed {
        task:       TaskId,
        server:     ServerId,
        turnaround: f64,
    },
    Failed {
        task:   TaskId,
        server: ServerId,
        reason: String,
    },
}

impl TraceEvent {
    pub fn task(&self) -> TaskId {
        match self {
            TraceEvent::Created { task, .. }
            | TraceEvent::Queued { task, .. }
            | TraceEvent::Claimed { task, .. }
            | TraceEvent::Released { task, .. }
            | TraceEvent::Moved { task, .. }
            | TraceEvent::Reassigned { task, .. }
            | TraceEvent::Completed { task, .. }
            | TraceEvent::Failed { task, .. } => *task,
        }
    }

    /// Short label, used as the `kind` column by output writers.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEvent::Created { .. }    => "created",
            TraceEvent::Queued { .. }     => "queued",
            TraceEvent::Claimed { .. }    => "claimed",
            TraceEvent::Released { .. }   => "released",
            TraceEvent::Moved { .. }      => "moved",
            TraceEvent::Reassigned { .. } => "reassigned",
            TraceEvent::Completed { .. }  => "completed",
            TraceEvent::Failed { .. }     => "failed",
        }
    }

    /// The server this event concerns (the destination for reassignments).
    pub fn server(&self) -> ServerId {
        match self {
            TraceEvent::Created { server, .. }
            | TraceEvent::Queued { server, .. }
            | TraceEvent::Claimed { server, .. }
            | TraceEvent::Released { server, .. }
            | TraceEvent::Completed { server, .. }
            | TraceEvent::Failed { server, .. } => *server,
            TraceEvent::Moved { nearest, .. } => *nearest,
            TraceEvent::Reassigned { to, .. } => *to,
        }
    }
}
