//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ep_core::SimTime;
use ep_resource::ResourceSnapshot;
use ep_sim::{SimObserver, TraceEvent};
use tracing::warn;

use crate::row::{OccupancyRow, TraceRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes the lifecycle trace and per-server
/// occupancy to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    trace_rows: u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, trace_rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Trace rows handed to the writer so far.
    pub fn trace_rows(&self) -> u64 {
        self.trace_rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }

    fn write_occupancy(&mut self, now: SimTime, servers: &[ResourceSnapshot]) {
        let rows: Vec<OccupancyRow> = servers.iter().map(|s| occupancy_row(now, s)).collect();
        if !rows.is_empty() {
            let result = self.writer.write_occupancy(&rows);
            self.store_err(result);
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_trace(&mut self, now: SimTime, event: &TraceEvent) {
        self.trace_rows += 1;
        let result = self.writer.write_trace(&[trace_row(now, event)]);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, now: SimTime, servers: &[ResourceSnapshot]) {
        self.write_occupancy(now, servers);
    }

    fn on_sim_end(&mut self, final_time: SimTime, servers: &[ResourceSnapshot]) {
        self.write_occupancy(final_time, servers);
        let result = self.writer.finish();
        self.store_err(result);
    }
}

// ── Row conversion ────────────────────────────────────────────────────────────

fn trace_row(now: SimTime, event: &TraceEvent) -> TraceRow {
    let mut row = TraceRow {
        time:       now.as_f64(),
        task:       event.task().0,
        event:      event.kind(),
        server:     event.server().0,
        target:     None,
        path_index: None,
        cpu_demand: None,
        duration:   None,
        detail:     String::new(),
    };
    match event {
        TraceEvent::Created { process_time, cpu_demand, path_index, .. } => {
            row.path_index = Some(*path_index);
            row.cpu_demand = Some(*cpu_demand);
            row.duration = Some(*process_time);
        }
        TraceEvent::Queued { position, .. } => {
            row.detail = format!("position={position}");
        }
        TraceEvent::Claimed { remaining, waited, .. } => {
            row.duration = Some(*remaining);
            row.detail = format!("waited={waited}");
        }
        TraceEvent::Released { amount, held, .. } => {
            row.cpu_demand = Some(*amount);
            row.duration = Some(*held);
        }
        TraceEvent::Moved { path_index, .. } => {
            row.path_index = Some(*path_index);
        }
        TraceEvent::Reassigned { from, to, remaining, .. } => {
            row.server = from.0;
            row.target = Some(to.0);
            row.duration = Some(*remaining);
        }
        TraceEvent::Completed { turnaround, .. } => {
            row.duration = Some(*turnaround);
        }
        TraceEvent::Failed { reason, .. } => {
            row.detail = reason.clone();
        }
    }
    row
}

fn occupancy_row(now: SimTime, s: &ResourceSnapshot) -> OccupancyRow {
    OccupancyRow {
        time:           now.as_f64(),
        server:         s.server.0,
        name:           s.name.clone(),
        capacity:       s.capacity,
        claimed:        s.claimed,
        occupancy:      s.occupancy,
        mean_occupancy: s.mean_occupancy,
        max_occupancy:  s.max_occupancy,
        claimers:       s.claimers.len(),
        requesters:     s.requesters.len(),
    }
}
