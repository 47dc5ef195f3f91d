//! The `OutputWriter` trait implemented by backend writers.

use crate::{OccupancyRow, OutputResult, TraceRow};

/// Sink for simulation output rows.
///
/// Errors reach the observer, which stores them for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of lifecycle events.
    fn write_trace(&mut self, rows: &[TraceRow]) -> OutputResult<()>;

    /// Write one occupancy row per server.
    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
