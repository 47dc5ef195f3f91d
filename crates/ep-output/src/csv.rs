//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trace.csv`
//! - `occupancy.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OccupancyRow, OutputResult, TraceRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    trace:     Writer<File>,
    occupancy: Writer<File>,
    finished:  bool,
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut trace = Writer::from_path(dir.join("trace.csv"))?;
        trace.write_record([
            "time", "task", "event", "server", "target", "path_index", "cpu_demand", "duration",
            "detail",
        ])?;

        let mut occupancy = Writer::from_path(dir.join("occupancy.csv"))?;
        occupancy.write_record([
            "time", "server", "name", "capacity", "claimed", "occupancy", "mean_occupancy",
            "max_occupancy", "claimers", "requesters",
        ])?;

        Ok(Self { trace, occupancy, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trace(&mut self, rows: &[TraceRow]) -> OutputResult<()> {
        for row in rows {
            self.trace.write_record(&[
                row.time.to_string(),
                row.task.to_string(),
                row.event.to_string(),
                row.server.to_string(),
                opt(row.target),
                opt(row.path_index),
                opt(row.cpu_demand),
                opt(row.duration),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()> {
        for row in rows {
            self.occupancy.write_record(&[
                row.time.to_string(),
                row.server.to_string(),
                row.name.clone(),
                row.capacity.to_string(),
                row.claimed.to_string(),
                format!("{:.6}", row.occupancy),
                format!("{:.6}", row.mean_occupancy),
                format!("{:.6}", row.max_occupancy),
                row.claimers.to_string(),
                row.requesters.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trace.flush()?;
        self.occupancy.flush()?;
        Ok(())
    }
}
