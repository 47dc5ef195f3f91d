//! Plain data row types written by output backends.

/// One task lifecycle event.
///
/// Columns that do not apply to `event` are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRow {
    pub time:       f64,
    pub task:       u32,
    /// `created`, `queued`, `claimed`, … (see `TraceEvent::kind`).
    pub event:      &'static str,
    /// The server concerned: the origin for a reassignment, the nearest
    /// server after a move.
    pub server:     u16,
    /// Destination of a reassignment.
    pub target:     Option<u16>,
    pub path_index: Option<usize>,
    pub cpu_demand: Option<u32>,
    /// Work still owed (`created`, `claimed`, `reassigned`), time held
    /// (`released`) or turnaround (`completed`).
    pub duration:   Option<f64>,
    /// Queue position, waiting time or failure reason.
    pub detail:     String,
}

/// One server's occupancy at a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyRow {
    pub time:           f64,
    pub server:         u16,
    pub name:           String,
    pub capacity:       u32,
    pub claimed:        u32,
    pub occupancy:      f64,
    /// Time-weighted mean since the start of the run.
    pub mean_occupancy: f64,
    pub max_occupancy:  f64,
    pub claimers:       usize,
    pub requesters:     usize,
}
