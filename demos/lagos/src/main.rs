//! lagos — mobility-aware task placement around three edge servers.
//!
//! Tasks arrive every 20–30 time units, each carried by a user walking a
//! fixed loop.  Every time unit the user moves 1–4 waypoints; when a
//! different server becomes the closest one the task is moved there,
//! keeping whatever work it has already done.
//!
//! ```text
//! cargo run -p lagos                       # default configuration
//! cargo run -p lagos -- config.json out/   # JSON SimConfig, output dir
//! RUST_LOG=ep_sim=debug cargo run -p lagos # per-event logging
//! ```

mod scenario;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ep_core::{SimConfig, SimTime};
use ep_mobility::{Haversine, PathTrack};
use ep_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ep_resource::ResourceSnapshot;
use ep_sim::{SimBuilder, SimObserver, TraceEvent};

// ── Observer wrapper to tally outcomes ────────────────────────────────────────

struct TallyObserver<W: OutputWriter> {
    inner:        SimOutputObserver<W>,
    completed_on: Vec<usize>,
    moves:        usize,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>, servers: usize) -> Self {
        Self { inner, completed_on: vec![0; servers], moves: 0 }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_trace(&mut self, now: SimTime, event: &TraceEvent) {
        match event {
            TraceEvent::Completed { server, .. } => {
                if let Some(n) = self.completed_on.get_mut(server.index()) {
                    *n += 1;
                }
            }
            TraceEvent::Reassigned { .. } => self.moves += 1,
            _ => {}
        }
        self.inner.on_trace(now, event);
    }

    fn on_snapshot(&mut self, now: SimTime, servers: &[ResourceSnapshot]) {
        self.inner.on_snapshot(now, servers);
    }

    fn on_sim_end(&mut self, final_time: SimTime, servers: &[ResourceSnapshot]) {
        self.inner.on_sim_end(final_time, servers);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&str>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lagos=info,ep_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let out_dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output/lagos"));

    println!("=== lagos — mobility-aware edge task placement ===");
    println!(
        "Servers: {}  |  Waypoints: {}  |  Horizon: {}  |  Seed: {}",
        scenario::servers().len(),
        scenario::WAYPOINTS.len(),
        config.horizon,
        config.seed
    );
    println!();

    // 1. Build sim.
    let mut sim = SimBuilder::new(config, Haversine)
        .servers(scenario::servers())
        .path(PathTrack::from_pairs(&scenario::WAYPOINTS)?)
        .build()?;

    // 2. Set up output.
    let writer = CsvWriter::new(&out_dir)?;
    let mut obs = TallyObserver::new(SimOutputObserver::new(writer), sim.servers.len());
    info!(dir = %out_dir.display(), "writing output");

    // 3. Run.
    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  {} events, final time {}, {} trace rows written",
        summary.events_processed,
        summary.final_time,
        obs.inner.trace_rows()
    );
    println!(
        "  tasks: {} created, {} completed, {} failed, {} in flight, {} reassignments",
        summary.tasks_created, summary.completed, summary.failed, summary.in_flight, obs.moves
    );
    println!();

    // 5. Per-server table.
    println!(
        "{:<10} {:>9} {:>8} {:>10} {:>10} {:>10}",
        "Server", "Claimers", "Waiting", "Mean occ", "Max occ", "Completed"
    );
    println!("{}", "-".repeat(62));
    for snap in sim.snapshots() {
        println!(
            "{:<10} {:>9} {:>8} {:>10.3} {:>10.3} {:>10}",
            snap.name,
            snap.claimers.len(),
            snap.requesters.len(),
            snap.mean_occupancy,
            snap.max_occupancy,
            obs.completed_on.get(snap.server.index()).copied().unwrap_or(0),
        );
    }

    Ok(())
}
