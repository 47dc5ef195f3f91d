//! `ep-sim` — discrete-event orchestrator for the edge_placement simulator.
//!
//! # Processes
//!
//! ```text
//! Generate          sample a TaskSpec → spawn Task → hold Uniform(20,30) → repeat
//! Task(id)          request cpu on server ─┬─ granted → hold remaining → release → Completed
//!                                          └─ queued  → (resumed by a release/cancel grant)
//! MonitorTick(id)   every interval: step along path → nearest server changed? → reassign(id)
//! Snapshot          every interval: hand per-server occupancy to the observer
//! ```
//!
//! All four are explicit state machines woken by [`Wake`] events popped from
//! one [`EventQueue`][ep_schedule::EventQueue].  A dispatch runs to
//! completion before the next event is popped; resource grants caused by a
//! release are resumed inside the same dispatch.
//!
//! # Reassignment
//!
//! ```text
//! Claiming: cancel hold, remaining -= elapsed (≥ 0), release old claim,
//!           request on new server (or complete if nothing remains)
//! Queued:   cancel pending request on old server, request on new server
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ep_core::SimConfig;
//! use ep_mobility::{Haversine, PathTrack};
//! use ep_sim::{NoopObserver, ServerSpec, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), Haversine)
//!     .servers(specs)
//!     .path(PathTrack::from_pairs(&WAYPOINTS)?)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod generator;
pub mod observer;
pub mod sim;
pub mod task;
pub mod trace;

#[cfg(test)]
mod tests;

pub use builder::{ServerSpec, SimBuilder};
pub use error::{SimError, SimResult};
pub use generator::TaskGenerator;
pub use observer::{NoopObserver, SimObserver, TraceRecorder};
pub use sim::{MonitorSlot, RunSummary, Sim, Wake};
pub use task::{Task, TaskSpec, TaskState};
pub use trace::TraceEvent;
