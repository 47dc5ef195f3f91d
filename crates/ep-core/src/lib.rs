//! `ep-core` — foundational types for the `edge_placement` simulator.
//!
//! This crate is a dependency of every other `ep-*` crate.  It intentionally
//! has no `ep-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TaskId`, `ServerId`                                  |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`time`]        | `SimTime`                                             |
//! | [`rng`]         | `RandomSource` capability, `SimRng` (seeded default)  |
//! | [`config`]      | `SimConfig`, `GeneratorConfig`, `IntRange`, `RealRange` |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GeneratorConfig, IntRange, RealRange, SimConfig};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{ServerId, TaskId};
pub use rng::{RandomSource, SimRng};
pub use time::SimTime;
