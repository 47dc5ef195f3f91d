//! `ep-mobility` — where the user is, and which server is closest.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`path`]     | `PathTrack` — cyclic waypoint sequence                      |
//! | [`distance`] | `DistanceFn` trait, `Haversine` default                     |
//! | [`site`]     | `ServerSite`, `nearest_server` (first-minimum-wins argmin)  |
//! | [`monitor`]  | `MobilityMonitor` — per-task position and step logic        |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                        |
//!
//! # Movement model
//!
//! Each task carries the position of the user that submitted it as an index
//! into a shared [`PathTrack`].  On every monitor wake-up the index advances
//! by a random number of waypoints; the path repeats, so index access wraps
//! modulo its length.  The nearest server is recomputed from the new
//! coordinate through a pluggable [`DistanceFn`], and the simulator
//! reassigns the task when it changes.

pub mod distance;
pub mod error;
pub mod monitor;
pub mod path;
pub mod site;


pub use distance::{DistanceFn, Haversine};
pub use error::{MobilityError, MobilityResult};
pub use monitor::{MobilityMonitor, Observation};
pub use path::PathTrack;
pub use site::{ServerSite, nearest_server};
