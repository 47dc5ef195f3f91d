//! `ep-resource` — edge servers as capacity-bounded resources.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`resource`] | `Resource`, `Claim`, `PendingRequest`, `Grant`, `ResourceSnapshot` |
//! | [`stats`]    | `LevelMonitor` — time-weighted occupancy statistics        |
//! | [`error`]    | `ResourceError`, `ResourceResult<T>`                       |
//!
//! # Claim model
//!
//! ```text
//! request(t, n)   queue empty && claimed + n <= capacity  → Granted
//!                 otherwise                               → Queued (FIFO tail)
//! release(t)      claimed -= n, then grant queue head while it fits
//! cancel(t)       drop t's pending request, then grant queue head while it fits
//! ```
//!
//! Grants never skip the head of the queue, so a small late request cannot
//! starve a large early one.

pub mod error;
pub mod resource;
pub mod stats;


pub use error::{ResourceError, ResourceResult};
pub use resource::{
    Cancelled, Claim, Grant, PendingRequest, Release, RequestOutcome, Resource, ResourceSnapshot,
};
pub use stats::LevelMonitor;
