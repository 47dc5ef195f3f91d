//! `ep-schedule` — the simulated clock and its pending wake-ups.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                    |
//! |-----------|-------------------------------------------------------------|
//! | [`queue`] | `EventQueue<P>` (`BTreeMap<EventKey, P>`), `EventKey`, `Event` |
//! | [`error`] | `ScheduleError`, `ScheduleResult<T>`                        |
//!
//! # Ordering model (summary)
//!
//! ```text
//! key        = (time, seq)          seq = insertion counter, never reused
//! pop order  = time ascending, then seq ascending
//! cancel     = remove(key)          O(log n), no tombstones left behind
//! ```
//!
//! Events scheduled for the same instant therefore fire in the order they
//! were scheduled, which is what makes runs reproducible.

pub mod error;
pub mod queue;


pub use error::{ScheduleError, ScheduleResult};
pub use queue::{Event, EventKey, EventQueue};
