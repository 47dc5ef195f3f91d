//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous, non-negative `f64` wrapped in [`SimTime`].  Task
//! inter-arrival gaps are sampled from a real-valued distribution, so an
//! integer tick (as used by hourly agent models) would quantise them away.
//!
//! `SimTime` implements `Ord` through [`f64::total_cmp`].  The event queue
//! only ever stores finite, non-negative times (see
//! [`SimTime::try_new`]), for which `total_cmp` agrees with the usual
//! numeric order.

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult};

/// An absolute point in simulated time.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Validate `t` as a simulation time: finite and `>= 0`.
    pub fn try_new(t: f64) -> CoreResult<SimTime> {
        if t.is_finite() && t >= 0.0 {
            Ok(SimTime(t))
        } else {
            Err(CoreError::InvalidTime(t))
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, floored at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    #[inline]
    fn from(t: f64) -> Self {
        SimTime(t)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}
