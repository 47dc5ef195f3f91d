//! Per-task mobility monitor state.

use ep_core::{GeoPoint, IntRange, RandomSource, ServerId, TaskId};

use crate::{DistanceFn, MobilityError, MobilityResult, PathTrack, ServerSite, nearest_server};

/// What the monitor saw after one step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observation {
    pub path_index: usize,
    pub location:   GeoPoint,
    pub nearest:    ServerId,
    pub distance:   f64,
}

/// Tracks the moving user behind one task.
///
/// The monitor belongs to exactly one task and is cancelled when that task
/// finishes.  Scheduling its wake-ups is the simulator's job; this type only
/// holds the position and performs the step.
#[derive(Clone, Debug, PartialEq)]
pub struct MobilityMonitor {
    pub owner:      TaskId,
    /// Unwrapped waypoint index.  Wrapped on access by [`PathTrack::at`].
    pub path_index: usize,
    /// Number of completed steps.
    pub steps:      u64,
    cancelled:      bool,
}

impl MobilityMonitor {
    pub fn new(owner: TaskId, path_index: usize) -> Self {
        Self { owner, path_index, steps: 0, cancelled: false }
    }

    /// Stop the monitor for good.  Idempotent.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Advance along `path` by a step drawn from `step`, then find the
    /// nearest of `sites`.
    ///
    /// # Errors
    ///
    /// [`MobilityError::Cancelled`] if the monitor was cancelled (nothing is
    /// mutated), [`MobilityError::NoReachableServer`] if no site yields a
    /// usable distance.
    pub fn step<R, D>(
        &mut self,
        step:     IntRange,
        rng:      &mut R,
        path:     &PathTrack,
        sites:    &[ServerSite],
        distance: &D,
    ) -> MobilityResult<Observation>
    where
        R: RandomSource + ?Sized,
        D: DistanceFn + ?Sized,
    {
        if self.cancelled {
            return Err(MobilityError::Cancelled(self.owner));
        }

        let advance = usize::try_from(rng.uniform_int(step.lo, step.hi)).unwrap_or(0);
        self.path_index = self.path_index.wrapping_add(advance);
        self.steps += 1;

        let location = path.at(self.path_index);
        let (nearest, d) = nearest_server(sites, location, distance)
            .ok_or(MobilityError::NoReachableServer(location))?;

        Ok(Observation { path_index: self.path_index, location, nearest, distance: d })
    }
}
