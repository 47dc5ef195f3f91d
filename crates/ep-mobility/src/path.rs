//! The user's travel path.

use ep_core::GeoPoint;

use crate::{MobilityError, MobilityResult};

/// An ordered, non-empty, read-only sequence of waypoints that repeats
/// forever: index `len()` is waypoint 0 again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTrack {
    points: Vec<GeoPoint>,
}

impl PathTrack {
    pub fn new(points: Vec<GeoPoint>) -> MobilityResult<Self> {
        if points.is_empty() {
            return Err(MobilityError::EmptyPath);
        }
        Ok(Self { points })
    }

    /// Build from `[lat, lon]` pairs.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> MobilityResult<Self> {
        Self::new(pairs.iter().copied().map(GeoPoint::from).collect())
    }

    /// Waypoint at `index`, wrapping around the end of the path.
    #[inline]
    pub fn at(&self, index: usize) -> GeoPoint {
        self.points[index % self.points.len()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for the `len`/`is_empty` convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }
}
