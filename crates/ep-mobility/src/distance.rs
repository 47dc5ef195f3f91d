//! Distance trait and the default haversine implementation.
//!
//! # Pluggability
//!
//! The simulator only needs a symmetric, non-negative distance whose values
//! can be ordered.  Tests plug in planar or constant closures; the demo uses
//! great-circle distance.

use ep_core::GeoPoint;

/// Distance between two coordinates.
///
/// Any `Fn(GeoPoint, GeoPoint) -> f64` closure implements this trait.
pub trait DistanceFn {
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64;
}

impl<F> DistanceFn for F
where
    F: Fn(GeoPoint, GeoPoint) -> f64,
{
    #[inline]
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        self(a, b)
    }
}

/// Great-circle distance in metres (see [`GeoPoint::distance_m`]).
#[derive(Copy, Clone, Debug, Default)]
pub struct Haversine;

impl DistanceFn for Haversine {
    #[inline]
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        a.distance_m(b)
    }
}
