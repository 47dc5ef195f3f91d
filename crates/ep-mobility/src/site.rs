//! Fixed server locations and nearest-server selection.

use ep_core::{GeoPoint, ServerId};

use crate::DistanceFn;

/// Where a server physically sits.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerSite {
    pub id:       ServerId,
    pub location: GeoPoint,
}

/// The site closest to `from`, with its distance.
///
/// Ties go to the earliest site in `sites` (the first one reaching the
/// minimum wins); only a strictly smaller distance displaces the current
/// best.  NaN distances are ignored.  Returns `None` if `sites` is empty or
/// every distance is NaN.
pub fn nearest_server<D: DistanceFn + ?Sized>(
    sites:    &[ServerSite],
    from:     GeoPoint,
    distance: &D,
) -> Option<(ServerId, f64)> {
    let mut best: Option<(ServerId, f64)> = None;
    for site in sites {
        let d = distance.distance(from, site.location);
        if d.is_nan() {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((site.id, d)),
        }
    }
    best
}
