//! The reference Lagos scenario: three edge servers around the campus and
//! the walking loop every user follows.

use ep_core::GeoPoint;
use ep_sim::ServerSpec;

/// CPU units per server.
pub const SERVER_CAPACITY: u32 = 1_500;

/// `(name, lat, lon)` of each server, in id order.
const SERVERS: [(&str, f64, f64); 3] = [
    ("server0", 6.516060111018401, 3.3942876621261657),
    ("server1", 6.5129475190442365, 3.391069011343227),
    ("server2", 6.518874218644982, 3.3970771594713787),
];

/// The walking loop, `[lat, lon]` per waypoint.  Traversed cyclically.
pub const WAYPOINTS: [[f64; 2]; 152] = [
    [6.51746, 3.387809], [6.517765, 3.38888], [6.51787, 3.389167], [6.518012, 3.389444],
    [6.518155, 3.389655], [6.518613, 3.390258], [6.518714, 3.390429], [6.518853, 3.390723],
    [6.518918, 3.390906], [6.518962, 3.391101], [6.518987, 3.391336], [6.518953, 3.39136],
    [6.518938, 3.391409], [6.518958, 3.391456], [6.518996, 3.391478], [6.519081, 3.392472],
    [6.519061, 3.392809], [6.518588, 3.395111], [6.518573, 3.395146], [6.518581, 3.395172],
    [6.518524, 3.395528], [6.518519, 3.395746], [6.518543, 3.395964], [6.518633, 3.396351],
    [6.518885, 3.396932], [6.518885, 3.396951], [6.518558, 3.397097], [6.518337, 3.397163],
    [6.51809, 3.397207], [6.5181, 3.397415], [6.517817, 3.397375], [6.517817, 3.397375],
    [6.517697, 3.397358], [6.517421, 3.397361], [6.517129, 3.397372], [6.517122, 3.39718],
    [6.516851, 3.397201], [6.516615, 3.397247], [6.516186, 3.397415], [6.515613, 3.397588],
    [6.515248, 3.39763], [6.514928, 3.397589], [6.514331, 3.397446], [6.513938, 3.397392],
    [6.513805, 3.397393], [6.513803, 3.39705], [6.513803, 3.39705], [6.5138, 3.395799],
    [6.513733, 3.395255], [6.513587, 3.394569], [6.51326, 3.393188], [6.512997, 3.39195],
    [6.512791, 3.391198], [6.512791, 3.391198], [6.512766, 3.391138], [6.512776, 3.391118],
    [6.512986, 3.391188], [6.515244, 3.39174], [6.515645, 3.39179], [6.516234, 3.391781],
    [6.5174, 3.391643], [6.5174, 3.391643], [6.518958, 3.391456], [6.518996, 3.391478],
    [6.519062, 3.391459], [6.519084, 3.391414], [6.518946, 3.390819], [6.518845, 3.39055],
    [6.518786, 3.390418], [6.518631, 3.390174], [6.518152, 3.38954], [6.518025, 3.389333],
    [6.517852, 3.388948], [6.51758, 3.388034], [6.517636, 3.387979], [6.517604, 3.387691],
    [6.51746, 3.387809], [6.517765, 3.38888], [6.51787, 3.389167], [6.518012, 3.389444],
    [6.518155, 3.389655], [6.518613, 3.390258], [6.518714, 3.390429], [6.518853, 3.390723],
    [6.518918, 3.390906], [6.518962, 3.391101], [6.518987, 3.391336], [6.518953, 3.39136],
    [6.518938, 3.391409], [6.518958, 3.391456], [6.518996, 3.391478], [6.519081, 3.392472],
    [6.519061, 3.392809], [6.518588, 3.395111], [6.518573, 3.395146], [6.518581, 3.395172],
    [6.518524, 3.395528], [6.518519, 3.395746], [6.518543, 3.395964], [6.518633, 3.396351],
    [6.518885, 3.396932], [6.518885, 3.396951], [6.518558, 3.397097], [6.518337, 3.397163],
    [6.51809, 3.397207], [6.5181, 3.397415], [6.517817, 3.397375], [6.517817, 3.397375],
    [6.517697, 3.397358], [6.517421, 3.397361], [6.517129, 3.397372], [6.517122, 3.39718],
    [6.516851, 3.397201], [6.516615, 3.397247], [6.516186, 3.397415], [6.515613, 3.397588],
    [6.515248, 3.39763], [6.514928, 3.397589], [6.514331, 3.397446], [6.513938, 3.397392],
    [6.513805, 3.397393], [6.513803, 3.39705], [6.513803, 3.39705], [6.5138, 3.395799],
    [6.513733, 3.395255], [6.513587, 3.394569], [6.51326, 3.393188], [6.512997, 3.39195],
    [6.512791, 3.391198], [6.512791, 3.391198], [6.512766, 3.391138], [6.512776, 3.391118],
    [6.512986, 3.391188], [6.515244, 3.39174], [6.515645, 3.39179], [6.516234, 3.391781],
    [6.5174, 3.391643], [6.5174, 3.391643], [6.518958, 3.391456], [6.518996, 3.391478],
    [6.519062, 3.391459], [6.519084, 3.391414], [6.518946, 3.390819], [6.518845, 3.39055],
    [6.518786, 3.390418], [6.518631, 3.390174], [6.518152, 3.38954], [6.518025, 3.389333],
    [6.517852, 3.388948], [6.51758, 3.388034], [6.517636, 3.387979], [6.517604, 3.387691],
];

pub fn servers() -> Vec<ServerSpec> {
    SERVERS
        .iter()
        .map(|&(name, lat, lon)| ServerSpec::new(name, GeoPoint::new(lat, lon), SERVER_CAPACITY))
        .collect()
}
