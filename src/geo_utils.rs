//! Geographic utilities: great-circle distance in miles, unit conversion and bounds.

use geo::{BoundingRect, Coord, LineString};

use crate::{Bounds, TrackPoint};

/// Mean Earth radius used for all distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers to statute miles.
pub const KM_TO_MILES: f64 = 0.621371;

/// Meters to feet, used for every elevation output.
pub const METERS_TO_FEET: f64 = 3.28084;

/// Great-circle distance in miles between two lat/lon pairs given in degrees.
///
/// Uses the `atan2(√a, √(1−a))` form with `a` clamped to `[0, 1]`, so equal
/// and antipodal inputs never leave the function's domain.
///
/// # Example
/// ```
/// use course_profile::geo_utils::haversine_distance;
///
/// let d = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((d - 213.5).abs() < 1.0); // London to Paris
/// ```
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * KM_TO_MILES
}

/// Distance in miles between two track points.
#[inline]
pub fn point_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Length in miles of a polyline of track points, ignoring stored distances.
pub fn polyline_length(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| point_distance(&w[0], &w[1]))
        .sum()
}

/// Bounding box of a set of track points.
///
/// Returns `None` for an empty slice.
pub fn compute_bounds(points: &[TrackPoint]) -> Option<Bounds> {
    let line: LineString<f64> = points
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();

    line.bounding_rect().map(|rect| Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}
