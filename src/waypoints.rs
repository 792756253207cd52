//! Waypoint matching: maps named markers onto the track.
//!
//! A marker may be passed several times on a looped course, and the passes are
//! not necessarily contiguous in point index, so every marker is compared with
//! every track point. Nearby detections of the same pass are merged; passes
//! further apart than the separation threshold become distinct waypoints.

use log::debug;

use crate::geo_utils::haversine_distance;
use crate::track::Track;
use crate::{Marker, MatchedWaypoint, ProcessingConfig};

/// A candidate proximity match between a marker and one track point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    /// Cumulative distance of the matched point (miles)
    pub distance: f64,
    pub point_index: usize,
}

/// Every track point within `radius_miles` of the marker, in index order.
pub fn find_visits(track: &Track, marker: &Marker, radius_miles: f64) -> Vec<Visit> {
    track
        .points()
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            haversine_distance(p.latitude, p.longitude, marker.latitude, marker.longitude)
                < radius_miles
        })
        .map(|(point_index, p)| Visit {
            distance: p.distance,
            point_index,
        })
        .collect()
}

/// Collapse visits into distinct passes.
///
/// Visits are sorted by distance; the first is kept, and each later one only if
/// it lies more than `separation` beyond the last kept visit.
pub fn dedup_visits(mut visits: Vec<Visit>, separation: f64) -> Vec<Visit> {
    visits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut kept: Vec<Visit> = Vec::with_capacity(visits.len().min(8));
    for visit in visits {
        match kept.last() {
            Some(last) if visit.distance - last.distance <= separation => {}
            _ => kept.push(visit),
        }
    }
    kept
}

/// Match markers onto the track.
///
/// Returns one waypoint per distinct visit, sorted ascending by distance.
/// Markers that never come within range of the track produce nothing; an
/// empty result is not an error.
pub fn match_waypoints(
    track: &Track,
    markers: &[Marker],
    config: &ProcessingConfig,
) -> Vec<MatchedWaypoint> {
    let mut waypoints: Vec<MatchedWaypoint> = markers
        .iter()
        .flat_map(|marker| {
            let visits = find_visits(track, marker, config.visit_radius_miles);
            let passes = dedup_visits(visits, config.visit_separation);
            debug!(
                "[WaypointMatcher] '{}' matched {} distinct visit(s)",
                marker.name,
                passes.len()
            );
            passes.into_iter().map(move |visit| MatchedWaypoint {
                name: marker.name.clone(),
                distance: visit.distance,
            })
        })
        .collect();

    // Stable: waypoints at the same distance keep marker order
    waypoints.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    waypoints
}
