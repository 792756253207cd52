//! # Track Model
//!
//! The ordered, distance-annotated sequence of track points.
//!
//! Cumulative distances are derived data: they are computed when the track is
//! built and must be recomputed after any structural mutation. A track whose
//! points were replaced reports its distances as stale until
//! [`Track::recompute_distances`] runs again.

use std::ops::Range;

use crate::error::{ProfileError, Result};
use crate::geo_utils::{compute_bounds, point_distance, METERS_TO_FEET};
use crate::{Bounds, Coordinate, ElevationProfilePoint, TrackPoint};

/// Minimum number of points a track must hold.
pub const MIN_TRACK_POINTS: usize = 2;

/// An ordered GPS track with cumulative distances in miles.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    points: Vec<TrackPoint>,
    /// `None` while distances are stale
    total_distance: Option<f64>,
}

impl Track {
    /// Build a track from raw parser coordinates and compute its distances.
    ///
    /// Fails with `InsufficientData` for fewer than 2 coordinates and with
    /// `InvalidGeometry` when a latitude/longitude is NaN or infinite.
    /// Elevation may be NaN (the source had none).
    pub fn from_coordinates(coords: &[Coordinate]) -> Result<Self> {
        if coords.len() < MIN_TRACK_POINTS {
            return Err(ProfileError::insufficient(
                "not enough track points to calculate distances",
                coords.len(),
            ));
        }

        if let Some(index) = coords.iter().position(|c| !c.has_finite_position()) {
            return Err(ProfileError::invalid_geometry(format!(
                "track point {} has a non-finite position ({}, {})",
                index, coords[index].longitude, coords[index].latitude
            )));
        }

        let points = coords.iter().copied().map(TrackPoint::from).collect();
        Self::from_points(points)
    }

    /// Build a track from points; any stored distances are discarded and recomputed.
    pub fn from_points(points: Vec<TrackPoint>) -> Result<Self> {
        if points.len() < MIN_TRACK_POINTS {
            return Err(ProfileError::insufficient(
                "not enough track points to calculate distances",
                points.len(),
            ));
        }

        let mut track = Self {
            points,
            total_distance: None,
        };
        track.recompute_distances();
        Ok(track)
    }

    /// Recompute every cumulative distance from scratch and cache the total.
    ///
    /// Idempotent. Returns the new total distance in miles.
    pub fn recompute_distances(&mut self) -> f64 {
        let mut total = 0.0;
        if let Some(first) = self.points.first_mut() {
            first.distance = 0.0;
        }
        for i in 1..self.points.len() {
            total += point_distance(&self.points[i - 1], &self.points[i]);
            self.points[i].distance = total;
        }
        self.total_distance = Some(total);
        total
    }

    /// Replace the whole point sequence.
    ///
    /// The stored distances of `points` are kept as given but marked stale:
    /// [`Track::total_distance`] fails until distances are recomputed.
    pub fn replace_points(&mut self, points: Vec<TrackPoint>) -> Result<()> {
        if points.len() < MIN_TRACK_POINTS {
            return Err(ProfileError::insufficient(
                "a track must keep at least 2 points",
                points.len(),
            ));
        }
        self.points = points;
        self.total_distance = None;
        Ok(())
    }

    /// Total distance in miles.
    pub fn total_distance(&self) -> Result<f64> {
        self.total_distance.ok_or_else(|| ProfileError::Internal {
            message: "track distances are stale, recompute them first".to_string(),
        })
    }

    /// True when the stored distances match the current points.
    pub fn distances_current(&self) -> bool {
        self.total_distance.is_some()
    }

    /// Elevation profile in feet, one entry per current point.
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn elevation_profile(&self) -> ElevationProfile<'_> {
        ElevationProfile {
            points: self.points.iter(),
        }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the track.
    pub fn bounds(&self) -> Option<Bounds> {
        compute_bounds(&self.points)
    }

    /// Index range of the points with `start <= distance <= end`.
    ///
    /// Runs from the first point with `distance >= start` up to the first point
    /// with `distance > end` (or the end of the track). Relies on distances being
    /// non-decreasing, which holds whenever they are current.
    pub fn range_indices(&self, start_mile: f64, end_mile: f64) -> Range<usize> {
        let lo = self.points.partition_point(|p| p.distance < start_mile);
        let hi = self.points.partition_point(|p| p.distance <= end_mile);
        lo..hi.max(lo)
    }
}

/// Lazy elevation profile over a track's current points.
#[derive(Debug, Clone)]
pub struct ElevationProfile<'a> {
    points: std::slice::Iter<'a, TrackPoint>,
}

impl Iterator for ElevationProfile<'_> {
    type Item = ElevationProfilePoint;

    fn next(&mut self) -> Option<Self::Item> {
        self.points.next().map(|p| ElevationProfilePoint {
            distance: p.distance,
            elevation_ft: p.elevation * METERS_TO_FEET,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl ExactSizeIterator for ElevationProfile<'_> {}
