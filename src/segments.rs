//! Segment analysis: elevation gain/loss between mile markers.
//!
//! Failures are per segment. A range without track points yields an error
//! value for that segment only, so a course report always covers every
//! requested segment.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};
use crate::geo_utils::METERS_TO_FEET;
use crate::track::Track;
use crate::{Checkpoint, ElevationProfilePoint, ProcessingConfig, TrackPoint};

/// Label of the segment starting at mile 0.
pub const START_LABEL: &str = "Start";
/// Label of the segment ending at the end of the track.
pub const FINISH_LABEL: &str = "Finish";

/// Elevation change over one mile range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentElevation {
    /// Requested span `end - start` in miles
    pub distance: f64,
    pub elevation_gain_ft: i64,
    pub elevation_loss_ft: i64,
}

/// Labelled statistics for one segment of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentStats {
    Computed {
        start_label: String,
        end_label: String,
        distance: f64,
        elevation_gain_ft: i64,
        elevation_loss_ft: i64,
    },
    Failed {
        start_label: String,
        end_label: String,
        distance: f64,
        error: String,
    },
}

impl SegmentStats {
    pub fn start_label(&self) -> &str {
        match self {
            SegmentStats::Computed { start_label, .. }
            | SegmentStats::Failed { start_label, .. } => start_label,
        }
    }

    pub fn end_label(&self) -> &str {
        match self {
            SegmentStats::Computed { end_label, .. } | SegmentStats::Failed { end_label, .. } => {
                end_label
            }
        }
    }

    pub fn distance(&self) -> f64 {
        match self {
            SegmentStats::Computed { distance, .. } | SegmentStats::Failed { distance, .. } => {
                *distance
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SegmentStats::Failed { .. })
    }

    /// Error message of a failed segment.
    pub fn error(&self) -> Option<&str> {
        match self {
            SegmentStats::Failed { error, .. } => Some(error),
            SegmentStats::Computed { .. } => None,
        }
    }

    /// Gain and loss in feet of a computed segment.
    pub fn elevation(&self) -> Option<(i64, i64)> {
        match self {
            SegmentStats::Computed {
                elevation_gain_ft,
                elevation_loss_ft,
                ..
            } => Some((*elevation_gain_ft, *elevation_loss_ft)),
            SegmentStats::Failed { .. } => None,
        }
    }
}

/// A checkpoint annotated with the profile elevation at its mile marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AidStation {
    pub name: String,
    pub mile: f64,
    /// `None` when no profile point lies within the lookup window
    pub elevation_ft: Option<f64>,
}

/// Everything a caller needs to render a course: segments, profile and stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseReport {
    pub total_distance: f64,
    pub segments: Vec<SegmentStats>,
    pub elevation_profile: Vec<ElevationProfilePoint>,
    pub aid_stations: Vec<AidStation>,
}

/// Elevation gain and loss between two mile markers.
///
/// Considers the points with `start_mile <= distance <= end_mile`. Positive
/// elevation steps add to the gain and negative ones to the loss; both are
/// converted to feet and rounded independently. Missing (non-finite)
/// elevations are bridged: the step runs from the last known elevation.
/// `distance` is the requested span, not the span actually covered by points.
///
/// Returns `InsufficientData` when no point lies in the range.
pub fn calculate_segment_stats(
    track: &Track,
    start_mile: f64,
    end_mile: f64,
) -> Result<SegmentElevation> {
    let in_range: Vec<&TrackPoint> = track
        .points()
        .iter()
        .filter(|p| p.distance >= start_mile)
        .filter(|p| p.distance <= end_mile)
        .collect();

    if in_range.is_empty() {
        return Err(ProfileError::insufficient(
            format!(
                "No track points found between miles {} and {}",
                start_mile, end_mile
            ),
            0,
        ));
    }

    let mut gain = 0.0;
    let mut loss = 0.0;
    let mut previous: Option<f64> = None;
    for elevation in in_range.iter().map(|p| p.elevation).filter(|e| e.is_finite()) {
        if let Some(prev) = previous {
            let diff = elevation - prev;
            if diff > 0.0 {
                gain += diff;
            } else {
                loss += diff.abs();
            }
        }
        previous = Some(elevation);
    }

    Ok(SegmentElevation {
        distance: end_mile - start_mile,
        elevation_gain_ft: (gain * METERS_TO_FEET).round() as i64,
        elevation_loss_ft: (loss * METERS_TO_FEET).round() as i64,
    })
}

/// Labelled segment statistics; a failure is folded into [`SegmentStats::Failed`].
pub fn segment_stats(
    track: &Track,
    start_label: &str,
    end_label: &str,
    start_mile: f64,
    end_mile: f64,
) -> SegmentStats {
    match calculate_segment_stats(track, start_mile, end_mile) {
        Ok(stats) => SegmentStats::Computed {
            start_label: start_label.to_string(),
            end_label: end_label.to_string(),
            distance: stats.distance,
            elevation_gain_ft: stats.elevation_gain_ft,
            elevation_loss_ft: stats.elevation_loss_ft,
        },
        Err(e) => {
            warn!(
                "[SegmentAnalyzer] {} -> {} (miles {}-{}): {}",
                start_label, end_label, start_mile, end_mile, e
            );
            let error = match e {
                ProfileError::InsufficientData { message, .. } => message,
                other => other.to_string(),
            };
            SegmentStats::Failed {
                start_label: start_label.to_string(),
                end_label: end_label.to_string(),
                distance: end_mile - start_mile,
                error,
            }
        }
    }
}

/// Checkpoints ordered by mile marker. Equal miles keep their input order.
pub fn sort_checkpoints(checkpoints: &[Checkpoint]) -> Vec<Checkpoint> {
    let mut sorted = checkpoints.to_vec();
    sorted.sort_by(|a, b| a.mile.total_cmp(&b.mile));
    sorted
}

/// Build the full report for a list of checkpoints.
///
/// Segments run Start → first checkpoint, between consecutive checkpoints, and
/// last checkpoint → Finish (at the total distance). Without checkpoints there
/// are no segments. Fails only when the track's distances are stale.
pub fn build_course_report(
    track: &Track,
    checkpoints: &[Checkpoint],
    config: &ProcessingConfig,
) -> Result<CourseReport> {
    let total_distance = track.total_distance()?;
    let stations = sort_checkpoints(checkpoints);

    let mut segments = Vec::with_capacity(stations.len() + 1);
    if let (Some(first), Some(last)) = (stations.first(), stations.last()) {
        segments.push(segment_stats(track, START_LABEL, &first.name, 0.0, first.mile));
        for pair in stations.windows(2) {
            segments.push(segment_stats(
                track,
                &pair[0].name,
                &pair[1].name,
                pair[0].mile,
                pair[1].mile,
            ));
        }
        segments.push(segment_stats(
            track,
            &last.name,
            FINISH_LABEL,
            last.mile,
            total_distance,
        ));
    }

    let elevation_profile: Vec<ElevationProfilePoint> = track.elevation_profile().collect();

    let aid_stations = stations
        .into_iter()
        .map(|station| {
            let elevation_ft = elevation_profile
                .iter()
                .find(|p| (p.distance - station.mile).abs() < config.station_window_miles)
                .map(|p| p.elevation_ft);
            AidStation {
                name: station.name,
                mile: station.mile,
                elevation_ft,
            }
        })
        .collect();

    Ok(CourseReport {
        total_distance,
        segments,
        elevation_profile,
        aid_stations,
    })
}
