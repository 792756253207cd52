//! # Segment Smoother
//!
//! Simplifies the track independently between consecutive waypoints, so that a
//! waypoint is never simplified away and every segment keeps its endpoints.
//!
//! The smoothed track is rebuilt sub-range by sub-range into a fresh sequence.
//! The trailing boundary point of one sub-range re-enters the selection of the
//! next one, exactly as if each sub-range had been spliced into the track in
//! turn. Distances assigned inside a sub-range are provisional (linear in the
//! vertex index); one global Haversine pass at the end is authoritative.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::simplify_3d;
use crate::error::{ProfileError, Result};
use crate::track::Track;
use crate::{MatchedWaypoint, ProcessingConfig, TrackPoint};

/// Outcome of a smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SmoothingReport {
    pub segments_total: usize,
    pub segments_smoothed: usize,
    pub segments_skipped: usize,
    pub points_before: usize,
    pub points_after: usize,
}

impl SmoothingReport {
    fn unchanged(point_count: usize) -> Self {
        Self {
            points_before: point_count,
            points_after: point_count,
            ..Self::default()
        }
    }
}

/// Mile ranges delimited by the waypoints: `[0, w1], [w1, w2], ..., [wN, total]`.
pub fn segment_ranges(waypoints: &[MatchedWaypoint], total_distance: f64) -> Vec<(f64, f64)> {
    let mut marks: Vec<f64> = Vec::with_capacity(waypoints.len() + 2);
    marks.push(0.0);
    marks.extend(waypoints.iter().map(|w| w.distance));
    marks[1..].sort_by(f64::total_cmp);
    marks.push(total_distance);

    marks.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Simplify one selection of consecutive points.
///
/// Surviving vertices get provisional distances interpolated by index between
/// the selection's first and last distance, so both endpoints keep theirs.
fn simplify_selection(
    selection: &[TrackPoint],
    config: &ProcessingConfig,
) -> Result<Vec<TrackPoint>> {
    if selection.len() < 2 {
        return Err(ProfileError::insufficient(
            "segment has fewer than 2 points",
            selection.len(),
        ));
    }

    if let Some(bad) = selection.iter().find(|p| !p.is_finite()) {
        return Err(ProfileError::invalid_geometry(format!(
            "non-finite point ({}, {}, {}) at mile {:.2}",
            bad.longitude, bad.latitude, bad.elevation, bad.distance
        )));
    }

    let kept = simplify_3d(selection, config.smoothing_tolerance, config.high_quality);
    if kept.len() < 2 {
        return Err(ProfileError::Internal {
            message: format!("simplification kept {} points", kept.len()),
        });
    }

    let start = selection[0].distance;
    let end = selection[selection.len() - 1].distance;
    let last = kept.len() - 1;

    Ok(kept
        .iter()
        .enumerate()
        .map(|(idx, &i)| {
            let distance = if idx == last {
                end
            } else {
                start + (idx as f64 / last as f64) * (end - start)
            };
            TrackPoint {
                distance,
                ..selection[i]
            }
        })
        .collect())
}

/// Simplify the points between two mile markers without touching the track.
///
/// Selects the points with `start_mile <= distance <= end_mile`. Fails with
/// `InsufficientData` for fewer than 2 points and `InvalidGeometry` when a
/// selected coordinate or elevation is not finite.
pub fn smooth_segment(
    track: &Track,
    start_mile: f64,
    end_mile: f64,
    config: &ProcessingConfig,
) -> Result<Vec<TrackPoint>> {
    let range = track.range_indices(start_mile, end_mile);
    simplify_selection(&track.points()[range], config)
}

/// Smooth every segment between waypoints and recompute distances.
///
/// A no-op when `config.enable_smoothing` is false. A segment that cannot be
/// simplified keeps its original points; that is logged and never fatal.
pub fn smooth(
    track: &mut Track,
    waypoints: &[MatchedWaypoint],
    config: &ProcessingConfig,
) -> Result<SmoothingReport> {
    if !config.enable_smoothing {
        return Ok(SmoothingReport::unchanged(track.len()));
    }

    let total = track.total_distance()?;
    let ranges = segment_ranges(waypoints, total);
    let original = track.points();

    let mut report = SmoothingReport {
        segments_total: ranges.len(),
        points_before: original.len(),
        ..SmoothingReport::default()
    };

    let mut rebuilt: Vec<TrackPoint> = Vec::with_capacity(original.len());
    let mut cursor = 0;

    for &(start, end) in &ranges {
        while cursor < original.len() && original[cursor].distance < start {
            rebuilt.push(original[cursor]);
            cursor += 1;
        }

        // Already emitted points inside this range rejoin the selection
        let reopen = rebuilt.partition_point(|p| p.distance < start);
        let mut selection = rebuilt.split_off(reopen);

        let take = original[cursor..].partition_point(|p| p.distance <= end);
        selection.extend_from_slice(&original[cursor..cursor + take]);
        cursor += take;

        match simplify_selection(&selection, config) {
            Ok(simplified) => {
                debug!(
                    "[Smoother] miles {:.2}-{:.2}: {} -> {} points",
                    start,
                    end,
                    selection.len(),
                    simplified.len()
                );
                report.segments_smoothed += 1;
                rebuilt.extend(simplified);
            }
            Err(ProfileError::InsufficientData { point_count, .. }) => {
                debug!(
                    "[Smoother] miles {:.2}-{:.2}: {} point(s), left as is",
                    start, end, point_count
                );
                report.segments_skipped += 1;
                rebuilt.extend(selection);
            }
            Err(e) => {
                warn!(
                    "[Smoother] miles {:.2}-{:.2} left unsmoothed: {}",
                    start, end, e
                );
                report.segments_skipped += 1;
                rebuilt.extend(selection);
            }
        }
    }
    rebuilt.extend_from_slice(&original[cursor..]);

    report.points_after = rebuilt.len();
    track.replace_points(rebuilt)?;
    track.recompute_distances();

    info!(
        "[Smoother] {}/{} segments smoothed, {} -> {} points",
        report.segments_smoothed, report.segments_total, report.points_before, report.points_after
    );
    Ok(report)
}
