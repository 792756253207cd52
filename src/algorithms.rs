//! # Algorithm Toolbox
//!
//! Line simplification over track points, treating each point as a 3-D vertex
//! `(longitude, latitude, elevation)`.
//!
//! ## Algorithms
//!
//! - **Radial distance**: drops vertices closer than the tolerance to the last kept one
//! - **Douglas-Peucker**: keeps the vertices that deviate most from the chord
//!
//! Both work on indices, so callers can map the surviving vertices back to the
//! original points without copying them.
//!
//! # Example
//!
//! ```rust
//! use course_profile::algorithms::simplify_3d;
//! use course_profile::TrackPoint;
//!
//! let line: Vec<TrackPoint> = (0..10)
//!     .map(|i| TrackPoint::new(-105.0, 40.0 + i as f64 * 0.001, 1600.0))
//!     .collect();
//! // Collinear vertices collapse to the two endpoints
//! assert_eq!(simplify_3d(&line, 0.00015, true), vec![0, 9]);
//! ```

use crate::TrackPoint;

/// Smoothing tolerance used by default, in coordinate units.
pub const DEFAULT_TOLERANCE: f64 = 0.00015;

#[inline]
fn xyz(p: &TrackPoint) -> [f64; 3] {
    [p.longitude, p.latitude, p.elevation]
}

/// Squared distance between two vertices.
#[inline]
fn sq_dist(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Squared distance from `p` to the segment `a`–`b`.
fn sq_seg_dist(p: [f64; 3], a: [f64; 3], b: [f64; 3]) -> f64 {
    let mut closest = a;
    let d = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let len_sq = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];

    if len_sq != 0.0 {
        let t = ((p[0] - a[0]) * d[0] + (p[1] - a[1]) * d[1] + (p[2] - a[2]) * d[2]) / len_sq;
        if t > 1.0 {
            closest = b;
        } else if t > 0.0 {
            closest = [a[0] + d[0] * t, a[1] + d[1] * t, a[2] + d[2] * t];
        }
    }

    sq_dist(p, closest)
}

/// Radial-distance pre-pass.
///
/// Keeps the first vertex, every vertex further than `sqrt(sq_tolerance)` from
/// the previously kept one, and always the last vertex.
pub fn simplify_radial_distance(points: &[TrackPoint], sq_tolerance: f64) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut kept = vec![0];
    let mut prev = 0;
    for i in 1..points.len() {
        if sq_dist(xyz(&points[i]), xyz(&points[prev])) > sq_tolerance {
            kept.push(i);
            prev = i;
        }
    }

    let last = points.len() - 1;
    if prev != last {
        kept.push(last);
    }
    kept
}

/// Douglas-Peucker over a subset of vertices.
///
/// `candidates` are ascending indices into `points`; the returned indices are a
/// subset of them, ascending, always including the first and last candidate.
/// Uses an explicit stack so very long tracks cannot overflow the call stack.
pub fn douglas_peucker_3d(
    points: &[TrackPoint],
    candidates: &[usize],
    sq_tolerance: f64,
) -> Vec<usize> {
    let n = candidates.len();
    if n <= 2 {
        return candidates.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        let a = xyz(&points[candidates[first]]);
        let b = xyz(&points[candidates[last]]);

        let mut max_sq_dist = sq_tolerance;
        let mut split = None;
        for i in (first + 1)..last {
            let d = sq_seg_dist(xyz(&points[candidates[i]]), a, b);
            if d > max_sq_dist {
                split = Some(i);
                max_sq_dist = d;
            }
        }

        if let Some(i) = split {
            keep[i] = true;
            if i - first > 1 {
                stack.push((first, i));
            }
            if last - i > 1 {
                stack.push((i, last));
            }
        }
    }

    candidates
        .iter()
        .zip(keep)
        .filter_map(|(&idx, kept)| kept.then_some(idx))
        .collect()
}

/// Simplify a polyline of track points.
///
/// With `high_quality` the radial-distance pre-pass is skipped and only
/// Douglas-Peucker runs. Returns the ascending indices of the surviving
/// vertices; lines of two points or fewer are returned whole.
pub fn simplify_3d(points: &[TrackPoint], tolerance: f64, high_quality: bool) -> Vec<usize> {
    if points.len() <= 2 {
        return (0..points.len()).collect();
    }

    let sq_tolerance = tolerance * tolerance;
    let candidates: Vec<usize> = if high_quality {
        (0..points.len()).collect()
    } else {
        simplify_radial_distance(points, sq_tolerance)
    };

    douglas_peucker_3d(points, &candidates, sq_tolerance)
}

/// Simplify and return copies of the surviving points.
pub fn simplify_points(
    points: &[TrackPoint],
    tolerance: f64,
    high_quality: bool,
) -> Vec<TrackPoint> {
    simplify_3d(points, tolerance, high_quality)
        .into_iter()
        .map(|i| points[i])
        .collect()
}
