//! # Course Profile
//!
//! Distance-indexed analytics for GPS tracks of endurance events.
//!
//! This library provides:
//! - Cumulative mileage along a track (Haversine accumulation)
//! - Elevation profiles in feet
//! - Aid-station matching of named waypoints, including repeated visits on loop courses
//! - Optional per-segment line simplification between matched waypoints
//! - Elevation gain/loss between arbitrary mile markers
//!
//! ## Features
//!
//! - **`parallel`** - Process independent tracks in parallel with rayon
//! - **`gpx`** - Read GPX files into [`TrackInput`]
//! - **`cli`** - The `course-profile` command line tool
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use course_profile::{Coordinate, Marker, ProcessingConfig, Track, match_waypoints};
//!
//! let coords: Vec<Coordinate> = (0..50)
//!     .map(|i| Coordinate::new(-105.0, 40.0 + i as f64 * 0.001, 1600.0 + i as f64))
//!     .collect();
//! let track = Track::from_coordinates(&coords).unwrap();
//!
//! let markers = vec![Marker::new("Aid 1", -105.0, 40.025)];
//! let waypoints = match_waypoints(&track, &markers, &ProcessingConfig::default());
//! assert_eq!(waypoints.len(), 1);
//!
//! let end = waypoints[0].distance;
//! let stats = course_profile::calculate_segment_stats(&track, 0.0, end).unwrap();
//! assert!(stats.elevation_gain_ft > 0);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, ProfileError, Result};

// Geographic utilities (haversine distance in miles, bounds)
pub mod geo_utils;

// Track model: ordered points with cumulative distance
pub mod track;
pub use track::{ElevationProfile, Track};

// Waypoint-to-track matching
pub mod waypoints;
pub use waypoints::{dedup_visits, find_visits, match_waypoints, Visit};

// Line simplification toolbox
pub mod algorithms;

// Per-segment smoothing between waypoints
pub mod smoothing;
pub use smoothing::{smooth, smooth_segment, SmoothingReport};

// Segment gain/loss analysis
pub mod segments;
pub use segments::{
    build_course_report, calculate_segment_stats, segment_stats, sort_checkpoints, AidStation,
    CourseReport, SegmentElevation, SegmentStats,
};

// LRU cache backing the engine store
pub mod lru_cache;

// Keyed store of processed tracks
pub mod engine;
pub use engine::{with_engine, EngineStats, TrackEngine, TrackSummary, ENGINE};

// GPX adapter
#[cfg(feature = "gpx")]
pub mod gpx_input;
#[cfg(feature = "gpx")]
pub use gpx_input::{read_gpx, read_gpx_file};

// ============================================================================
// Core Types
// ============================================================================

/// A raw input coordinate as produced by the track parser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    /// Elevation in meters (NaN when the source had none)
    pub elevation: f64,
}

impl Coordinate {
    /// Create a coordinate. Argument order follows the parser output: lon, lat, elevation.
    pub fn new(longitude: f64, latitude: f64, elevation: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation,
        }
    }

    /// Check if longitude and latitude are finite numbers.
    ///
    /// Ranges are not checked; the parser's values are used as given.
    pub fn has_finite_position(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((longitude, latitude, elevation): (f64, f64, f64)) -> Self {
        Self::new(longitude, latitude, elevation)
    }
}

/// A point of the track with its cumulative distance.
///
/// `distance` is owned by [`Track`] and recomputed after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Elevation in meters
    pub elevation: f64,
    /// Cumulative distance from the start of the track, in miles
    pub distance: f64,
}

impl TrackPoint {
    /// Create a point with a zero distance.
    pub fn new(longitude: f64, latitude: f64, elevation: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation,
            distance: 0.0,
        }
    }

    /// True when longitude, latitude and elevation are all finite.
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.elevation.is_finite()
    }
}

impl From<Coordinate> for TrackPoint {
    fn from(c: Coordinate) -> Self {
        Self::new(c.longitude, c.latitude, c.elevation)
    }
}

/// A named point of interest found in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl Marker {
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            latitude,
        }
    }
}

/// One distinct visit of a marker along the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedWaypoint {
    pub name: String,
    /// Miles from the start of the track
    pub distance: f64,
}

/// One entry of the elevation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfilePoint {
    /// Miles from the start
    pub distance: f64,
    pub elevation_ft: f64,
}

/// A caller-supplied checkpoint (aid station) at a mile marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    pub mile: f64,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>, mile: f64) -> Self {
        Self {
            name: name.into(),
            mile,
        }
    }
}

/// Bounding box of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Parsed track geometry and named markers, as handed over by the file parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackInput {
    pub coordinates: Vec<Coordinate>,
    pub markers: Vec<Marker>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for one processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Simplify each segment between waypoints before analysis.
    /// Default: false
    pub enable_smoothing: bool,

    /// Simplification tolerance in coordinate units (degrees, with elevation as third axis).
    /// Default: 0.00015
    pub smoothing_tolerance: f64,

    /// Skip the radial-distance pre-pass and run Douglas-Peucker only.
    /// Default: true
    pub high_quality: bool,

    /// A track point closer than this to a marker counts as a visit (miles).
    /// Default: 0.1
    pub visit_radius_miles: f64,

    /// Visits to the same marker must be more than this far apart to count twice.
    /// Default: 5.0
    pub visit_separation: f64,

    /// Window used to look up a checkpoint's elevation in the profile (miles).
    /// Default: 0.1
    pub station_window_miles: f64,

    /// Maximum number of processed tracks kept by the engine.
    /// Default: 32
    pub max_cached_tracks: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_smoothing: false,
            smoothing_tolerance: 0.00015,
            high_quality: true,
            visit_radius_miles: 0.1,
            visit_separation: 5.0,
            station_window_miles: 0.1,
            max_cached_tracks: 32,
        }
    }
}

impl ProcessingConfig {
    /// Default configuration with smoothing switched on.
    pub fn smoothed() -> Self {
        Self {
            enable_smoothing: true,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ProfileError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the algorithms cannot work with.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("smoothing_tolerance", self.smoothing_tolerance),
            ("visit_radius_miles", self.visit_radius_miles),
            ("visit_separation", self.visit_separation),
            ("station_window_miles", self.station_window_miles),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::Config {
                    message: format!("{} must be a non-negative number, got {}", name, value),
                });
            }
        }
        if self.max_cached_tracks == 0 {
            return Err(ProfileError::Config {
                message: "max_cached_tracks must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Processing Pipeline
// ============================================================================

/// A fully processed track: smoothed (if enabled) with its matched waypoints.
#[derive(Debug, Clone)]
pub struct ProcessedTrack {
    pub track: Track,
    /// Matched on the track as parsed, before smoothing
    pub waypoints: Vec<MatchedWaypoint>,
    /// Present when smoothing ran
    pub smoothing: Option<SmoothingReport>,
}

/// Build a track, match its markers and smooth it according to `config`.
///
/// Waypoints are matched before smoothing, so the sub-range boundaries used by
/// the smoother are exactly the distances reported to the caller.
pub fn process_track(input: &TrackInput, config: &ProcessingConfig) -> Result<ProcessedTrack> {
    let mut track = Track::from_coordinates(&input.coordinates)?;
    let waypoints = match_waypoints(&track, &input.markers, config);

    let smoothing = if config.enable_smoothing {
        Some(smooth(&mut track, &waypoints, config)?)
    } else {
        None
    };

    Ok(ProcessedTrack {
        track,
        waypoints,
        smoothing,
    })
}

/// Process many independent tracks. Each track is built and mutated in isolation.
pub fn process_tracks(
    inputs: &[TrackInput],
    config: &ProcessingConfig,
) -> Vec<Result<ProcessedTrack>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs
            .par_iter()
            .map(|input| process_track(input, config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs
            .iter()
            .map(|input| process_track(input, config))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
