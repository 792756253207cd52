//! # Track Engine
//!
//! Keyed store of processed tracks, so a caller can upload a track once and
//! later ask for segment statistics against it by id.
//!
//! ## Architecture
//!
//! The engine keeps, per caller-supplied id:
//! - The processed (optionally smoothed) track
//! - The waypoints matched on it
//!
//! Every track is built in isolation and never shared: accessors hand out
//! clones or computed results. The number of stored tracks is bounded by
//! `ProcessingConfig::max_cached_tracks`; the least recently used is evicted.

use std::sync::Mutex;

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{OptionExt, ProfileError, Result};
use crate::lru_cache::LruCache;
use crate::segments::{
    build_course_report, calculate_segment_stats, CourseReport, SegmentElevation,
};
use crate::track::Track;
use crate::{
    process_track, Bounds, Checkpoint, MatchedWaypoint, ProcessedTrack, ProcessingConfig,
    TrackInput,
};

// ============================================================================
// Core Types
// ============================================================================

/// Summary returned after a track has been processed and stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub id: String,
    pub point_count: usize,
    pub total_distance: f64,
    pub waypoints: Vec<MatchedWaypoint>,
    pub bounds: Option<Bounds>,
    pub smoothed: bool,
}

/// Engine statistics for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub track_count: u32,
    pub capacity: u32,
    pub total_points: u64,
    pub evictions: u64,
}

// ============================================================================
// Track Engine
// ============================================================================

/// The stateful track store.
pub struct TrackEngine {
    tracks: LruCache<String, ProcessedTrack>,
    config: ProcessingConfig,
    evictions: u64,
}

impl TrackEngine {
    /// Create a new engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProcessingConfig::default())
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(config: ProcessingConfig) -> Self {
        Self {
            tracks: LruCache::new(config.max_cached_tracks),
            config,
            evictions: 0,
        }
    }

    // ========================================================================
    // Track Management
    // ========================================================================

    /// Process a parsed track and store it under `id` using the engine config.
    ///
    /// An existing track with the same id is replaced.
    pub fn process(&mut self, id: &str, input: &TrackInput) -> Result<TrackSummary> {
        let config = self.config.clone();
        self.process_with(id, input, &config)
    }

    /// Process a parsed track with a per-run configuration.
    pub fn process_with(
        &mut self,
        id: &str,
        input: &TrackInput,
        config: &ProcessingConfig,
    ) -> Result<TrackSummary> {
        config.validate()?;
        let processed = process_track(input, config)?;

        let summary = TrackSummary {
            id: id.to_string(),
            point_count: processed.track.len(),
            total_distance: processed.track.total_distance()?,
            waypoints: processed.waypoints.clone(),
            bounds: processed.track.bounds(),
            smoothed: processed.smoothing.is_some(),
        };

        info!(
            "[TrackEngine] Stored '{}': {} points, {:.2} mi, {} waypoints",
            id,
            summary.point_count,
            summary.total_distance,
            summary.waypoints.len()
        );

        if let Some(evicted) = self.tracks.insert(id.to_string(), processed) {
            self.evictions += 1;
            warn!("[TrackEngine] Evicted '{}' (capacity {})", evicted, self.tracks.capacity());
        }

        Ok(summary)
    }

    /// Remove a track. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.tracks.remove(&id.to_string()).is_some()
    }

    /// Clear all stored tracks.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Check if a track is stored.
    pub fn has_track(&self, id: &str) -> bool {
        self.tracks.contains(&id.to_string())
    }

    /// Get the number of stored tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Ids from least to most recently used.
    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.keys().cloned().collect()
    }

    fn get(&mut self, id: &str) -> Result<&ProcessedTrack> {
        self.tracks.get(&id.to_string()).ok_or_not_found(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// A copy of the stored track.
    pub fn track(&mut self, id: &str) -> Result<Track> {
        Ok(self.get(id)?.track.clone())
    }

    /// Waypoints matched when the track was processed.
    pub fn waypoints(&mut self, id: &str) -> Result<Vec<MatchedWaypoint>> {
        Ok(self.get(id)?.waypoints.clone())
    }

    /// Gain/loss between two mile markers of a stored track.
    pub fn segment(
        &mut self,
        id: &str,
        start_mile: f64,
        end_mile: f64,
    ) -> Result<SegmentElevation> {
        calculate_segment_stats(&self.get(id)?.track, start_mile, end_mile)
    }

    /// Segment report for caller-supplied checkpoints (in any order).
    ///
    /// Fails with `NotFound` when `id` is unknown; per-segment problems are
    /// embedded in the report.
    pub fn calculate(&mut self, id: &str, checkpoints: &[Checkpoint]) -> Result<CourseReport> {
        let config = self.config.clone();
        let processed = self.get(id)?;
        build_course_report(&processed.track, checkpoints, &config)
    }

    /// Segment report as JSON.
    pub fn calculate_json(&mut self, id: &str, checkpoints: &[Checkpoint]) -> Result<String> {
        let report = self.calculate(id, checkpoints)?;
        serde_json::to_string(&report).map_err(|e| ProfileError::Internal {
            message: e.to_string(),
        })
    }

    /// Matched waypoints as JSON.
    ///
    /// Fails with `NotFound` when `id` is unknown or was evicted.
    pub fn waypoints_json(&mut self, id: &str) -> Result<String> {
        let waypoints = self.waypoints(id)?;
        serde_json::to_string(&waypoints).map_err(|e| ProfileError::Internal {
            message: e.to_string(),
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Replace the configuration. Shrinking the capacity drops the oldest tracks.
    pub fn set_config(&mut self, config: ProcessingConfig) -> Result<()> {
        config.validate()?;
        if config.max_cached_tracks != self.tracks.capacity() {
            let mut resized = LruCache::new(config.max_cached_tracks);
            for id in self.track_ids() {
                if let Some(track) = self.tracks.remove(&id) {
                    if resized.insert(id, track).is_some() {
                        self.evictions += 1;
                    }
                }
            }
            self.tracks = resized;
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Get engine statistics.
    pub fn stats(&self) -> EngineStats {
        let total_points = self
            .tracks
            .keys()
            .filter_map(|id| self.tracks.peek(id))
            .map(|p| p.track.len() as u64)
            .sum();

        EngineStats {
            track_count: self.tracks.len() as u32,
            capacity: self.tracks.capacity() as u32,
            total_points,
            evictions: self.evictions,
        }
    }
}

impl Default for TrackEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Global Singleton
// ============================================================================

/// Global engine instance, for hosts that keep tracks between requests.
pub static ENGINE: Lazy<Mutex<TrackEngine>> = Lazy::new(|| Mutex::new(TrackEngine::new()));

/// Run `f` with exclusive access to the global engine.
///
/// A lock poisoned by a panicking caller is recovered; the store holds no
/// partially written state.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut TrackEngine) -> R,
{
    let mut engine = ENGINE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut engine)
}

// ============================================================================
// Tests
// ============================================================================
