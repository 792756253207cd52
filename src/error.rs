//! Unified error handling for the course-profile library.
//!
//! Expected conditions (too few points, an empty mile range, an unknown track id)
//! are ordinary values of [`ProfileError`]. `Internal` is reserved for broken
//! invariants that indicate a bug rather than bad input.

use std::fmt;

/// Unified error type for track processing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Not enough track points for the requested operation
    InsufficientData { message: String, point_count: usize },
    /// Non-finite or otherwise unusable coordinates
    InvalidGeometry { message: String },
    /// A previously processed track is unknown to the engine
    NotFound { track_id: String },
    /// Track file could not be turned into coordinates
    Parse { message: String },
    /// Invalid processing configuration
    Config { message: String },
    /// Generic internal error
    Internal { message: String },
}

impl ProfileError {
    /// Shorthand for an `InsufficientData` error.
    pub fn insufficient(message: impl Into<String>, point_count: usize) -> Self {
        ProfileError::InsufficientData {
            message: message.into(),
            point_count,
        }
    }

    /// Shorthand for an `InvalidGeometry` error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        ProfileError::InvalidGeometry {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InsufficientData {
                message,
                point_count,
            } => {
                write!(f, "Insufficient data ({} points): {}", point_count, message)
            }
            ProfileError::InvalidGeometry { message } => {
                write!(f, "Invalid geometry: {}", message)
            }
            ProfileError::NotFound { track_id } => {
                write!(
                    f,
                    "Track '{}' not found, please upload the file again",
                    track_id
                )
            }
            ProfileError::Parse { message } => {
                write!(f, "Parse error: {}", message)
            }
            ProfileError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            ProfileError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProfileError {}

/// Result type alias for course-profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Extension trait for converting Option to ProfileError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a not-found error for `track_id`.
    fn ok_or_not_found(self, track_id: &str) -> Result<T>;

    /// Convert Option to Result with generic internal error.
    fn ok_or_internal(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, track_id: &str) -> Result<T> {
        self.ok_or_else(|| ProfileError::NotFound {
            track_id: track_id.to_string(),
        })
    }

    fn ok_or_internal(self, message: &str) -> Result<T> {
        self.ok_or_else(|| ProfileError::Internal {
            message: message.to_string(),
        })
    }
}
