//! Error types for rule loading and buffer-booking calculations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the platform rules source.
///
/// A failed load leaves the caller with an empty rule set; it is never fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The rules file could not be read.
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rules source was not valid JSON or a record had the wrong shape.
    #[error("rules parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value was not an object keyed by platform.
    #[error("rules source must be a JSON object keyed by platform, found {0}")]
    NotAnObject(&'static str),
}

/// Errors produced while planning a buffer booking.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Missing or malformed user input (unknown platform, bad date, non-positive stay).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A platform rule record is incomplete or uses an unrecognized window type.
    #[error("Invalid rule for platform '{platform}': {reason}")]
    InvalidRule { platform: String, reason: String },

    /// The IANA timezone given for a timed reminder is unknown.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl PlannerError {
    pub(crate) fn invalid_rule(platform: &str, reason: impl Into<String>) -> Self {
        PlannerError::InvalidRule {
            platform: platform.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout campsite-core.
pub type Result<T> = std::result::Result<T, PlannerError>;
