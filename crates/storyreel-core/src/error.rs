//! Core error types for storyreel-core.
//!
//! Construction errors are programmer errors and are rejected up front.
//! Sync and timer errors signal a collaborator breaking its contract.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for storyreel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Carousel construction errors
    #[error("Carousel error: {0}")]
    Carousel(#[from] CarouselError),

    /// Index synchronization errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Segmented timer errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors raised while building a carousel from its item list.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CarouselError {
    #[error("a carousel needs at least one item")]
    Empty,

    #[error("duplicate item id '{0}'")]
    DuplicateId(String),
}

/// A surface reported an index or item the carousel cannot resolve.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SyncError {
    #[error("index {index} out of bounds for carousel of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unknown item id '{0}'")]
    UnknownItem(String),
}

/// Segmented timer errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimerError {
    #[error("segment plan must contain at least one segment")]
    EmptyPlan,

    #[error("segment {index} has zero duration")]
    ZeroDuration { index: usize },

    #[error("segment {index} out of bounds (segments: {len})")]
    SegmentOutOfBounds { index: usize, len: usize },

    #[error("timer has been stopped")]
    Stopped,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare config directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
