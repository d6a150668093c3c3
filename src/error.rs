//! Error types for guia.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuiaError>;

#[derive(Error, Debug)]
pub enum GuiaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),
}

/// Reasons a device location lookup can fail.
///
/// All of these are recoverable: the controller keeps running without a
/// user location and distance features degrade to no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}
