//! Error types
//!
//! Only setup failures are fatal. Everything else is reported to the log and
//! the simulation carries on.

use thiserror::Error;

/// Startup failures: no simulation step can run without these resources
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("simulation clock unavailable: {0}")]
    ClockUnavailable(String),
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// An entity whose state can no longer be simulated; it is quarantined for the rest of the run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityFault {
    #[error("{kind} #{id} has a non-finite {field}")]
    NonFinite {
        kind: &'static str,
        id: u32,
        field: &'static str,
    },
}

/// Key-value persistence failures (logged, never fatal)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Audio collaborator failures (logged, never fatal)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("unknown sound '{0}'")]
    UnknownSound(String),
    #[error("unknown music track '{0}'")]
    UnknownTrack(String),
    #[error("audio output unavailable")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}
