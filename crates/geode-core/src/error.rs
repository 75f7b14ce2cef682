//! Error types for Geode

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeodeError {
    // Region errors
    #[error("Invalid region geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Sampling errors
    #[error("Sampler produced no points inside the region ({requested} requested, {draws} draws)")]
    InsufficientSamples { requested: usize, draws: usize },

    // Statistics errors
    #[error("Cannot summarize an empty set of change records")]
    EmptyDataset,

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GeodeError>;
