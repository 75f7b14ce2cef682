use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A vegetation index reading for one point and one year.
///
/// An observation is either fully populated or absent; absence is modelled as
/// [`ObservationMiss`] on the `Err` side of the source's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Index value, conventionally within [-1, 1]
    pub index: f64,

    /// Acquisition time of the scene the value was derived from
    pub acquired_at: DateTime<Utc>,

    /// Scene cloud cover in percent
    pub cloud_cover: f64,

    /// Link to a browsable preview of the scene
    pub preview: Option<String>,
}

/// Why an observation could not be produced.
///
/// Misses are expected outcomes of a run and never abort it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationMiss {
    #[error("no eligible imagery in the query window")]
    NoImagery,

    #[error("catalog query timed out")]
    Timeout,

    #[error("catalog transport failure: {0}")]
    Transport(String),
}
