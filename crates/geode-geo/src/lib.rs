//! Geode Geo - Analysis regions and point sampling
//!
//! This crate owns the polygon geometry of an analysis region and the
//! rejection sampler that places sample points inside it.

pub mod region;
pub mod sampler;

pub use region::Region;
pub use sampler::{SampleRun, Sampler, MAX_ATTEMPTS_PER_POINT};
