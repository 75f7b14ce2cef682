//! Geode Catalog - Imagery catalog adapters
//!
//! This crate provides the catalog-backed observation source, a STAC API
//! client, and the simulated index estimator used until band math lands.

pub mod simulated;
pub mod source;
pub mod stac;

// Re-export main types
pub use simulated::SimulatedNdvi;
pub use source::{CatalogObservationSource, MAX_CLOUD_COVER, QUERY_BUFFER_DEGREES};
pub use stac::StacClient;
