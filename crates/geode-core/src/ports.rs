//! Port trait definitions
//!
//! These traits define the interfaces that imagery adapters must implement.

pub mod catalog;
pub mod observation;

pub use catalog::{CatalogError, CatalogItem, CatalogQuery, DateRange, ImageryCatalog, IndexEstimator};
pub use observation::ObservationSource;
