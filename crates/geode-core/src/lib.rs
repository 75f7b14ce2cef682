//! Geode Core - Domain models, ports, and configuration
//!
//! This crate contains the change-detection domain types and the port traits
//! that imagery backends implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{GeodeError, Result};
