//! Geode Analysis - Change detection and summary statistics
//!
//! This crate pairs start-year and end-year observations for every sample
//! point and aggregates the resulting change records.

pub mod analyzer;
pub mod statistics;

pub use analyzer::{ChangeAnalysis, ChangeAnalyzer, MissCounts, RunDiagnostics};
pub use statistics::summarize;
