use chrono::{DateTime, Utc};
use geode_analysis::RunDiagnostics;
use geode_core::models::{ChangeRecord, ChangeSummary, SamplePoint};
use serde::Serialize;
use tabled::Tabled;

/// Output for analyze command
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub start_year: i32,
    pub end_year: i32,
    pub summary: ChangeSummary,
    pub diagnostics: RunDiagnostics,
    pub artifacts: ArtifactPaths,
}

#[derive(Debug, Serialize)]
pub struct ArtifactPaths {
    pub report: String,
    pub plot: String,
    pub map: String,
    pub geojson: String,
}

/// Output for sample command
#[derive(Debug, Serialize)]
pub struct SampleOutput {
    pub requested: usize,
    pub draws: usize,
    pub points: Vec<SamplePoint>,
}

/// One resolved configuration value
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

/// Table row for a significant change
#[derive(Tabled)]
pub struct ChangeRow {
    #[tabled(rename = "Longitude")]
    pub lon: String,
    #[tabled(rename = "Latitude")]
    pub lat: String,
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "End")]
    pub end: String,
    #[tabled(rename = "Change")]
    pub change: String,
    #[tabled(rename = "Acquired")]
    pub acquired: String,
}

impl From<&ChangeRecord> for ChangeRow {
    fn from(record: &ChangeRecord) -> Self {
        Self {
            lon: format!("{:.4}", record.point().lon),
            lat: format!("{:.4}", record.point().lat),
            start: format!("{:.3}", record.start_index()),
            end: format!("{:.3}", record.end_index()),
            change: format!("{:+.3}", record.change()),
            acquired: format!(
                "{} / {}",
                short_date(&record.start_acquired()),
                short_date(&record.end_acquired())
            ),
        }
    }
}

/// Table row for a sampled point
#[derive(Tabled)]
pub struct PointRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Longitude")]
    pub lon: String,
    #[tabled(rename = "Latitude")]
    pub lat: String,
}

/// Table row for a configuration value
#[derive(Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub fn short_date(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}
