use crate::models::{Observation, SamplePoint};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Absolute change above which a record is reported as significant
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.1;

/// Paired index readings for one sample point across two years.
///
/// Records are only built from two successful observations and cannot be
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    point: SamplePoint,
    start_year: i32,
    end_year: i32,
    start_index: f64,
    end_index: f64,
    change: f64,
    start_acquired: DateTime<Utc>,
    end_acquired: DateTime<Utc>,
    start_cloud_cover: f64,
    end_cloud_cover: f64,
    start_preview: Option<String>,
    end_preview: Option<String>,
}

impl ChangeRecord {
    /// Pair the start-year and end-year observations of a point
    pub fn pair(
        point: SamplePoint,
        start_year: i32,
        start: Observation,
        end_year: i32,
        end: Observation,
    ) -> Self {
        Self {
            point,
            start_year,
            end_year,
            start_index: start.index,
            end_index: end.index,
            change: end.index - start.index,
            start_acquired: start.acquired_at,
            end_acquired: end.acquired_at,
            start_cloud_cover: start.cloud_cover,
            end_cloud_cover: end.cloud_cover,
            start_preview: start.preview,
            end_preview: end.preview,
        }
    }

    pub fn point(&self) -> SamplePoint {
        self.point
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn start_index(&self) -> f64 {
        self.start_index
    }

    pub fn end_index(&self) -> f64 {
        self.end_index
    }

    /// `end_index - start_index`
    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn start_acquired(&self) -> DateTime<Utc> {
        self.start_acquired
    }

    pub fn end_acquired(&self) -> DateTime<Utc> {
        self.end_acquired
    }

    pub fn start_cloud_cover(&self) -> f64 {
        self.start_cloud_cover
    }

    pub fn end_cloud_cover(&self) -> f64 {
        self.end_cloud_cover
    }

    pub fn start_preview(&self) -> Option<&str> {
        self.start_preview.as_deref()
    }

    pub fn end_preview(&self) -> Option<&str> {
        self.end_preview.as_deref()
    }

    pub fn is_significant(&self) -> bool {
        self.change.abs() > SIGNIFICANCE_THRESHOLD
    }
}

/// Count of records moving in one direction and their share of the total
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionCount {
    pub count: usize,
    pub percent: f64,
}

impl DirectionCount {
    pub fn of(count: usize, total: usize) -> Self {
        let percent = if total == 0 { 0.0 } else { count as f64 / total as f64 * 100.0 };
        Self { count, percent }
    }
}

/// Aggregate statistics over a non-empty set of change records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,

    /// Sample standard deviation; undefined for a single record
    pub std_dev: Option<f64>,

    pub min: f64,
    pub max: f64,
    pub decreased: DirectionCount,
    pub increased: DirectionCount,
    pub unchanged: usize,
    pub earliest_acquired: DateTime<Utc>,
    pub latest_acquired: DateTime<Utc>,

    /// Records with |change| above [`SIGNIFICANCE_THRESHOLD`], ascending by change
    pub significant: Vec<ChangeRecord>,
}
